//! End-to-end boot pass against in-memory property areas.

use vayu_vendor_init::table::{BUILD_TAGS, CTS, CTS_LATE};
use vayu_vendor_init::{
    load_properties, InitOptions, MemoryStore, OverrideError, PropertyStore,
};

const GIB: u64 = 1024 * 1024 * 1024;
const SOURCES: [&str; 6] = ["", "odm.", "product.", "system.", "system_ext.", "vendor."];

fn enable_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn normal_boot(ram: u64) -> InitOptions {
    InitOptions {
        recovery: false,
        total_ram_bytes: Some(ram),
    }
}

/// A stock vendor image: the props the build already published.
fn stock_props(hwc: &str) -> MemoryStore {
    [
        ("ro.boot.hwc", hwc),
        ("ro.product.vendor.model", "M2102J20SG"),
        ("ro.product.system.brand", "Redmi"),
        ("ro.build.type", "userdebug"),
        ("ro.build.tags", "test-keys"),
        ("ro.debuggable", "1"),
        ("ro.boot.verifiedbootstate", "orange"),
        ("dalvik.vm.heapsize", "256m"),
    ]
    .into_iter()
    .collect()
}

fn assert_identity(store: &MemoryStore, fields: [(&str, &str); 5], mod_device: &str) {
    for (field, value) in fields {
        for source in SOURCES {
            let key = format!("ro.product.{source}{field}");
            assert_eq!(store.get(&key), Some(value), "{key}");
        }
    }
    assert_eq!(store.get("ro.product.mod_device"), Some(mod_device));
}

#[test]
fn india_boots_as_bhima() {
    enable_logger();
    let mut store = stock_props("INDIA");
    let report = load_properties(&mut store, &normal_boot(8 * GIB));
    assert!(report.is_clean(), "{:?}", report.errors);

    assert_identity(
        &store,
        [
            ("brand", "POCO"),
            ("device", "bhima"),
            ("model", "M2102J20SI"),
            ("name", "bhima_global"),
            ("marketname", "POCO X3 Pro"),
        ],
        "bhima_global",
    );
}

#[test]
fn other_regions_boot_as_vayu() {
    enable_logger();
    for hwc in ["GLOBAL", "", "RANDOM_OR_EMPTY"] {
        let mut store = stock_props(hwc);
        load_properties(&mut store, &normal_boot(8 * GIB));
        assert_identity(
            &store,
            [
                ("brand", "Xiaomi"),
                ("device", "vayu"),
                ("model", "M2102J20SG"),
                ("name", "vayu_global"),
                ("marketname", "POCO X3 Pro"),
            ],
            "vayu_global",
        );
    }

    // no hwc property at all
    let mut store = MemoryStore::new();
    load_properties(&mut store, &normal_boot(8 * GIB));
    assert_eq!(store.get("ro.product.device"), Some("vayu"));
}

#[test]
fn heap_follows_ram() {
    let mut low = MemoryStore::new();
    load_properties(&mut low, &normal_boot(4 * GIB));
    assert_eq!(low.get("dalvik.vm.heapstartsize"), Some("16m"));
    assert_eq!(low.get("dalvik.vm.heapsize"), Some("512m"));

    let mut high = stock_props("INDIA");
    load_properties(&mut high, &normal_boot(8 * GIB));
    assert_eq!(high.get("dalvik.vm.heapstartsize"), Some("32m"));
    assert_eq!(high.get("dalvik.vm.heapsize"), Some("768m"));

    let mut edge = MemoryStore::new();
    load_properties(&mut edge, &normal_boot(6144 * 1024 * 1024));
    assert_eq!(edge.get("dalvik.vm.heapsize"), Some("768m"));
}

#[test]
fn spoof_tables_hold_on_every_path() {
    enable_logger();
    for hwc in ["INDIA", "GLOBAL"] {
        for ram in [3 * GIB, 6 * GIB, 12 * GIB] {
            let mut store = stock_props(hwc);
            load_properties(&mut store, &normal_boot(ram));

            for table in [&BUILD_TAGS, &CTS, &CTS_LATE] {
                for entry in table.entries() {
                    assert_eq!(store.get(entry.key), Some(entry.value), "{hwc} {ram}: {}", entry.key);
                }
            }
            assert_eq!(store.get("vendor.boot.verifiedbootstate"), Some("green"));
        }
    }
}

#[test]
fn second_pass_changes_nothing() {
    for hwc in ["INDIA", "GLOBAL"] {
        let mut once = stock_props(hwc);
        load_properties(&mut once, &normal_boot(8 * GIB));

        let mut twice = stock_props(hwc);
        load_properties(&mut twice, &normal_boot(8 * GIB));
        let report = load_properties(&mut twice, &normal_boot(8 * GIB));

        assert!(report.is_clean());
        assert_eq!(once, twice);
    }
}

#[test]
fn full_area_reports_and_keeps_going() {
    enable_logger();
    // existing props can still be updated once no new names fit
    let mut store = stock_props("GLOBAL");
    let mut full = MemoryStore::with_capacity(store.len());
    for (k, v) in store.iter() {
        full.upsert(k, v).unwrap();
    }
    store = full;

    let report = load_properties(&mut store, &normal_boot(8 * GIB));
    assert!(!report.is_clean());
    assert!(report
        .errors
        .iter()
        .all(|e| matches!(e, OverrideError::CapacityExceeded { .. })));

    assert_eq!(store.get("ro.product.vendor.model"), Some("M2102J20SG"));
    assert_eq!(store.get("ro.product.system.brand"), Some("Xiaomi"));
    assert_eq!(store.get("ro.build.tags"), Some("release-keys"));
    assert_eq!(store.get("ro.build.type"), Some("user"));
    assert_eq!(store.get("ro.debuggable"), Some("0"));
    assert_eq!(store.get("dalvik.vm.heapsize"), Some("768m"));
}

/// Refuses writes to a fixed set of names, like a property context that
/// init is not allowed to touch.
struct Guarded {
    inner: MemoryStore,
    locked: &'static [&'static str],
    refusal: fn(&str) -> OverrideError,
}

impl Guarded {
    fn rejecting(inner: MemoryStore, locked: &'static [&'static str]) -> Self {
        Self {
            inner,
            locked,
            refusal: |key| OverrideError::Rejected {
                key: key.to_string(),
                code: -1,
            },
        }
    }

    fn invalid_names(inner: MemoryStore, locked: &'static [&'static str]) -> Self {
        Self {
            inner,
            locked,
            refusal: |key| OverrideError::InvalidKey {
                key: key.to_string(),
                reason: "no property context",
            },
        }
    }
}

impl PropertyStore for Guarded {
    fn find(&self, key: &str) -> Option<String> {
        self.inner.find(key)
    }

    fn upsert(&mut self, key: &str, value: &str) -> Result<(), OverrideError> {
        if self.locked.contains(&key) {
            return Err((self.refusal)(key));
        }
        self.inner.upsert(key, value)
    }
}

#[test]
fn recovery_relaxes_only_non_user_builds() {
    enable_logger();
    let recovery = InitOptions {
        recovery: true,
        total_ram_bytes: Some(8 * GIB),
    };

    // build type still userdebug after the CTS pass
    let mut store = Guarded::rejecting(stock_props("GLOBAL"), &["ro.build.type"]);
    let report = load_properties(&mut store, &recovery);
    assert!(report.recovery_relaxed);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(store.inner.get("ro.debuggable"), Some("1"));
    assert_eq!(store.inner.get("ro.adb.secure.recovery"), Some("0"));

    // CTS pass made it a user build
    let mut store = stock_props("GLOBAL");
    let report = load_properties(&mut store, &recovery);
    assert!(report.is_clean());
    assert!(!report.recovery_relaxed);
    assert_eq!(store.get("ro.debuggable"), Some("0"));
    assert_eq!(store.get("ro.adb.secure.recovery"), None);
}

#[test]
fn recovery_pass_ignored_on_normal_boot() {
    let mut store = Guarded::rejecting(stock_props("GLOBAL"), &["ro.build.type"]);
    let report = load_properties(&mut store, &normal_boot(8 * GIB));
    assert!(!report.recovery_relaxed);
    assert_eq!(store.inner.get("ro.adb.secure.recovery"), None);
}

#[test]
fn invalid_name_reported_rest_written() {
    enable_logger();
    let mut clean = stock_props("INDIA");
    load_properties(&mut clean, &normal_boot(8 * GIB));

    let mut store = Guarded::invalid_names(stock_props("INDIA"), &["ro.product.odm.model"]);
    let report = load_properties(&mut store, &normal_boot(8 * GIB));

    assert_eq!(report.errors.len(), 1);
    assert!(matches!(
        &report.errors[0],
        OverrideError::InvalidKey { key, .. } if key == "ro.product.odm.model"
    ));
    assert_eq!(store.inner.get("ro.product.odm.model"), None);

    // everything else matches an unobstructed boot
    let expected: Vec<_> = clean.iter().filter(|(k, _)| *k != "ro.product.odm.model").collect();
    assert_eq!(store.inner.iter().collect::<Vec<_>>(), expected);
}

#[test]
fn outcome_counts_first_and_second_boot() {
    let mut store = stock_props("GLOBAL");
    let initial = store.len();

    let first = load_properties(&mut store, &normal_boot(8 * GIB));
    assert!(first.is_clean());
    // identity 31, heap 6, extras 2, build tags 6, cts 13, late cts 1
    assert_eq!(first.counts.written(), 59);
    // pre-existing: vendor.model, system.brand, heapsize, verifiedbootstate
    // (twice), build.tags (twice), debuggable, build.type
    assert_eq!(first.counts.updated, 9);
    assert_eq!(first.counts.added, 50);
    assert_eq!(first.counts.skipped, 0);
    assert_eq!(store.len(), initial + first.counts.added);

    let second = load_properties(&mut store, &normal_boot(8 * GIB));
    assert_eq!(second.counts.updated, 59);
    assert_eq!(second.counts.added, 0);
}
