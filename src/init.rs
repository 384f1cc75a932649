//! Boot-time property pass
//!
//! [`load_properties`] is the whole vendor hook: identity, heap sizing,
//! build-tag and CTS spoofing, then the recovery-only debug relaxation. It is
//! best-effort: every write is attempted, failures are logged and returned in
//! the [`InitReport`], and nothing here can stop the boot.

use crate::bionic::BionicStore;
use crate::engine::{OutcomeCounts, Overrider};
use crate::error::{OverrideError, OverrideErrors};
use crate::heap::{apply_heap_preset, select_heap_preset, total_ram_bytes, HeapPreset};
use crate::recovery::{relax_debug_if_non_production, BUILD_TYPE_PROP, DEFAULT_BUILD_TYPE};
use crate::store::PropertyStore;
use crate::table::{apply_table, BOOT_EXTRAS, BUILD_TAGS, CTS, CTS_LATE};
use crate::variant::{apply_variant, select_variant, VariantFactSheet, HWC_PROP};
use log::{error, info, warn};

pub const LOG_TAG: &str = "vendor_init";

/// Inputs that do not come from the property store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitOptions {
    /// Running from the recovery ramdisk.
    pub recovery: bool,
    /// Installed RAM; `None` skips heap tuning.
    pub total_ram_bytes: Option<u64>,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            recovery: cfg!(vendor_recovery),
            total_ram_bytes: None,
        }
    }
}

impl InitOptions {
    /// Build configuration defaults plus the kernel's RAM figure.
    pub fn from_system() -> Self {
        let total_ram_bytes = match total_ram_bytes() {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!("sysinfo failed, leaving heap defaults: {}", e);
                None
            }
        };
        Self {
            total_ram_bytes,
            ..Self::default()
        }
    }
}

/// What a boot pass did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitReport {
    pub variant: &'static VariantFactSheet,
    pub heap: Option<&'static HeapPreset>,
    pub recovery_relaxed: bool,
    /// Per-outcome tally across every phase.
    pub counts: OutcomeCounts,
    pub errors: Vec<OverrideError>,
}

impl InitReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

fn collect<T>(phase: &str, result: Result<T, OverrideErrors>, errors: &mut Vec<OverrideError>) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(errs) => {
            for e in errs.errors() {
                warn!("{}: {}", phase, e);
            }
            errors.extend(errs.into_inner());
            None
        }
    }
}

/// Run the vendor property pass against `store`.
pub fn load_properties<S: PropertyStore + ?Sized>(store: &mut S, opts: &InitOptions) -> InitReport {
    let mut errors = Vec::new();

    let hwc = store.get_or(HWC_PROP, "");
    let variant = select_variant(&hwc);
    info!("hwc={:?}, device {}", hwc, variant.device);

    let mut ov = Overrider::new(store);
    collect("identity", apply_variant(&mut ov, variant), &mut errors);

    let heap = opts.total_ram_bytes.map(select_heap_preset);
    if let Some(preset) = heap {
        collect("heap", apply_heap_preset(&mut ov, preset), &mut errors);
    }

    for table in [&BOOT_EXTRAS, &BUILD_TAGS, &CTS, &CTS_LATE] {
        collect(table.name, apply_table(&mut ov, table), &mut errors);
    }

    let mut recovery_relaxed = false;
    if opts.recovery {
        // Read after the CTS pass, like every other consumer of the property.
        let build_type = ov.store().get_or(BUILD_TYPE_PROP, DEFAULT_BUILD_TYPE);
        recovery_relaxed = collect(
            "recovery",
            relax_debug_if_non_production(&mut ov, &build_type),
            &mut errors,
        )
        .unwrap_or(true);
    }

    let counts = ov.counts();
    if errors.is_empty() {
        info!(
            "vendor properties loaded: {} updated, {} added",
            counts.updated, counts.added
        );
    } else {
        error!(
            "vendor properties loaded: {} updated, {} added, {} failed",
            counts.updated,
            counts.added,
            errors.len()
        );
    }

    InitReport {
        variant,
        heap,
        recovery_relaxed,
        counts,
        errors,
    }
}

fn init_logger() {
    #[cfg(target_os = "android")]
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(log::LevelFilter::Info)
            .with_tag(LOG_TAG),
    );
}

/// C entry point for the host `init`.
///
/// Returns the number of failed overrides, or -1 if the property area is not
/// reachable from this process.
#[no_mangle]
pub extern "C" fn vendor_init_load_properties() -> i32 {
    init_logger();

    let mut store = match BionicStore::open() {
        Ok(store) => store,
        Err(e) => {
            error!("cannot open property area: {}", e);
            return -1;
        }
    };
    let report = load_properties(&mut store, &InitOptions::from_system());
    i32::try_from(report.errors.len()).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap::{HIGH_MEM, LOW_MEM};
    use crate::store::MemoryStore;
    use crate::variant::{BHIMA, VAYU};

    const GIB: u64 = 1024 * 1024 * 1024;

    fn opts(ram: Option<u64>) -> InitOptions {
        InitOptions {
            recovery: false,
            total_ram_bytes: ram,
        }
    }

    #[test]
    fn report_reflects_inputs() {
        let mut store: MemoryStore = [(HWC_PROP, "INDIA")].into_iter().collect();
        let report = load_properties(&mut store, &opts(Some(4 * GIB)));
        assert!(report.is_clean());
        assert_eq!(report.variant, &BHIMA);
        assert_eq!(report.heap, Some(&LOW_MEM));
        assert!(!report.recovery_relaxed);

        let mut store = MemoryStore::new();
        let report = load_properties(&mut store, &opts(Some(12 * GIB)));
        assert_eq!(report.variant, &VAYU);
        assert_eq!(report.heap, Some(&HIGH_MEM));
    }

    #[test]
    fn no_ram_figure_skips_heap() {
        let mut store = MemoryStore::new();
        let report = load_properties(&mut store, &opts(None));
        assert!(report.is_clean());
        assert_eq!(report.heap, None);
        assert_eq!(store.get("dalvik.vm.heapsize"), None);
        assert_eq!(store.get("ro.build.tags"), Some("release-keys"));
    }

    #[test]
    fn boot_extras_written() {
        let mut store = MemoryStore::new();
        load_properties(&mut store, &opts(None));
        assert_eq!(store.get("ro.boot.verifiedbootstate"), Some("green"));
        assert_eq!(store.get("ro.control_privapp_permissions"), Some("log"));
    }

    #[cfg(not(target_os = "android"))]
    #[test]
    fn c_entry_fails_off_device() {
        assert_eq!(vendor_init_load_properties(), -1);
    }
}
