//! Fixed override tables
//!
//! Each table is an ordered list of key/value records applied once per boot.
//! Keys are disjoint between tables except where a later pass deliberately
//! re-asserts a value with the same content: `ro.build.tags` appears in both
//! the build-tag and CTS tables, and `ro.boot.verifiedbootstate` in both the
//! boot extras and CTS tables.

use crate::engine::{Outcome, Overrider};
use crate::error::{OverrideError, OverrideErrors};
use crate::store::PropertyStore;
use log::debug;
use std::borrow::Cow;

/// One forced property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropOverride<'a> {
    pub key: &'a str,
    pub value: &'a str,
}

impl<'a> PropOverride<'a> {
    pub const fn new(key: &'a str, value: &'a str) -> Self {
        Self { key, value }
    }
}

/// A named, ordered set of overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropTable<'a> {
    pub name: &'a str,
    entries: Cow<'a, [PropOverride<'a>]>,
}

impl<'a> PropTable<'a> {
    pub const fn new(name: &'a str, entries: &'a [PropOverride<'a>]) -> Self {
        Self {
            name,
            entries: Cow::Borrowed(entries),
        }
    }

    /// Build a table from parallel key and value lists.
    ///
    /// # Panics
    ///
    /// If the lists differ in length. Tables are build-time constants, so a
    /// mismatch is a configuration defect rather than a runtime condition.
    pub fn zip(name: &'a str, keys: &[&'a str], values: &[&'a str]) -> Self {
        assert_eq!(
            keys.len(),
            values.len(),
            "table {name}: {} keys but {} values",
            keys.len(),
            values.len()
        );
        let entries = keys
            .iter()
            .zip(values)
            .map(|(&key, &value)| PropOverride { key, value })
            .collect::<Vec<_>>();
        Self {
            name,
            entries: Cow::Owned(entries),
        }
    }

    pub fn entries(&self) -> &[PropOverride<'a>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub const RELEASE_KEYS: &str = "release-keys";

/// Signing tags as they appear on a release-keys build.
const BUILD_TAG_ENTRIES: &[PropOverride<'static>] = &[
    PropOverride::new("ro.build.tags", RELEASE_KEYS),
    PropOverride::new("ro.odm.build.tags", RELEASE_KEYS),
    PropOverride::new("ro.product.build.tags", RELEASE_KEYS),
    PropOverride::new("ro.system.build.tags", RELEASE_KEYS),
    PropOverride::new("ro.system_ext.build.tags", RELEASE_KEYS),
    PropOverride::new("ro.vendor.build.tags", RELEASE_KEYS),
];

pub static BUILD_TAGS: PropTable<'static> = PropTable::new("build-tags", BUILD_TAG_ENTRIES);

/// Verified boot and security state of a locked production device.
const CTS_ENTRIES: &[PropOverride<'static>] = &[
    PropOverride::new("ro.boot.vbmeta.device_state", "locked"),
    PropOverride::new("ro.boot.verifiedbootstate", "green"),
    PropOverride::new("ro.boot.flash.locked", "1"),
    PropOverride::new("ro.boot.veritymode", "enforcing"),
    PropOverride::new("ro.boot.warranty_bit", "0"),
    PropOverride::new("ro.warranty_bit", "0"),
    PropOverride::new("ro.debuggable", "0"),
    PropOverride::new("ro.secure", "1"),
    PropOverride::new("ro.build.type", "user"),
    PropOverride::new("ro.build.tags", RELEASE_KEYS),
    PropOverride::new("ro.vendor.boot.warranty_bit", "0"),
    PropOverride::new("ro.vendor.warranty_bit", "0"),
    PropOverride::new("vendor.boot.vbmeta.device_state", "locked"),
];

pub static CTS: PropTable<'static> = PropTable::new("cts", CTS_ENTRIES);

/// Second pass, after the main CTS table.
const CTS_LATE_ENTRIES: &[PropOverride<'static>] = &[PropOverride::new("vendor.boot.verifiedbootstate", "green")];

pub static CTS_LATE: PropTable<'static> = PropTable::new("cts-late", CTS_LATE_ENTRIES);

/// Early boot extras: SafetyNet boot state, and transitional (log-only)
/// enforcement of privileged app permission allowlists.
const BOOT_EXTRA_ENTRIES: &[PropOverride<'static>] = &[
    PropOverride::new("ro.boot.verifiedbootstate", "green"),
    PropOverride::new("ro.control_privapp_permissions", "log"),
];

pub static BOOT_EXTRAS: PropTable<'static> = PropTable::new("boot-extras", BOOT_EXTRA_ENTRIES);

/// Apply every record in order, creating missing keys.
///
/// Returns how many records changed the store. Failures do not stop the pass.
pub fn apply_table<S: PropertyStore + ?Sized>(
    ov: &mut Overrider<'_, S>,
    table: &PropTable<'_>,
) -> Result<usize, OverrideErrors> {
    let mut applied = 0;
    let mut errors: Vec<OverrideError> = Vec::new();

    for entry in table.entries() {
        match ov.set_or_add(entry.key, entry.value) {
            Ok(Outcome::Skipped) => {}
            Ok(_) => applied += 1,
            Err(e) => errors.push(e),
        }
    }
    debug!("table {}: {}/{} applied", table.name, applied, table.len());

    OverrideErrors::check(errors).map(|()| applied)
}
