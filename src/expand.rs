//! `ro.product.*` namespace expansion
//!
//! Each partition publishes its own copy of the product identity
//! (`ro.product.vendor.model`, `ro.product.system.model`, ...). Spoofing one
//! field means writing every copy.

use crate::engine::Overrider;
use crate::error::{OverrideError, OverrideErrors};
use crate::store::PropertyStore;

/// Partition sources, in the order the build system resolves them.
pub const PRODUCT_PROP_SOURCES: [&str; 6] = ["", "odm.", "product.", "system.", "system_ext.", "vendor."];

const PRODUCT_NAMESPACE: &str = "ro.product.";

/// `ro.product.<prefix><suffix>` for every prefix, in prefix order.
pub fn expand_keys(prefixes: &[&str], suffix: &str) -> Vec<String> {
    prefixes
        .iter()
        .map(|prefix| format!("{PRODUCT_NAMESPACE}{prefix}{suffix}"))
        .collect()
}

/// Write `value` to every expansion of `suffix`.
///
/// Every key is attempted; failures are collected rather than stopping the
/// pass, so a partial spoof is possible and reported.
pub fn expand_and_override<S: PropertyStore + ?Sized>(
    ov: &mut Overrider<'_, S>,
    prefixes: &[&str],
    suffix: &str,
    value: &str,
) -> Result<(), OverrideErrors> {
    let errors: Vec<OverrideError> = expand_keys(prefixes, suffix)
        .iter()
        .filter_map(|key| ov.set_or_add(key, value).err())
        .collect();
    OverrideErrors::check(errors)
}
