//! Hardware variant identity
//!
//! The board ships as `vayu` (global) and `bhima` (India). The bootloader
//! exports the region as `ro.boot.hwc`; everything except `INDIA` is treated
//! as the global board.

use crate::engine::Overrider;
use crate::error::{OverrideError, OverrideErrors};
use crate::expand::{expand_and_override, PRODUCT_PROP_SOURCES};
use crate::store::PropertyStore;

pub const HWC_PROP: &str = "ro.boot.hwc";
pub const MOD_DEVICE_PROP: &str = "ro.product.mod_device";

/// Identity fields published for one board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantFactSheet {
    pub brand: &'static str,
    pub device: &'static str,
    pub model: &'static str,
    pub name: &'static str,
    pub marketname: &'static str,
    pub mod_device: &'static str,
}

impl VariantFactSheet {
    /// `(ro.product.* suffix, value)` for the replicated fields.
    pub fn fields(&self) -> [(&'static str, &'static str); 5] {
        [
            ("brand", self.brand),
            ("device", self.device),
            ("model", self.model),
            ("name", self.name),
            ("marketname", self.marketname),
        ]
    }
}

pub static BHIMA: VariantFactSheet = VariantFactSheet {
    brand: "POCO",
    device: "bhima",
    model: "M2102J20SI",
    name: "bhima_global",
    marketname: "POCO X3 Pro",
    mod_device: "bhima_global",
};

pub static VAYU: VariantFactSheet = VariantFactSheet {
    brand: "Xiaomi",
    device: "vayu",
    model: "M2102J20SG",
    name: "vayu_global",
    marketname: "POCO X3 Pro",
    mod_device: "vayu_global",
};

/// Pick the fact sheet for a region code. Unrecognized codes, including an
/// empty one, fall back to the global board.
pub fn select_variant(hwc: &str) -> &'static VariantFactSheet {
    match hwc {
        "INDIA" => &BHIMA,
        _ => &VAYU,
    }
}

/// Write the identity fields into every `ro.product` source, then
/// `ro.product.mod_device`. Failures are collected, not fatal.
pub fn apply_variant<S: PropertyStore + ?Sized>(
    ov: &mut Overrider<'_, S>,
    sheet: &VariantFactSheet,
) -> Result<(), OverrideErrors> {
    let mut errors: Vec<OverrideError> = Vec::new();

    for (suffix, value) in sheet.fields() {
        if let Err(e) = expand_and_override(ov, &PRODUCT_PROP_SOURCES, suffix, value) {
            errors.extend(e.into_inner());
        }
    }
    if let Err(e) = ov.set_or_add(MOD_DEVICE_PROP, sheet.mod_device) {
        errors.push(e);
    }

    OverrideErrors::check(errors)
}
