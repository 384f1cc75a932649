//! Translate the recovery build configuration into a compiler cfg.
//!
//! The Android build exports `VENDOR_INIT_RECOVERY=1` when compiling the
//! recovery ramdisk variant; cargo users enable the `recovery` feature instead.
//! Either one turns on `cfg(vendor_recovery)`.

use std::env;

fn main() {
    println!("cargo:rerun-if-env-changed=VENDOR_INIT_RECOVERY");
    println!("cargo:rustc-check-cfg=cfg(vendor_recovery)");

    let from_env = env::var("VENDOR_INIT_RECOVERY")
        .map(|v| matches!(v.as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false);
    let from_feature = env::var_os("CARGO_FEATURE_RECOVERY").is_some();

    if from_env || from_feature {
        println!("cargo:rustc-cfg=vendor_recovery");
    }
}
