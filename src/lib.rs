//! vayu-vendor-init: vendor property overrides for the vayu/bhima boards
//!
//! Produces `libvayu_vendor_init.a` for linking into the device `init`
//! through `vendor_init_load_properties()`.
//!
//! ## Build for Android
//! ```bash
//! cargo install cargo-ndk
//! rustup target add aarch64-linux-android
//! cargo ndk -t arm64-v8a build --release
//! # recovery ramdisk variant
//! cargo ndk -t arm64-v8a build --release --features recovery
//! ```
//!
//! Output: `target/<triple>/release/libvayu_vendor_init.a`
//!
//! Off device, [`MemoryStore`] stands in for the property area:
//!
//! ```
//! use vayu_vendor_init::{load_properties, InitOptions, MemoryStore};
//!
//! let mut props: MemoryStore = [("ro.boot.hwc", "INDIA")].into_iter().collect();
//! let report = load_properties(&mut props, &InitOptions::default());
//! assert!(report.is_clean());
//! assert_eq!(props.get("ro.product.vendor.device"), Some("bhima"));
//! ```

pub mod bionic;
pub mod engine;
pub mod error;
pub mod expand;
pub mod heap;
pub mod init;
pub mod recovery;
pub mod store;
pub mod table;
pub mod variant;

pub use bionic::BionicStore;
pub use engine::{Outcome, OutcomeCounts, Overrider};
pub use error::{OverrideError, OverrideErrors};
pub use heap::{select_heap_preset, HeapPreset};
pub use init::{load_properties, vendor_init_load_properties, InitOptions, InitReport};
pub use store::{MemoryStore, PropertyStore};
pub use table::{apply_table, PropOverride, PropTable};
pub use variant::{select_variant, VariantFactSheet};
