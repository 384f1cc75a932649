//! Recovery ramdisk debug relaxation

use crate::engine::Overrider;
use crate::error::{OverrideError, OverrideErrors};
use crate::store::PropertyStore;
use log::info;

pub const BUILD_TYPE_PROP: &str = "ro.build.type";
pub const DEFAULT_BUILD_TYPE: &str = "userdebug";

const RELAXED: [(&str, &str); 2] = [("ro.debuggable", "1"), ("ro.adb.secure.recovery", "0")];

/// On anything but a `user` build, make recovery debuggable and drop adb
/// authentication. Returns whether the relaxation was applied.
pub fn relax_debug_if_non_production<S: PropertyStore + ?Sized>(
    ov: &mut Overrider<'_, S>,
    build_type: &str,
) -> Result<bool, OverrideErrors> {
    if build_type == "user" {
        return Ok(false);
    }
    info!("{} build, relaxing recovery adb", build_type);

    let errors: Vec<OverrideError> = RELAXED
        .iter()
        .filter_map(|(key, value)| ov.set_or_add(key, value).err())
        .collect();
    OverrideErrors::check(errors).map(|()| true)
}
