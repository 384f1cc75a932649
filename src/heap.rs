//! Dalvik heap sizing by installed RAM

use crate::engine::Overrider;
use crate::error::{OverrideError, OverrideErrors};
use crate::store::PropertyStore;

/// Devices below this much RAM get the 6 GiB heap profile.
pub const HIGH_MEM_THRESHOLD: u64 = 6144 * 1024 * 1024;

/// ART heap tuning values, written to `dalvik.vm.*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapPreset {
    pub heapstartsize: &'static str,
    pub heapgrowthlimit: &'static str,
    pub heapsize: &'static str,
    pub heapmaxfree: &'static str,
    pub heaptargetutilization: &'static str,
    pub heapminfree: &'static str,
}

impl HeapPreset {
    /// `(property, value)` pairs in write order.
    pub fn props(&self) -> [(&'static str, &'static str); 6] {
        [
            ("dalvik.vm.heapstartsize", self.heapstartsize),
            ("dalvik.vm.heapgrowthlimit", self.heapgrowthlimit),
            ("dalvik.vm.heapsize", self.heapsize),
            ("dalvik.vm.heapmaxfree", self.heapmaxfree),
            ("dalvik.vm.heaptargetutilization", self.heaptargetutilization),
            ("dalvik.vm.heapminfree", self.heapminfree),
        ]
    }
}

/// phone-xhdpi-6144-dalvik-heap
pub static LOW_MEM: HeapPreset = HeapPreset {
    heapstartsize: "16m",
    heapgrowthlimit: "256m",
    heapsize: "512m",
    heapmaxfree: "32m",
    heaptargetutilization: "0.5",
    heapminfree: "8m",
};

/// 8 GB and 12 GB variants
pub static HIGH_MEM: HeapPreset = HeapPreset {
    heapstartsize: "32m",
    heapgrowthlimit: "512m",
    heapsize: "768m",
    heapmaxfree: "64m",
    heaptargetutilization: "0.5",
    heapminfree: "8m",
};

pub fn select_heap_preset(total_ram_bytes: u64) -> &'static HeapPreset {
    if total_ram_bytes < HIGH_MEM_THRESHOLD {
        &LOW_MEM
    } else {
        &HIGH_MEM
    }
}

/// Write all six heap properties, continuing past failures.
pub fn apply_heap_preset<S: PropertyStore + ?Sized>(
    ov: &mut Overrider<'_, S>,
    preset: &HeapPreset,
) -> Result<(), OverrideErrors> {
    let errors: Vec<OverrideError> = preset
        .props()
        .iter()
        .filter_map(|(key, value)| ov.set_or_add(key, value).err())
        .collect();
    OverrideErrors::check(errors)
}

/// Total physical memory as reported by the kernel.
#[cfg(any(target_os = "android", target_os = "linux"))]
pub fn total_ram_bytes() -> Result<u64, std::io::Error> {
    let mut info: libc::sysinfo = unsafe { std::mem::zeroed() };
    let ret = unsafe { libc::sysinfo(&mut info) };
    if ret < 0 {
        return Err(std::io::Error::last_os_error());
    }
    // totalram is counted in mem_unit-sized blocks
    let unit = u64::from(info.mem_unit.max(1));
    Ok((info.totalram as u64).saturating_mul(unit))
}

#[cfg(not(any(target_os = "android", target_os = "linux")))]
pub fn total_ram_bytes() -> Result<u64, std::io::Error> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "sysinfo only supported on Android/Linux",
    ))
}
