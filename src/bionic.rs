//! bionic property area access
//!
//! Thin wrapper over the libc-private `__system_property_*` entry points that
//! the init process uses to write read-only properties before the property
//! service starts. Only `init` (and its vendor hooks) may call these; from any
//! other process the area is mapped read-only.

use crate::error::OverrideError;
use crate::store::{validate_key, validate_value, PropertyStore};

#[cfg(target_os = "android")]
use libc::{c_char, c_int, c_uint, c_void};
#[cfg(target_os = "android")]
use std::ffi::{CStr, CString};

#[cfg(target_os = "android")]
#[allow(non_camel_case_types)]
#[repr(C)]
struct prop_info {
    _private: [u8; 0],
}

#[cfg(target_os = "android")]
extern "C" {
    fn __system_property_find(name: *const c_char) -> *const prop_info;
    fn __system_property_update(pi: *mut prop_info, value: *const c_char, len: c_uint) -> c_int;
    fn __system_property_add(
        name: *const c_char,
        namelen: c_uint,
        value: *const c_char,
        valuelen: c_uint,
    ) -> c_int;
    fn __system_property_read_callback(
        pi: *const prop_info,
        callback: unsafe extern "C" fn(*mut c_void, *const c_char, *const c_char, u32),
        cookie: *mut c_void,
    );
}

#[cfg(target_os = "android")]
unsafe extern "C" fn copy_value(
    cookie: *mut c_void,
    _name: *const c_char,
    value: *const c_char,
    _serial: u32,
) {
    let out = &mut *(cookie as *mut Option<String>);
    if !value.is_null() {
        *out = Some(CStr::from_ptr(value).to_string_lossy().into_owned());
    }
}

/// Classify the return code of `__system_property_add`.
///
/// bionic returns -1 both when the area is out of space and when no property
/// context covers the name, without saying which. The name was already
/// validated, and contexts for every name this crate writes ship with the
/// vendor image, so -1 is reported as a full area. Any other nonzero code is
/// passed through as `Rejected`.
#[cfg_attr(not(target_os = "android"), allow(dead_code))]
fn add_result(key: &str, ret: i32) -> Result<(), OverrideError> {
    match ret {
        0 => Ok(()),
        -1 => Err(OverrideError::CapacityExceeded {
            key: key.to_string(),
        }),
        code => Err(OverrideError::Rejected {
            key: key.to_string(),
            code,
        }),
    }
}

/// The live property area of the current process.
#[derive(Debug)]
pub struct BionicStore {
    _priv: (),
}

impl BionicStore {
    /// Handle onto the process property area.
    #[cfg(target_os = "android")]
    pub fn open() -> Result<Self, OverrideError> {
        Ok(Self { _priv: () })
    }

    #[cfg(not(target_os = "android"))]
    pub fn open() -> Result<Self, OverrideError> {
        Err(OverrideError::Unsupported)
    }

    #[cfg(target_os = "android")]
    fn c_name(key: &str) -> Result<CString, OverrideError> {
        CString::new(key).map_err(|_| OverrideError::InvalidKey {
            key: key.to_string(),
            reason: "name contains NUL",
        })
    }
}

impl PropertyStore for BionicStore {
    #[cfg(target_os = "android")]
    fn find(&self, key: &str) -> Option<String> {
        let name = Self::c_name(key).ok()?;
        let pi = unsafe { __system_property_find(name.as_ptr()) };
        if pi.is_null() {
            return None;
        }
        let mut out: Option<String> = None;
        unsafe {
            __system_property_read_callback(pi, copy_value, &mut out as *mut _ as *mut c_void);
        }
        out
    }

    #[cfg(not(target_os = "android"))]
    fn find(&self, _key: &str) -> Option<String> {
        None
    }

    #[cfg(target_os = "android")]
    fn upsert(&mut self, key: &str, value: &str) -> Result<(), OverrideError> {
        validate_key(key)?;
        validate_value(key, value)?;

        let name = Self::c_name(key)?;
        // validate_value already refused interior NULs
        let val = CString::new(value).map_err(|_| OverrideError::InvalidKey {
            key: key.to_string(),
            reason: "value contains NUL",
        })?;
        let value_len = value.len() as c_uint;

        let pi = unsafe { __system_property_find(name.as_ptr()) };
        if !pi.is_null() {
            let ret = unsafe { __system_property_update(pi as *mut prop_info, val.as_ptr(), value_len) };
            if ret != 0 {
                return Err(OverrideError::Rejected {
                    key: key.to_string(),
                    code: ret,
                });
            }
            return Ok(());
        }

        let ret = unsafe {
            __system_property_add(name.as_ptr(), key.len() as c_uint, val.as_ptr(), value_len)
        };
        add_result(key, ret)
    }

    #[cfg(not(target_os = "android"))]
    fn upsert(&mut self, key: &str, value: &str) -> Result<(), OverrideError> {
        validate_key(key)?;
        validate_value(key, value)?;
        Err(OverrideError::Unsupported)
    }
}
