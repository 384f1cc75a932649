//! Property store capability
//!
//! The property area belongs to the host `init`; this crate only reaches it
//! through [`PropertyStore`]. [`MemoryStore`] is the in-process stand-in used
//! by tests and by host-side dry runs.

use crate::error::OverrideError;
use std::collections::BTreeMap;

/// Maximum value length (including the terminating NUL) for properties
/// outside the `ro.` namespace. Matches bionic's `PROP_VALUE_MAX`.
pub const PROP_VALUE_MAX: usize = 92;

/// Read/write access to a system property namespace.
///
/// Implementations provide no internal locking; `upsert` takes `&mut self`
/// and concurrent users must serialize access themselves.
pub trait PropertyStore {
    /// Current value of `key`, or `None` if it does not exist.
    fn find(&self, key: &str) -> Option<String>;

    /// Overwrite `key` if present, insert it otherwise.
    fn upsert(&mut self, key: &str, value: &str) -> Result<(), OverrideError>;

    /// Value of `key`, or `default` when absent or empty.
    fn get_or(&self, key: &str, default: &str) -> String {
        match self.find(key) {
            Some(v) if !v.is_empty() => v,
            _ => default.to_string(),
        }
    }
}

/// Validate a property name the way the property service does.
pub fn validate_key(key: &str) -> Result<(), OverrideError> {
    let invalid = |reason| {
        Err(OverrideError::InvalidKey {
            key: key.to_string(),
            reason,
        })
    };

    if key.is_empty() {
        return invalid("empty name");
    }
    if key.starts_with('.') || key.ends_with('.') {
        return invalid("leading or trailing '.'");
    }
    if key.contains("..") {
        return invalid("empty path segment");
    }
    let legal = |c: char| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | '@' | ':');
    if !key.chars().all(legal) {
        return invalid("illegal character");
    }
    Ok(())
}

/// Validate a value for `key`. Read-only (`ro.`) properties may exceed
/// [`PROP_VALUE_MAX`]; everything else must fit with its NUL terminator.
pub fn validate_value(key: &str, value: &str) -> Result<(), OverrideError> {
    if value.contains('\0') {
        return Err(OverrideError::InvalidKey {
            key: key.to_string(),
            reason: "value contains NUL",
        });
    }
    if !key.starts_with("ro.") && value.len() >= PROP_VALUE_MAX {
        return Err(OverrideError::ValueTooLong {
            key: key.to_string(),
            len: value.len(),
            max: PROP_VALUE_MAX - 1,
        });
    }
    Ok(())
}

/// Ordered in-memory property namespace.
///
/// An optional entry limit models the fixed-size shared memory area: once
/// full, new names are refused with [`OverrideError::CapacityExceeded`] while
/// existing names can still be updated in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    props: BTreeMap<String, String>,
    capacity: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that accepts at most `capacity` distinct names.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            props: BTreeMap::new(),
            capacity: Some(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.props.len()
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.props.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.props.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            props: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            capacity: None,
        }
    }
}

impl PropertyStore for MemoryStore {
    fn find(&self, key: &str) -> Option<String> {
        self.props.get(key).cloned()
    }

    fn upsert(&mut self, key: &str, value: &str) -> Result<(), OverrideError> {
        validate_key(key)?;
        validate_value(key, value)?;

        if let Some(slot) = self.props.get_mut(key) {
            value.clone_into(slot);
            return Ok(());
        }
        if self.capacity.is_some_and(|cap| self.props.len() >= cap) {
            return Err(OverrideError::CapacityExceeded {
                key: key.to_string(),
            });
        }
        self.props.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
