//! Override error taxonomy

use std::fmt;

/// Failure of a single property write.
///
/// A missing key with `create_if_missing == false` is not an error; see
/// [`crate::engine::Outcome::Skipped`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OverrideError {
    #[error("invalid property name {key:?}: {reason}")]
    InvalidKey { key: String, reason: &'static str },

    #[error("value for {key} is {len} bytes, limit is {max}")]
    ValueTooLong { key: String, len: usize, max: usize },

    #[error("property area full, cannot add {key}")]
    CapacityExceeded { key: String },

    #[error("property store rejected {key} (code {code})")]
    Rejected { key: String, code: i32 },

    #[error("system properties not supported on this target")]
    Unsupported,
}

impl OverrideError {
    /// The property name involved, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            OverrideError::InvalidKey { key, .. }
            | OverrideError::ValueTooLong { key, .. }
            | OverrideError::CapacityExceeded { key }
            | OverrideError::Rejected { key, .. } => Some(key.as_str()),
            OverrideError::Unsupported => None,
        }
    }
}

/// Failures collected from a best-effort batch of writes. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideErrors(Vec<OverrideError>);

impl OverrideErrors {
    /// `Ok(())` for an empty list, otherwise the aggregate.
    pub fn check(errors: Vec<OverrideError>) -> Result<(), OverrideErrors> {
        if errors.is_empty() {
            Ok(())
        } else {
            Err(OverrideErrors(errors))
        }
    }

    pub fn errors(&self) -> &[OverrideError] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<OverrideError> {
        self.0
    }
}

impl fmt::Display for OverrideErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} property override(s) failed", self.0.len())?;
        for err in &self.0 {
            write!(f, "; {}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for OverrideErrors {}

impl From<OverrideError> for OverrideErrors {
    fn from(err: OverrideError) -> Self {
        OverrideErrors(vec![err])
    }
}
