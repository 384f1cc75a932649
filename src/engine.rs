//! Single-property override primitive

use crate::error::OverrideError;
use crate::store::PropertyStore;
use log::debug;

/// What a single override did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The property existed and its value was replaced.
    Updated,
    /// The property did not exist and was created.
    Added,
    /// The property did not exist and creation was not requested.
    Skipped,
}

/// Running tally of outcomes for one overrider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeCounts {
    pub updated: usize,
    pub added: usize,
    pub skipped: usize,
}

impl OutcomeCounts {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Updated => self.updated += 1,
            Outcome::Added => self.added += 1,
            Outcome::Skipped => self.skipped += 1,
        }
    }

    /// Writes that reached the store.
    pub fn written(&self) -> usize {
        self.updated + self.added
    }
}

/// Blind "last writer wins" overrides against a borrowed store.
///
/// The store is borrowed mutably for the lifetime of the overrider, so a boot
/// pass has exclusive access without any locking here.
pub struct Overrider<'a, S: PropertyStore + ?Sized> {
    store: &'a mut S,
    counts: OutcomeCounts,
}

impl<'a, S: PropertyStore + ?Sized> Overrider<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self {
            store,
            counts: OutcomeCounts::default(),
        }
    }

    /// Write `value` to `key`. A missing key is created only when
    /// `create_if_missing` is set; otherwise it is left alone.
    pub fn set(&mut self, key: &str, value: &str, create_if_missing: bool) -> Result<Outcome, OverrideError> {
        let outcome = if self.store.find(key).is_some() {
            Outcome::Updated
        } else if create_if_missing {
            Outcome::Added
        } else {
            debug!("{} absent, not creating", key);
            self.counts.record(Outcome::Skipped);
            return Ok(Outcome::Skipped);
        };

        self.store.upsert(key, value)?;
        debug!("{} = {} ({:?})", key, value, outcome);
        self.counts.record(outcome);
        Ok(outcome)
    }

    /// [`set`](Self::set) with creation enabled.
    pub fn set_or_add(&mut self, key: &str, value: &str) -> Result<Outcome, OverrideError> {
        self.set(key, value, true)
    }

    /// Outcomes of every successful call so far. Failed writes are not
    /// counted; they are reported through the returned errors.
    pub fn counts(&self) -> OutcomeCounts {
        self.counts
    }

    /// Read-only view of the underlying store.
    pub fn store(&self) -> &S {
        &*self.store
    }
}
