//! Duplicate-rejecting append over a [`RecordStore`].

use tracing::debug;

use crate::error::Result;
use crate::record::{FinancialRecord, RecordKey};
use crate::store::RecordStore;

/// Result of an append attempt.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// The record was new and has been appended.
    Appended,
    /// A record with the same natural key is already stored; nothing was written.
    Duplicate,
}

impl AppendOutcome {
    /// Whether a row was written.
    pub const fn is_appended(&self) -> bool {
        matches!(self, Self::Appended)
    }
}

/// Appends fully derived records, rejecting natural-key duplicates.
///
/// Assumes a single writer per store.
#[derive(Debug)]
pub struct DeduplicatingAppender<S> {
    store: S,
}

impl<S: RecordStore> DeduplicatingAppender<S> {
    /// Wrap a store.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Append `record` unless its natural key is already stored.
    ///
    /// A duplicate is an expected outcome on repeated runs, not an error;
    /// the stored row stays authoritative.
    pub fn append(&mut self, record: &FinancialRecord) -> Result<AppendOutcome> {
        let key = record.key();
        if self.store.contains(&key)? {
            debug!(%key, "record already stored");
            return Ok(AppendOutcome::Duplicate);
        }
        self.store.push(record)?;
        debug!(%key, "record appended");
        Ok(AppendOutcome::Appended)
    }

    /// Whether a record with this natural key is stored.
    pub fn contains(&self, key: &RecordKey) -> Result<bool> {
        self.store.contains(key)
    }

    /// All stored records of one company, ordered by fiscal period.
    pub fn history(&self, company_id: &str) -> Result<Vec<FinancialRecord>> {
        self.store.history(company_id)
    }

    /// The wrapped store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Unwrap the store.
    pub fn into_inner(self) -> S {
        self.store
    }
}
