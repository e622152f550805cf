//! Append-only record stores.
//!
//! Stores are only ever extended: there is no update and no delete. The
//! [`DeduplicatingAppender`] guards the natural key, so re-running ingestion
//! over the same filings adds nothing after the first run.

pub mod appender;
pub mod csv_file;
pub mod memory;

pub use appender::{AppendOutcome, DeduplicatingAppender};
pub use csv_file::CsvStore;
pub use memory::MemoryStore;

use crate::error::Result;
use crate::record::{FinancialRecord, RecordKey};

/// Persistent storage for financial records.
///
/// Implementations only need a full scan and a raw append; lookups are
/// derived from the scan, since the store has no random access.
pub trait RecordStore {
    /// Read every stored record in storage order.
    fn scan(&self) -> Result<Vec<FinancialRecord>>;

    /// Append one record without any duplicate check.
    fn push(&mut self, record: &FinancialRecord) -> Result<()>;

    /// Whether a record with this natural key is stored.
    fn contains(&self, key: &RecordKey) -> Result<bool> {
        Ok(self.scan()?.iter().any(|r| r.has_key(key)))
    }

    /// All stored records of one company, ordered by fiscal period.
    fn history(&self, company_id: &str) -> Result<Vec<FinancialRecord>> {
        let mut records: Vec<FinancialRecord> = self
            .scan()?
            .into_iter()
            .filter(|r| r.company_id == company_id)
            .collect();
        records.sort_by_key(FinancialRecord::period);
        Ok(records)
    }
}
