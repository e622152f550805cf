//! In-memory store for tests and dry runs.

use crate::error::Result;
use crate::record::FinancialRecord;
use crate::store::RecordStore;

/// Vector-backed [`RecordStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<FinancialRecord>,
}

impl MemoryStore {
    /// Create a store that already holds `records`.
    pub const fn with_records(records: Vec<FinancialRecord>) -> Self {
        Self { records }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordStore for MemoryStore {
    fn scan(&self) -> Result<Vec<FinancialRecord>> {
        Ok(self.records.clone())
    }

    fn push(&mut self, record: &FinancialRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }
}
