//! End-of-run summary.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// What happened to one filing during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilingOutcome {
    /// A new record was appended.
    Appended,
    /// The period was already stored.
    Duplicate,
    /// Not a periodic report, filtered out, or no statement available.
    Skipped,
    /// Fetching or storing failed; the batch moved on.
    Failed,
}

/// Counts for one ingestion run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// First receipt date covered by the run.
    pub period_start: NaiveDate,

    /// Last receipt date covered by the run.
    pub period_end: NaiveDate,

    /// Filings listed by the source.
    pub filings_seen: usize,

    /// Records appended to the store.
    pub appended: usize,

    /// Filings whose period was already stored.
    pub duplicates: usize,

    /// Filings skipped without an error.
    pub skipped: usize,

    /// Filings that failed.
    pub errors: usize,
}

impl RunSummary {
    /// Start an empty summary for a run over `[period_start, period_end]`.
    pub const fn new(period_start: NaiveDate, period_end: NaiveDate) -> Self {
        Self {
            period_start,
            period_end,
            filings_seen: 0,
            appended: 0,
            duplicates: 0,
            skipped: 0,
            errors: 0,
        }
    }

    /// Count one filing's outcome.
    pub const fn record(&mut self, outcome: FilingOutcome) {
        match outcome {
            FilingOutcome::Appended => self.appended += 1,
            FilingOutcome::Duplicate => self.duplicates += 1,
            FilingOutcome::Skipped => self.skipped += 1,
            FilingOutcome::Failed => self.errors += 1,
        }
    }

    /// Filings that reached a final outcome.
    pub const fn processed(&self) -> usize {
        self.appended + self.duplicates + self.skipped + self.errors
    }

    /// Filings processed without an error.
    pub const fn successes(&self) -> usize {
        self.appended + self.duplicates
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Run {}..{}: {} filings, {} appended, {} duplicates, {} skipped, {} errors",
            self.period_start,
            self.period_end,
            self.filings_seen,
            self.appended,
            self.duplicates,
            self.skipped,
            self.errors
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts_and_display() {
        let start = NaiveDate::from_ymd_opt(2024, 11, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 11, 15).unwrap();
        let mut summary = RunSummary::new(start, end);
        summary.filings_seen = 5;

        for outcome in [
            FilingOutcome::Appended,
            FilingOutcome::Appended,
            FilingOutcome::Duplicate,
            FilingOutcome::Skipped,
            FilingOutcome::Failed,
        ] {
            summary.record(outcome);
        }

        assert_eq!(summary.processed(), 5);
        assert_eq!(summary.successes(), 3);
        assert_eq!(
            summary.to_string(),
            "Run 2024-11-01..2024-11-15: 5 filings, 2 appended, 1 duplicates, 1 skipped, 1 errors"
        );
    }
}
