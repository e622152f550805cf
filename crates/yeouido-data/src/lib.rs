#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/yeouido/yeouido/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod dart;
pub mod error;
pub mod record;
pub mod store;

pub use dart::{
    DartClient, DisclosureSource, Filing, FilingPeriod, ReportKind, ReportingScope, StatementRow,
};
pub use error::{DataError, Result};
pub use record::{Amounts, FinancialRecord, FiscalQuarter, RecordKey};
pub use store::{AppendOutcome, CsvStore, DeduplicatingAppender, MemoryStore, RecordStore};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
