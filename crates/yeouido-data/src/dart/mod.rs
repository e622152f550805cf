//! Upstream disclosure source.
//!
//! This module provides access to periodic filings:
//! - Listing the filings received in a date range
//! - Classifying report titles into fiscal periods
//! - Fetching the account rows of a filing's financial statements
//!
//! # Example
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use yeouido_data::dart::{DartClient, DisclosureSource, ReportingScope};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = DartClient::new("api-key")?;
//!     let start = NaiveDate::from_ymd_opt(2024, 11, 1).unwrap();
//!     let end = NaiveDate::from_ymd_opt(2024, 11, 15).unwrap();
//!
//!     for filing in client.list_filings(start, end).await? {
//!         if let Some(period) = filing.period() {
//!             let rows = client
//!                 .fetch_statement(&filing.company_id, period, ReportingScope::Consolidated)
//!                 .await?;
//!             println!("{} {}: {} rows", filing.company_name, filing.report_title, rows.len());
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod filings;

pub use client::DartClient;
pub use filings::{Filing, FilingPeriod, ReportKind, ReportingScope, StatementRow};

use crate::error::Result;
use chrono::NaiveDate;

/// A source of periodic filings and their statement rows.
///
/// Calls are awaited one at a time by the ingestion pipeline.
#[allow(async_fn_in_trait)]
pub trait DisclosureSource {
    /// List the filings received between `start` and `end` (inclusive).
    async fn list_filings(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Filing>>;

    /// Fetch the account rows of one company's statements for a period.
    ///
    /// An empty list means the source has no statement of that scope.
    async fn fetch_statement(
        &self,
        company_id: &str,
        period: FilingPeriod,
        scope: ReportingScope,
    ) -> Result<Vec<StatementRow>>;
}
