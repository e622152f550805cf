//! Error types for data operations.

use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur during data operations.
#[derive(Debug, Error)]
pub enum DataError {
    /// Network error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Disclosure API returned a non-success status
    #[error("Disclosure API error {status}: {message}")]
    Api {
        /// Status code reported by the API body
        status: String,
        /// Message reported by the API body
        message: String,
    },

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(String),

    /// No statement rows were available for the requested period
    #[error("Missing statement for {company_id} {fiscal_year} {fiscal_quarter}")]
    MissingStatement {
        /// Company that was queried
        company_id: String,
        /// Fiscal year that was queried
        fiscal_year: i32,
        /// Fiscal quarter label that was queried
        fiscal_quarter: String,
    },

    /// Invalid date range
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date of the range
        start: String,
        /// End date of the range
        end: String,
    },

    /// Data parsing error
    #[error("Data parsing error: {0}")]
    Parse(String),

    /// Store read/write error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DataError {
    /// Whether the error came from talking to the upstream disclosure source.
    ///
    /// Upstream failures only affect the company being fetched; the batch
    /// carries on with the next filing.
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Api { .. } | Self::Http(_) | Self::MissingStatement { .. }
        )
    }
}
