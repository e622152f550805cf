//! Filing metadata and statement rows returned by the disclosure source.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::record::{FiscalQuarter, RecordKey};

/// A filing listed by the disclosure source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filing {
    /// Company identifier assigned by the source
    pub company_id: String,
    /// Company name
    pub company_name: String,
    /// Exchange ticker, when the company is listed
    pub stock_code: Option<String>,
    /// Report title, e.g. `분기보고서 (2024.09)`
    pub report_title: String,
    /// Unique receipt identifier of the filing
    pub receipt_id: String,
    /// Date the filing was received
    pub receipt_date: NaiveDate,
}

impl Filing {
    /// Fiscal period covered by this filing, if it is a periodic report.
    pub fn period(&self) -> Option<FilingPeriod> {
        FilingPeriod::from_title(&self.report_title)
    }

    /// Kind of periodic report, regardless of its fiscal calendar.
    pub fn report_kind(&self) -> Option<ReportKind> {
        ReportKind::from_title(strip_tags(&self.report_title))
    }

    /// Whether the title marks this filing as a correction of an earlier one.
    pub fn is_amendment(&self) -> bool {
        self.report_title.trim_start().starts_with('[')
    }

    /// Natural key this filing would produce, if it is a periodic report.
    pub fn key(&self) -> Option<RecordKey> {
        self.period()
            .map(|p| RecordKey::new(self.company_id.clone(), p.fiscal_year, p.fiscal_quarter))
    }
}

/// Kind of periodic report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportKind {
    /// First or third quarter report (`분기보고서`)
    Quarterly,
    /// Half-year report (`반기보고서`)
    HalfYear,
    /// Annual business report (`사업보고서`)
    Annual,
}

impl ReportKind {
    /// Classify a report title (without amendment tags).
    fn from_title(title: &str) -> Option<Self> {
        if title.starts_with("사업보고서") {
            Some(Self::Annual)
        } else if title.starts_with("반기보고서") {
            Some(Self::HalfYear)
        } else if title.starts_with("분기보고서") {
            Some(Self::Quarterly)
        } else {
            None
        }
    }
}

/// Fiscal period a periodic report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilingPeriod {
    /// Kind of report
    pub kind: ReportKind,
    /// Fiscal year
    pub fiscal_year: i32,
    /// Fiscal quarter
    pub fiscal_quarter: FiscalQuarter,
}

impl FilingPeriod {
    /// Parse a report title such as `[기재정정]사업보고서 (2023.12)`.
    ///
    /// Periods follow a December fiscal year end: quarterly reports close in
    /// March (Q1) or September (Q3), half-year reports in June (Q2) and annual
    /// reports in December (Q4). Returns `None` for non-periodic titles, titles
    /// without a `(YYYY.MM)` period, and reports whose closing month belongs to
    /// a different fiscal calendar, since their quarters cannot be placed in a
    /// fiscal year from the title alone.
    pub fn from_title(title: &str) -> Option<Self> {
        let title = strip_tags(title);
        let kind = ReportKind::from_title(title)?;

        let open = title.find('(')?;
        let close = title[open..].find(')')? + open;
        let (year, month) = title[open + 1..close].trim().split_once('.')?;
        let fiscal_year: i32 = year.trim().parse().ok()?;
        let month: u32 = month.trim().parse().ok()?;

        let fiscal_quarter = match (kind, month) {
            (ReportKind::Quarterly, 3) => FiscalQuarter::Q1,
            (ReportKind::HalfYear, 6) => FiscalQuarter::Q2,
            (ReportKind::Quarterly, 9) => FiscalQuarter::Q3,
            (ReportKind::Annual, 12) => FiscalQuarter::Q4,
            _ => return None,
        };

        Some(Self {
            kind,
            fiscal_year,
            fiscal_quarter,
        })
    }
}

/// Leading `[...]` tags such as `[기재정정]` or `[첨부추가]`.
fn strip_tags(mut title: &str) -> &str {
    title = title.trim();
    while let Some(rest) = title.strip_prefix('[') {
        match rest.find(']') {
            Some(end) => title = rest[end + 1..].trim_start(),
            None => break,
        }
    }
    title
}

/// Which set of statements a row belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportingScope {
    /// Consolidated statements (parent and subsidiaries)
    #[default]
    Consolidated,
    /// Separate statements of the parent entity only
    Separate,
}

impl ReportingScope {
    /// Code the disclosure API uses for this scope.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Consolidated => "CFS",
            Self::Separate => "OFS",
        }
    }

    /// The other scope, used as a fallback.
    pub const fn fallback(&self) -> Self {
        match self {
            Self::Consolidated => Self::Separate,
            Self::Separate => Self::Consolidated,
        }
    }
}

/// One account row of a financial statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementRow {
    /// Statement the row belongs to (`BS`, `IS`, `CIS`, `CF`, ...)
    pub statement: String,
    /// Account label as written by the filer
    pub account_name: String,
    /// Reporting scope of the statement
    pub scope: ReportingScope,
    /// Raw current-period amount
    pub current_amount: Option<String>,
    /// Raw prior-period amount
    pub prior_amount: Option<String>,
}
