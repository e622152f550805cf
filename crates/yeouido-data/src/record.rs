//! Canonical financial record model.
//!
//! Every amount in a record is expressed in the dataset's base unit (millions of
//! the reporting currency) so ratios and comparisons across records are valid.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DataError;

/// Fiscal quarter of a reporting period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FiscalQuarter {
    /// First quarter
    #[serde(alias = "1Q")]
    Q1,
    /// Second quarter
    #[serde(alias = "2Q")]
    Q2,
    /// Third quarter
    #[serde(alias = "3Q")]
    Q3,
    /// Fourth quarter
    #[serde(alias = "4Q")]
    Q4,
}

impl FiscalQuarter {
    /// All quarters in chronological order.
    pub const ALL: [Self; 4] = [Self::Q1, Self::Q2, Self::Q3, Self::Q4];

    /// Quarters whose standalone figures make up the cumulative fourth quarter.
    pub const BEFORE_Q4: [Self; 3] = [Self::Q1, Self::Q2, Self::Q3];

    /// Quarter number (1-4).
    pub const fn number(&self) -> u8 {
        match self {
            Self::Q1 => 1,
            Self::Q2 => 2,
            Self::Q3 => 3,
            Self::Q4 => 4,
        }
    }

    /// Quarter from its number (1-4).
    pub const fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Q1),
            2 => Some(Self::Q2),
            3 => Some(Self::Q3),
            4 => Some(Self::Q4),
            _ => None,
        }
    }

    /// Label used in the store and in messages.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Q1 => "Q1",
            Self::Q2 => "Q2",
            Self::Q3 => "Q3",
            Self::Q4 => "Q4",
        }
    }
}

impl fmt::Display for FiscalQuarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FiscalQuarter {
    type Err = DataError;

    /// Accepts both `Q3` and the `3Q` form used by older datasets.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "Q1" | "1Q" => Ok(Self::Q1),
            "Q2" | "2Q" => Ok(Self::Q2),
            "Q3" | "3Q" => Ok(Self::Q3),
            "Q4" | "4Q" => Ok(Self::Q4),
            other => Err(DataError::Parse(format!("Invalid fiscal quarter: {other}"))),
        }
    }
}

/// Natural key of a record: one company, one fiscal period.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordKey {
    /// Company identifier
    pub company_id: String,
    /// Fiscal year
    pub fiscal_year: i32,
    /// Fiscal quarter
    pub fiscal_quarter: FiscalQuarter,
}

impl RecordKey {
    /// Create a new record key.
    pub fn new(company_id: impl Into<String>, fiscal_year: i32, fiscal_quarter: FiscalQuarter) -> Self {
        Self {
            company_id: company_id.into(),
            fiscal_year,
            fiscal_quarter,
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.company_id, self.fiscal_year, self.fiscal_quarter)
    }
}

/// Sourced amount fields of a record, in the base unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Amounts {
    /// Revenue (sales)
    pub revenue: f64,
    /// Operating profit
    pub operating_profit: f64,
    /// Net income
    pub net_income: f64,
    /// Cash flow from operating activities
    pub operating_cash_flow: f64,
}

/// One company's reported metrics for one fiscal period, as stored.
///
/// The field order is the column order of the persistent store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialRecord {
    /// Company identifier
    pub company_id: String,
    /// Company name (may be in non-Latin script)
    pub company_name: String,
    /// Fiscal year
    pub fiscal_year: i32,
    /// Fiscal quarter
    pub fiscal_quarter: FiscalQuarter,

    /// Revenue (standalone quarter)
    pub revenue: f64,
    /// Operating profit (standalone quarter)
    pub operating_profit: f64,
    /// Net income (standalone quarter)
    pub net_income: f64,
    /// Cash flow from operating activities
    pub operating_cash_flow: f64,

    /// Operating margin in percent
    pub operating_margin: f64,
    /// Revenue growth versus the preceding period, in percent
    pub revenue_qoq: f64,
    /// Operating profit growth versus the preceding period, in percent
    pub profit_qoq: f64,
    /// Revenue growth versus the same quarter a year earlier, in percent
    pub revenue_yoy: f64,
    /// Operating profit growth versus the same quarter a year earlier, in percent
    pub profit_yoy: f64,
}

impl FinancialRecord {
    /// Natural key of this record.
    pub fn key(&self) -> RecordKey {
        RecordKey::new(self.company_id.clone(), self.fiscal_year, self.fiscal_quarter)
    }

    /// Whether this record has the given natural key.
    pub fn has_key(&self, key: &RecordKey) -> bool {
        self.company_id == key.company_id
            && self.fiscal_year == key.fiscal_year
            && self.fiscal_quarter == key.fiscal_quarter
    }

    /// Sourced amounts of this record.
    pub const fn amounts(&self) -> Amounts {
        Amounts {
            revenue: self.revenue,
            operating_profit: self.operating_profit,
            net_income: self.net_income,
            operating_cash_flow: self.operating_cash_flow,
        }
    }

    /// Chronological sort key within a company.
    pub const fn period(&self) -> (i32, FiscalQuarter) {
        (self.fiscal_year, self.fiscal_quarter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Q1", FiscalQuarter::Q1)]
    #[case("2Q", FiscalQuarter::Q2)]
    #[case(" q3 ", FiscalQuarter::Q3)]
    #[case("4q", FiscalQuarter::Q4)]
    fn test_quarter_from_str(#[case] input: &str, #[case] expected: FiscalQuarter) {
        assert_eq!(input.parse::<FiscalQuarter>().unwrap(), expected);
    }

    #[test]
    fn test_quarter_from_str_invalid() {
        assert!("Q5".parse::<FiscalQuarter>().is_err());
        assert!("FY".parse::<FiscalQuarter>().is_err());
    }

    #[test]
    fn test_quarter_ordering() {
        let mut quarters = vec![FiscalQuarter::Q4, FiscalQuarter::Q1, FiscalQuarter::Q3];
        quarters.sort();
        assert_eq!(quarters, vec![FiscalQuarter::Q1, FiscalQuarter::Q3, FiscalQuarter::Q4]);
        assert_eq!(FiscalQuarter::from_number(2), Some(FiscalQuarter::Q2));
        assert_eq!(FiscalQuarter::from_number(0), None);
        assert_eq!(FiscalQuarter::Q4.number(), 4);
    }

    #[test]
    fn test_record_key_display() {
        let key = RecordKey::new("00126380", 2024, FiscalQuarter::Q2);
        assert_eq!(key.to_string(), "00126380 2024 Q2");
    }
}
