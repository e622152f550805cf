//! Record normalization.
//!
//! Turns one filing's account rows into a canonical record: labels resolved
//! through the [`AccountTable`], raw strings coerced to numbers, and every
//! amount scaled to the dataset's base unit. Normalization never fails: a
//! field that cannot be parsed becomes zero and is reported beside the record.

use serde::{Deserialize, Serialize};
use yeouido_data::{Amounts, FinancialRecord, FiscalQuarter, RecordKey};

use crate::accounts::{AccountMap, AccountTable, CanonicalField};

/// Divisor applied to every sourced amount: raw currency units to millions.
pub const UNIT_DIVISOR: f64 = 1_000_000.0;

/// How a record's amounts relate to its fiscal period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeriodBasis {
    /// Amounts cover the quarter alone.
    Standalone,
    /// Amounts are year-to-date totals, as filed for the fourth quarter.
    Cumulative,
}

impl PeriodBasis {
    /// Basis of a freshly filed quarter.
    pub const fn as_filed(quarter: FiscalQuarter) -> Self {
        match quarter {
            FiscalQuarter::Q4 => Self::Cumulative,
            _ => Self::Standalone,
        }
    }
}

/// A canonical record before reconciliation and growth derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    /// Company identifier
    pub company_id: String,
    /// Company name
    pub company_name: String,
    /// Fiscal year
    pub fiscal_year: i32,
    /// Fiscal quarter
    pub fiscal_quarter: FiscalQuarter,
    /// Basis of the amounts
    pub basis: PeriodBasis,
    /// Amounts in the base unit
    pub amounts: Amounts,
}

impl NormalizedRecord {
    /// Natural key of this record.
    pub fn key(&self) -> RecordKey {
        RecordKey::new(self.company_id.clone(), self.fiscal_year, self.fiscal_quarter)
    }
}

/// Stored records are already standalone and are never reconciled again.
impl From<&FinancialRecord> for NormalizedRecord {
    fn from(record: &FinancialRecord) -> Self {
        Self {
            company_id: record.company_id.clone(),
            company_name: record.company_name.clone(),
            fiscal_year: record.fiscal_year,
            fiscal_quarter: record.fiscal_quarter,
            basis: PeriodBasis::Standalone,
            amounts: record.amounts(),
        }
    }
}

/// Result of normalizing one filing.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalization {
    /// The canonical record
    pub record: NormalizedRecord,
    /// Fields whose raw value could not be parsed and were set to zero
    pub malformed: Vec<CanonicalField>,
}

/// Outcome of coercing one raw value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coerced {
    /// A parsed amount
    Value(f64),
    /// An empty value or a placeholder such as `-`
    Blank,
    /// Text that is not a number
    Malformed,
}

impl Coerced {
    /// The amount, with blanks and malformed values as zero.
    pub const fn or_zero(self) -> f64 {
        match self {
            Self::Value(v) => v,
            Self::Blank | Self::Malformed => 0.0,
        }
    }
}

/// Coerce a raw amount string.
///
/// Strips thousands separators and whitespace. Parenthesised amounts and
/// amounts prefixed with `△` are negative.
pub fn coerce_amount(raw: &str) -> Coerced {
    let mut s = raw.trim();
    if s.is_empty() || s == "-" {
        return Coerced::Blank;
    }

    let mut negative = false;
    if let Some(inner) = s.strip_prefix('(').and_then(|rest| rest.strip_suffix(')')) {
        negative = true;
        s = inner;
    } else if let Some(rest) = s.strip_prefix('△') {
        negative = true;
        s = rest;
    }

    let cleaned: String = s.chars().filter(|c| *c != ',' && !c.is_whitespace()).collect();
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => Coerced::Value(if negative { -v } else { v }),
        _ => Coerced::Malformed,
    }
}

/// Builds canonical records from account maps.
#[derive(Debug, Clone, Default)]
pub struct RecordNormalizer {
    table: AccountTable,
}

impl RecordNormalizer {
    /// Create a normalizer with the standard label table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a normalizer with a custom label table.
    pub const fn with_table(table: AccountTable) -> Self {
        Self { table }
    }

    /// The label table in use.
    pub const fn table(&self) -> &AccountTable {
        &self.table
    }

    /// Normalize one filing.
    ///
    /// Absent fields resolve to zero. The fourth quarter is tagged
    /// [`PeriodBasis::Cumulative`], as filed.
    pub fn normalize(
        &self,
        key: RecordKey,
        company_name: &str,
        accounts: &AccountMap,
    ) -> Normalization {
        let mut malformed = Vec::new();
        let mut amount = |field: CanonicalField| -> f64 {
            let coerced = self
                .table
                .resolve(field, accounts)
                .flatten()
                .map_or(Coerced::Blank, coerce_amount);
            if coerced == Coerced::Malformed {
                malformed.push(field);
            }
            coerced.or_zero() / UNIT_DIVISOR
        };

        let amounts = Amounts {
            revenue: amount(CanonicalField::Revenue),
            operating_profit: amount(CanonicalField::OperatingProfit),
            net_income: amount(CanonicalField::NetIncome),
            operating_cash_flow: amount(CanonicalField::OperatingCashFlow),
        };

        Normalization {
            record: NormalizedRecord {
                basis: PeriodBasis::as_filed(key.fiscal_quarter),
                company_id: key.company_id,
                company_name: company_name.trim().to_string(),
                fiscal_year: key.fiscal_year,
                fiscal_quarter: key.fiscal_quarter,
                amounts,
            },
            malformed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case("1,234,567", Coerced::Value(1_234_567.0))]
    #[case("-98,000", Coerced::Value(-98_000.0))]
    #[case("(5,000)", Coerced::Value(-5_000.0))]
    #[case("△12,500", Coerced::Value(-12_500.0))]
    #[case(" 42 ", Coerced::Value(42.0))]
    #[case("0", Coerced::Value(0.0))]
    #[case("", Coerced::Blank)]
    #[case("-", Coerced::Blank)]
    #[case("N/A", Coerced::Malformed)]
    #[case("NaN", Coerced::Malformed)]
    #[case("12.3.4", Coerced::Malformed)]
    fn test_coerce_amount(#[case] raw: &str, #[case] expected: Coerced) {
        assert_eq!(coerce_amount(raw), expected);
    }

    fn accounts(pairs: &[(&str, &str)]) -> AccountMap {
        AccountMap::from_pairs(pairs.iter().map(|(l, v)| (*l, Some(v.to_string()))))
    }

    #[test]
    fn test_normalize_scales_and_zero_fills() {
        let normalizer = RecordNormalizer::new();
        let key = RecordKey::new("00126380", 2024, FiscalQuarter::Q3);
        let accounts = accounts(&[
            ("매출액", "79,098,700,000,000"),
            ("영업이익", "9,183,400,000,000"),
            ("자산총계", "500"),
        ]);

        let result = normalizer.normalize(key, " 삼성전자 ", &accounts);
        let record = result.record;

        assert_eq!(record.company_name, "삼성전자");
        assert_eq!(record.basis, PeriodBasis::Standalone);
        assert_relative_eq!(record.amounts.revenue, 79_098_700.0);
        assert_relative_eq!(record.amounts.operating_profit, 9_183_400.0);
        assert_eq!(record.amounts.net_income, 0.0);
        assert_eq!(record.amounts.operating_cash_flow, 0.0);
        assert!(result.malformed.is_empty());
    }

    #[test]
    fn test_malformed_field_defaults_to_zero() {
        let normalizer = RecordNormalizer::new();
        let key = RecordKey::new("A", 2024, FiscalQuarter::Q1);
        let accounts = accounts(&[("매출액", "3,000,000"), ("영업이익", "unknown")]);

        let result = normalizer.normalize(key, "Alpha", &accounts);
        assert_relative_eq!(result.record.amounts.revenue, 3.0);
        assert_eq!(result.record.amounts.operating_profit, 0.0);
        assert_eq!(result.malformed, vec![CanonicalField::OperatingProfit]);
    }

    #[test]
    fn test_listed_account_without_value_is_blank() {
        let normalizer = RecordNormalizer::new();
        let key = RecordKey::new("A", 2024, FiscalQuarter::Q1);
        let accounts = AccountMap::from_pairs([("당기순이익", None)]);

        let result = normalizer.normalize(key, "Alpha", &accounts);
        assert_eq!(result.record.amounts.net_income, 0.0);
        assert!(result.malformed.is_empty());
    }

    #[test]
    fn test_fourth_quarter_is_cumulative_as_filed() {
        let normalizer = RecordNormalizer::new();
        let key = RecordKey::new("A", 2024, FiscalQuarter::Q4);
        let result = normalizer.normalize(key, "Alpha", &AccountMap::default());
        assert_eq!(result.record.basis, PeriodBasis::Cumulative);
    }

    #[test]
    fn test_stored_record_converts_as_standalone() {
        let stored = FinancialRecord {
            company_id: "A".to_string(),
            company_name: "Alpha".to_string(),
            fiscal_year: 2023,
            fiscal_quarter: FiscalQuarter::Q4,
            revenue: 150.0,
            operating_profit: 15.0,
            net_income: 10.0,
            operating_cash_flow: 20.0,
            operating_margin: 10.0,
            revenue_qoq: 0.0,
            profit_qoq: 0.0,
            revenue_yoy: 0.0,
            profit_yoy: 0.0,
        };
        let record = NormalizedRecord::from(&stored);
        assert_eq!(record.basis, PeriodBasis::Standalone);
        assert_eq!(record.amounts.revenue, 150.0);
        assert_eq!(record.key(), stored.key());
    }
}
