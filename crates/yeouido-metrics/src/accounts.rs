//! Canonical account resolution.
//!
//! Filers label the same account differently, and the same filer may change
//! labels between years. Every known label is listed under exactly one
//! canonical field; within a field the first label present in a filing wins.

use std::collections::HashMap;
use std::fmt;

use yeouido_data::{ReportingScope, StatementRow};

/// Canonical amount fields of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    /// Revenue (sales)
    Revenue,
    /// Operating profit
    OperatingProfit,
    /// Net income
    NetIncome,
    /// Cash flow from operating activities
    OperatingCashFlow,
}

impl CanonicalField {
    /// All canonical fields.
    pub const ALL: [Self; 4] = [
        Self::Revenue,
        Self::OperatingProfit,
        Self::NetIncome,
        Self::OperatingCashFlow,
    ];

    /// Column name used in the store.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Revenue => "revenue",
            Self::OperatingProfit => "operating_profit",
            Self::NetIncome => "net_income",
            Self::OperatingCashFlow => "operating_cash_flow",
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Labels are compared with all whitespace removed.
fn label_key(label: &str) -> String {
    label.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Maps each canonical field to its known labels, in precedence order.
#[derive(Debug, Clone)]
pub struct AccountTable {
    labels: HashMap<CanonicalField, Vec<String>>,
}

impl AccountTable {
    /// Create a table with the standard label synonyms.
    pub fn standard() -> Self {
        let mut labels: HashMap<CanonicalField, Vec<String>> = HashMap::new();

        labels.insert(
            CanonicalField::Revenue,
            ["매출액", "수익(매출액)", "영업수익", "매출", "Revenue", "Revenues"]
                .map(String::from)
                .to_vec(),
        );

        labels.insert(
            CanonicalField::OperatingProfit,
            ["영업이익", "영업이익(손실)", "Operating profit", "Operating income"]
                .map(String::from)
                .to_vec(),
        );

        labels.insert(
            CanonicalField::NetIncome,
            [
                "당기순이익",
                "당기순이익(손실)",
                "순이익",
                "분기순이익",
                "분기순이익(손실)",
                "반기순이익",
                "반기순이익(손실)",
                "연결당기순이익",
                "Net income",
            ]
            .map(String::from)
            .to_vec(),
        );

        labels.insert(
            CanonicalField::OperatingCashFlow,
            [
                "영업활동현금흐름",
                "영업활동으로 인한 현금흐름",
                "영업현금흐름",
                "Operating cash flow",
            ]
            .map(String::from)
            .to_vec(),
        );

        Self { labels }
    }

    /// Create an empty table.
    pub fn empty() -> Self {
        Self {
            labels: HashMap::new(),
        }
    }

    /// Append a label to a field's synonyms, after the existing ones.
    pub fn with_label(mut self, field: CanonicalField, label: impl Into<String>) -> Self {
        self.labels.entry(field).or_default().push(label.into());
        self
    }

    /// Known labels of a field, in precedence order.
    pub fn labels(&self, field: CanonicalField) -> &[String] {
        self.labels.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The raw value of the first label of `field` present in `accounts`.
    ///
    /// `None` means no synonym is present at all. `Some(None)` means the
    /// account is listed without a value.
    pub fn resolve<'a>(
        &self,
        field: CanonicalField,
        accounts: &'a AccountMap,
    ) -> Option<Option<&'a str>> {
        self.labels(field)
            .iter()
            .find_map(|label| accounts.get(label))
    }
}

impl Default for AccountTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Account label to raw value mapping for one filing.
#[derive(Debug, Clone, Default)]
pub struct AccountMap {
    values: HashMap<String, Option<String>>,
}

impl AccountMap {
    /// Build from label/value pairs; the first occurrence of a label wins.
    pub fn from_pairs<I, L>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (L, Option<String>)>,
        L: AsRef<str>,
    {
        let mut values = HashMap::new();
        for (label, value) in pairs {
            values.entry(label_key(label.as_ref())).or_insert(value);
        }
        Self { values }
    }

    /// Build from statement rows of one scope, using current-period amounts.
    ///
    /// When an account appears in several statements (net income is listed in
    /// both the income and cash flow statements) the first row wins.
    pub fn from_rows(rows: &[StatementRow], scope: ReportingScope) -> Self {
        Self::from_pairs(
            rows.iter()
                .filter(|row| row.scope == scope)
                .map(|row| (row.account_name.as_str(), row.current_amount.clone())),
        )
    }

    /// Raw value listed under `label`, if the label is present.
    pub fn get(&self, label: &str) -> Option<Option<&str>> {
        self.values
            .get(&label_key(label))
            .map(|value| value.as_deref())
    }

    /// Number of distinct labels.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no labels are present.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
