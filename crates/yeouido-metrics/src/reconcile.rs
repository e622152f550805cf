//! Fourth-quarter reconciliation.
//!
//! Fourth-quarter filings report year-to-date totals while the first three
//! quarters report the quarter alone. The standalone fourth quarter is the
//! cumulative figure minus the sum of Q1 to Q3 of the same fiscal year.
//!
//! Only records tagged [`PeriodBasis::Cumulative`] are transformed, so values
//! read back from the store (always standalone) are never reconciled twice.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use yeouido_data::{Amounts, FiscalQuarter, RecordKey};

use crate::growth::operating_margin;
use crate::normalize::{NormalizedRecord, PeriodBasis};

/// A record whose amounts all cover the quarter alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledRecord {
    /// Company identifier
    pub company_id: String,
    /// Company name
    pub company_name: String,
    /// Fiscal year
    pub fiscal_year: i32,
    /// Fiscal quarter
    pub fiscal_quarter: FiscalQuarter,
    /// Standalone amounts in the base unit
    pub amounts: Amounts,
    /// Operating margin in percent, computed from the standalone amounts
    pub operating_margin: f64,
}

impl ReconciledRecord {
    /// Natural key of this record.
    pub fn key(&self) -> RecordKey {
        RecordKey::new(self.company_id.clone(), self.fiscal_year, self.fiscal_quarter)
    }
}

/// A cumulative fourth quarter reconciled without all of Q1 to Q3.
///
/// Missing quarters count as zero, which overstates the standalone Q4.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileGap {
    /// Company identifier
    pub company_id: String,
    /// Fiscal year of the fourth quarter
    pub fiscal_year: i32,
    /// Quarters that were absent from the input
    pub missing: Vec<FiscalQuarter>,
}

/// Output of [`PeriodReconciler::reconcile`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciliation {
    /// Every input record, standalone, ordered by company and period
    pub records: Vec<ReconciledRecord>,
    /// Fourth quarters reconciled from an incomplete year
    pub gaps: Vec<ReconcileGap>,
}

impl Reconciliation {
    /// The reconciled record with this natural key, if present.
    pub fn get(&self, key: &RecordKey) -> Option<&ReconciledRecord> {
        self.records.iter().find(|r| {
            r.company_id == key.company_id
                && r.fiscal_year == key.fiscal_year
                && r.fiscal_quarter == key.fiscal_quarter
        })
    }
}

/// Year-to-date sum of the first three quarters.
#[derive(Debug, Default)]
struct YearToDate {
    revenue: f64,
    operating_profit: f64,
    net_income: f64,
    quarters: BTreeSet<FiscalQuarter>,
}

/// Converts cumulative fourth-quarter figures into standalone quarters.
#[derive(Debug, Clone, Copy, Default)]
pub struct PeriodReconciler;

impl PeriodReconciler {
    /// Reconcile a set of normalized records.
    ///
    /// The input should hold every available period of each company; callers
    /// pass stored history first and fresh filings after it. When a natural
    /// key occurs more than once the first occurrence wins.
    ///
    /// Revenue, operating profit and net income of a cumulative Q4 become
    /// `Q4 - (Q1 + Q2 + Q3)`. Operating cash flow is left as filed. Operating
    /// margin is recomputed for every record.
    pub fn reconcile(&self, records: &[NormalizedRecord]) -> Reconciliation {
        let mut unique: BTreeMap<RecordKey, &NormalizedRecord> = BTreeMap::new();
        for record in records {
            unique.entry(record.key()).or_insert(record);
        }

        let mut year_to_date: HashMap<(&str, i32), YearToDate> = HashMap::new();
        for record in unique.values() {
            if record.fiscal_quarter == FiscalQuarter::Q4 {
                continue;
            }
            let ytd = year_to_date
                .entry((record.company_id.as_str(), record.fiscal_year))
                .or_default();
            ytd.revenue += record.amounts.revenue;
            ytd.operating_profit += record.amounts.operating_profit;
            ytd.net_income += record.amounts.net_income;
            ytd.quarters.insert(record.fiscal_quarter);
        }

        let mut reconciliation = Reconciliation::default();
        for record in unique.values() {
            let mut amounts = record.amounts;

            if record.basis == PeriodBasis::Cumulative && record.fiscal_quarter == FiscalQuarter::Q4 {
                let ytd = year_to_date.get(&(record.company_id.as_str(), record.fiscal_year));
                if let Some(ytd) = ytd {
                    amounts.revenue -= ytd.revenue;
                    amounts.operating_profit -= ytd.operating_profit;
                    amounts.net_income -= ytd.net_income;
                }

                let missing: Vec<FiscalQuarter> = FiscalQuarter::BEFORE_Q4
                    .into_iter()
                    .filter(|q| !ytd.is_some_and(|ytd| ytd.quarters.contains(q)))
                    .collect();
                if !missing.is_empty() {
                    reconciliation.gaps.push(ReconcileGap {
                        company_id: record.company_id.clone(),
                        fiscal_year: record.fiscal_year,
                        missing,
                    });
                }
            }

            reconciliation.records.push(ReconciledRecord {
                company_id: record.company_id.clone(),
                company_name: record.company_name.clone(),
                fiscal_year: record.fiscal_year,
                fiscal_quarter: record.fiscal_quarter,
                amounts,
                operating_margin: operating_margin(amounts.revenue, amounts.operating_profit),
            });
        }

        reconciliation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn normalized(
        company_id: &str,
        year: i32,
        quarter: FiscalQuarter,
        revenue: f64,
        operating_profit: f64,
    ) -> NormalizedRecord {
        NormalizedRecord {
            company_id: company_id.to_string(),
            company_name: company_id.to_string(),
            fiscal_year: year,
            fiscal_quarter: quarter,
            basis: PeriodBasis::as_filed(quarter),
            amounts: Amounts {
                revenue,
                operating_profit,
                net_income: operating_profit / 2.0,
                operating_cash_flow: 77.0,
            },
        }
    }

    #[test]
    fn test_cumulative_q4_becomes_standalone() {
        let records = vec![
            normalized("A", 2024, FiscalQuarter::Q1, 100.0, 10.0),
            normalized("A", 2024, FiscalQuarter::Q2, 120.0, 12.0),
            normalized("A", 2024, FiscalQuarter::Q3, 130.0, 13.0),
            normalized("A", 2024, FiscalQuarter::Q4, 500.0, 50.0),
        ];

        let result = PeriodReconciler.reconcile(&records);
        let q4 = result
            .get(&RecordKey::new("A", 2024, FiscalQuarter::Q4))
            .unwrap();

        assert_relative_eq!(q4.amounts.revenue, 150.0);
        assert_relative_eq!(q4.amounts.operating_profit, 15.0);
        assert_relative_eq!(q4.amounts.net_income, 7.5);
        assert_relative_eq!(q4.amounts.operating_cash_flow, 77.0);
        assert_relative_eq!(q4.operating_margin, 10.0);
        assert!(result.gaps.is_empty());

        // Q1-Q3 are untouched
        let q2 = result
            .get(&RecordKey::new("A", 2024, FiscalQuarter::Q2))
            .unwrap();
        assert_relative_eq!(q2.amounts.revenue, 120.0);
    }

    #[test]
    fn test_standalone_q4_is_not_reconciled_again() {
        let mut stored_q4 = normalized("A", 2024, FiscalQuarter::Q4, 150.0, 15.0);
        stored_q4.basis = PeriodBasis::Standalone;
        let records = vec![
            normalized("A", 2024, FiscalQuarter::Q1, 100.0, 10.0),
            normalized("A", 2024, FiscalQuarter::Q2, 120.0, 12.0),
            normalized("A", 2024, FiscalQuarter::Q3, 130.0, 13.0),
            stored_q4,
        ];

        let result = PeriodReconciler.reconcile(&records);
        let q4 = result
            .get(&RecordKey::new("A", 2024, FiscalQuarter::Q4))
            .unwrap();
        assert_relative_eq!(q4.amounts.revenue, 150.0);
    }

    #[test]
    fn test_missing_quarters_count_as_zero_and_are_reported() {
        let records = vec![
            normalized("A", 2024, FiscalQuarter::Q2, 120.0, 12.0),
            normalized("A", 2024, FiscalQuarter::Q4, 500.0, 50.0),
            normalized("A", 2023, FiscalQuarter::Q4, 400.0, 40.0),
        ];

        let result = PeriodReconciler.reconcile(&records);

        let q4 = result
            .get(&RecordKey::new("A", 2024, FiscalQuarter::Q4))
            .unwrap();
        assert_relative_eq!(q4.amounts.revenue, 380.0);

        // No Q1-Q3 at all: Q4 is left as filed
        let q4_prev = result
            .get(&RecordKey::new("A", 2023, FiscalQuarter::Q4))
            .unwrap();
        assert_relative_eq!(q4_prev.amounts.revenue, 400.0);

        assert_eq!(
            result.gaps,
            vec![
                ReconcileGap {
                    company_id: "A".to_string(),
                    fiscal_year: 2023,
                    missing: vec![FiscalQuarter::Q1, FiscalQuarter::Q2, FiscalQuarter::Q3],
                },
                ReconcileGap {
                    company_id: "A".to_string(),
                    fiscal_year: 2024,
                    missing: vec![FiscalQuarter::Q1, FiscalQuarter::Q3],
                },
            ]
        );
    }

    #[test]
    fn test_companies_and_years_do_not_mix() {
        let records = vec![
            normalized("A", 2024, FiscalQuarter::Q1, 100.0, 10.0),
            normalized("B", 2024, FiscalQuarter::Q1, 1_000.0, 10.0),
            normalized("A", 2023, FiscalQuarter::Q1, 90.0, 10.0),
            normalized("A", 2024, FiscalQuarter::Q4, 300.0, 30.0),
        ];

        let result = PeriodReconciler.reconcile(&records);
        let q4 = result
            .get(&RecordKey::new("A", 2024, FiscalQuarter::Q4))
            .unwrap();
        assert_relative_eq!(q4.amounts.revenue, 200.0);
    }

    #[test]
    fn test_first_occurrence_wins_and_output_is_ordered() {
        let records = vec![
            normalized("B", 2024, FiscalQuarter::Q1, 5.0, 1.0),
            normalized("A", 2024, FiscalQuarter::Q2, 20.0, 2.0),
            normalized("A", 2024, FiscalQuarter::Q1, 10.0, 1.0),
            normalized("A", 2024, FiscalQuarter::Q1, 999.0, 1.0),
        ];

        let result = PeriodReconciler.reconcile(&records);
        let keys: Vec<RecordKey> = result.records.iter().map(ReconciledRecord::key).collect();
        assert_eq!(
            keys,
            vec![
                RecordKey::new("A", 2024, FiscalQuarter::Q1),
                RecordKey::new("A", 2024, FiscalQuarter::Q2),
                RecordKey::new("B", 2024, FiscalQuarter::Q1),
            ]
        );
        assert_relative_eq!(result.records[0].amounts.revenue, 10.0);
    }

    #[test]
    fn test_margin_recomputed_after_reconciliation() {
        // Cumulative margin is 10%, standalone Q4 margin is -20%
        let records = vec![
            normalized("A", 2024, FiscalQuarter::Q1, 300.0, 60.0),
            normalized("A", 2024, FiscalQuarter::Q4, 400.0, 40.0),
        ];
        let result = PeriodReconciler.reconcile(&records);
        let q4 = result
            .get(&RecordKey::new("A", 2024, FiscalQuarter::Q4))
            .unwrap();
        assert_relative_eq!(q4.operating_margin, -20.0);
    }
}
