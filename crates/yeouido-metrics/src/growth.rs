//! Growth and margin derivation.
//!
//! Growth is always computed from a company's complete reconciled history,
//! never from a filtered subset: the QoQ comparison is against the preceding
//! stored period, and a filter applied first would change which period that is.
//!
//! Every derived value is finite. A missing comparison period, or a
//! comparison value of zero, yields a growth rate of zero.

use std::collections::HashMap;

use yeouido_data::{FinancialRecord, FiscalQuarter};

use crate::reconcile::ReconciledRecord;

/// Percentage change from `prior` to `current`.
///
/// Zero when `prior` is zero or the result is not finite.
pub fn growth_rate(current: f64, prior: f64) -> f64 {
    if prior == 0.0 {
        return 0.0;
    }
    let rate = (current - prior) * 100.0 / prior;
    if rate.is_finite() { rate } else { 0.0 }
}

/// Operating profit as a percentage of revenue.
///
/// Zero unless revenue is strictly positive.
pub fn operating_margin(revenue: f64, operating_profit: f64) -> f64 {
    if revenue <= 0.0 {
        return 0.0;
    }
    let margin = operating_profit * 100.0 / revenue;
    if margin.is_finite() { margin } else { 0.0 }
}

/// Derives QoQ, YoY and margin fields from reconciled histories.
#[derive(Debug, Clone, Copy, Default)]
pub struct GrowthCalculator;

impl GrowthCalculator {
    /// Derive every record of `history`.
    ///
    /// `history` may hold several companies in any order; each company's
    /// series is ordered by (fiscal year, fiscal quarter) before comparison.
    /// The output follows that order, grouped by company. Input records are
    /// not modified.
    pub fn derive(&self, history: &[ReconciledRecord]) -> Vec<FinancialRecord> {
        let mut ordered: Vec<&ReconciledRecord> = history.iter().collect();
        ordered.sort_by(|a, b| {
            (a.company_id.as_str(), a.fiscal_year, a.fiscal_quarter).cmp(&(
                b.company_id.as_str(),
                b.fiscal_year,
                b.fiscal_quarter,
            ))
        });

        // (company, quarter, year) -> record, for the year-ago lookup
        let by_period: HashMap<(&str, FiscalQuarter, i32), &ReconciledRecord> = ordered
            .iter()
            .map(|r| ((r.company_id.as_str(), r.fiscal_quarter, r.fiscal_year), *r))
            .collect();

        let mut derived = Vec::with_capacity(ordered.len());
        let mut previous: Option<&ReconciledRecord> = None;
        for record in ordered {
            let prior = previous.filter(|p| p.company_id == record.company_id);
            let year_ago = by_period
                .get(&(
                    record.company_id.as_str(),
                    record.fiscal_quarter,
                    record.fiscal_year - 1,
                ))
                .copied();

            let amounts = record.amounts;
            let qoq = |value: fn(&ReconciledRecord) -> f64| {
                prior.map_or(0.0, |p| growth_rate(value(record), value(p)))
            };
            let yoy = |value: fn(&ReconciledRecord) -> f64| {
                year_ago.map_or(0.0, |p| growth_rate(value(record), value(p)))
            };

            derived.push(FinancialRecord {
                company_id: record.company_id.clone(),
                company_name: record.company_name.clone(),
                fiscal_year: record.fiscal_year,
                fiscal_quarter: record.fiscal_quarter,
                revenue: amounts.revenue,
                operating_profit: amounts.operating_profit,
                net_income: amounts.net_income,
                operating_cash_flow: amounts.operating_cash_flow,
                operating_margin: operating_margin(amounts.revenue, amounts.operating_profit),
                revenue_qoq: qoq(revenue),
                profit_qoq: qoq(operating_profit),
                revenue_yoy: yoy(revenue),
                profit_yoy: yoy(operating_profit),
            });

            previous = Some(record);
        }

        derived
    }
}

const fn revenue(record: &ReconciledRecord) -> f64 {
    record.amounts.revenue
}

const fn operating_profit(record: &ReconciledRecord) -> f64 {
    record.amounts.operating_profit
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;
    use yeouido_data::Amounts;

    fn reconciled(
        company_id: &str,
        year: i32,
        quarter: FiscalQuarter,
        revenue: f64,
        operating_profit: f64,
    ) -> ReconciledRecord {
        ReconciledRecord {
            company_id: company_id.to_string(),
            company_name: format!("{company_id} Corp"),
            fiscal_year: year,
            fiscal_quarter: quarter,
            amounts: Amounts {
                revenue,
                operating_profit,
                net_income: 0.0,
                operating_cash_flow: 0.0,
            },
            operating_margin: operating_margin(revenue, operating_profit),
        }
    }

    #[rstest]
    #[case(120.0, 100.0, 20.0)]
    #[case(80.0, 100.0, -20.0)]
    #[case(50.0, 0.0, 0.0)]
    #[case(0.0, 0.0, 0.0)]
    #[case(-50.0, -100.0, -50.0)]
    fn test_growth_rate(#[case] current: f64, #[case] prior: f64, #[case] expected: f64) {
        assert_relative_eq!(growth_rate(current, prior), expected);
    }

    #[rstest]
    #[case(200.0, 30.0, 15.0)]
    #[case(0.0, 30.0, 0.0)]
    #[case(0.0, -30.0, 0.0)]
    #[case(-100.0, 10.0, 0.0)]
    #[case(100.0, -5.0, -5.0)]
    fn test_operating_margin(#[case] revenue: f64, #[case] profit: f64, #[case] expected: f64) {
        let margin = operating_margin(revenue, profit);
        assert!(margin.is_finite());
        assert_relative_eq!(margin, expected);
    }

    #[test]
    fn test_first_period_has_zero_growth() {
        let history = vec![
            reconciled("A", 2024, FiscalQuarter::Q2, 120.0, 12.0),
            reconciled("A", 2024, FiscalQuarter::Q1, 100.0, 10.0),
        ];

        let derived = GrowthCalculator.derive(&history);
        assert_eq!(derived[0].fiscal_quarter, FiscalQuarter::Q1);
        assert_eq!(derived[0].revenue_qoq, 0.0);
        assert_eq!(derived[0].profit_qoq, 0.0);
        assert_relative_eq!(derived[1].revenue_qoq, 20.0);
        assert_relative_eq!(derived[1].profit_qoq, 20.0);
    }

    #[test]
    fn test_qoq_crosses_year_boundary() {
        let history = vec![
            reconciled("A", 2023, FiscalQuarter::Q4, 200.0, 20.0),
            reconciled("A", 2024, FiscalQuarter::Q1, 100.0, 30.0),
        ];

        let derived = GrowthCalculator.derive(&history);
        assert_relative_eq!(derived[1].revenue_qoq, -50.0);
        assert_relative_eq!(derived[1].profit_qoq, 50.0);
    }

    #[test]
    fn test_qoq_uses_preceding_record_of_same_company() {
        let history = vec![
            reconciled("A", 2024, FiscalQuarter::Q1, 100.0, 10.0),
            reconciled("B", 2024, FiscalQuarter::Q1, 400.0, 40.0),
            reconciled("B", 2024, FiscalQuarter::Q2, 500.0, 50.0),
        ];

        let derived = GrowthCalculator.derive(&history);
        let b_q1 = &derived[1];
        assert_eq!(b_q1.company_id, "B");
        assert_eq!(b_q1.revenue_qoq, 0.0);
        assert_relative_eq!(derived[2].revenue_qoq, 25.0);
    }

    #[test]
    fn test_yoy_matches_same_quarter_a_year_earlier() {
        let history = vec![
            reconciled("A", 2023, FiscalQuarter::Q1, 80.0, 8.0),
            reconciled("A", 2023, FiscalQuarter::Q2, 90.0, 9.0),
            reconciled("A", 2024, FiscalQuarter::Q1, 100.0, 10.0),
            reconciled("A", 2024, FiscalQuarter::Q2, 135.0, 18.0),
        ];

        let derived = GrowthCalculator.derive(&history);
        assert_relative_eq!(derived[2].revenue_yoy, 25.0);
        assert_relative_eq!(derived[2].profit_yoy, 25.0);
        assert_relative_eq!(derived[3].revenue_yoy, 50.0);
        assert_relative_eq!(derived[3].profit_yoy, 100.0);
    }

    #[test]
    fn test_missing_year_ago_has_zero_yoy() {
        let history = vec![
            reconciled("A", 2022, FiscalQuarter::Q3, 50.0, 5.0),
            reconciled("A", 2024, FiscalQuarter::Q3, 100.0, 10.0),
            reconciled("B", 2023, FiscalQuarter::Q3, 10.0, 1.0),
        ];

        let derived = GrowthCalculator.derive(&history);
        let a_2024 = &derived[1];
        assert_eq!(a_2024.fiscal_year, 2024);
        assert_eq!(a_2024.revenue_yoy, 0.0);
        assert_eq!(a_2024.profit_yoy, 0.0);
        // QoQ still compares against the preceding stored period
        assert_relative_eq!(a_2024.revenue_qoq, 100.0);
    }

    #[test]
    fn test_zero_prior_values_floor_growth_at_zero() {
        let history = vec![
            reconciled("A", 2023, FiscalQuarter::Q4, 0.0, 0.0),
            reconciled("A", 2024, FiscalQuarter::Q4, 100.0, 10.0),
        ];

        let derived = GrowthCalculator.derive(&history);
        let last = &derived[1];
        for value in [
            last.revenue_qoq,
            last.profit_qoq,
            last.revenue_yoy,
            last.profit_yoy,
            derived[0].operating_margin,
        ] {
            assert_eq!(value, 0.0);
        }
    }

    #[test]
    fn test_amounts_pass_through() {
        let mut record = reconciled("A", 2024, FiscalQuarter::Q1, 100.0, 10.0);
        record.amounts.net_income = 7.0;
        record.amounts.operating_cash_flow = -3.0;

        let derived = GrowthCalculator.derive(std::slice::from_ref(&record));
        assert_eq!(derived[0].company_name, "A Corp");
        assert_eq!(derived[0].net_income, 7.0);
        assert_eq!(derived[0].operating_cash_flow, -3.0);
        assert_relative_eq!(derived[0].operating_margin, 10.0);
    }
}
