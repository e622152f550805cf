//! Per-filing notification messages.

use yeouido_data::FinancialRecord;

/// Format an amount in millions with thousands separators, rounded to a whole
/// million.
///
/// # Examples
///
/// ```
/// use yeouido_output::format_amount;
///
/// assert_eq!(format_amount(79_098_712.4), "79,098,712");
/// assert_eq!(format_amount(-1_379.5), "-1,380");
/// assert_eq!(format_amount(0.0), "0");
/// ```
pub fn format_amount(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if rounded < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Format a percentage with an explicit sign and one decimal.
///
/// # Examples
///
/// ```
/// use yeouido_output::format_percent;
///
/// assert_eq!(format_percent(6.66), "+6.7%");
/// assert_eq!(format_percent(-12.84), "-12.8%");
/// ```
pub fn format_percent(value: f64) -> String {
    format!("{value:+.1}%")
}

/// Message announcing a newly processed filing.
pub fn filing_message(record: &FinancialRecord, report_title: &str) -> String {
    let mut lines = Vec::with_capacity(4);
    lines.push(format!(
        "[{}] {} {} ({})",
        record.company_name, record.fiscal_year, record.fiscal_quarter, report_title
    ));
    lines.push(format!(
        "Revenue {} (QoQ {}, YoY {})",
        format_amount(record.revenue),
        format_percent(record.revenue_qoq),
        format_percent(record.revenue_yoy)
    ));
    lines.push(format!(
        "Operating profit {} (QoQ {}, YoY {}), margin {:.1}%",
        format_amount(record.operating_profit),
        format_percent(record.profit_qoq),
        format_percent(record.profit_yoy),
        record.operating_margin
    ));
    lines.push(format!(
        "Net income {}, operating cash flow {}",
        format_amount(record.net_income),
        format_amount(record.operating_cash_flow)
    ));
    lines.join("\n")
}
