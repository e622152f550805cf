//! Integration tests for the file-backed append-only store

use tempfile::TempDir;
use yeouido_data::{
    AppendOutcome, CsvStore, DeduplicatingAppender, FinancialRecord, FiscalQuarter, RecordKey,
    RecordStore,
};

fn record(company_id: &str, name: &str, year: i32, quarter: FiscalQuarter) -> FinancialRecord {
    FinancialRecord {
        company_id: company_id.to_string(),
        company_name: name.to_string(),
        fiscal_year: year,
        fiscal_quarter: quarter,
        revenue: 100.0,
        operating_profit: 12.0,
        net_income: 9.0,
        operating_cash_flow: 15.0,
        operating_margin: 12.0,
        revenue_qoq: 0.0,
        profit_qoq: 0.0,
        revenue_yoy: 0.0,
        profit_yoy: 0.0,
    }
}

fn batch() -> Vec<FinancialRecord> {
    vec![
        record("00126380", "삼성전자", 2024, FiscalQuarter::Q1),
        record("00126380", "삼성전자", 2024, FiscalQuarter::Q2),
        record("00164779", "SK하이닉스", 2024, FiscalQuarter::Q1),
    ]
}

#[test]
fn test_repeated_batches_add_no_rows() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("financial_db.csv");

    let mut appender = DeduplicatingAppender::new(CsvStore::new(&path));
    for r in batch() {
        assert_eq!(appender.append(&r).unwrap(), AppendOutcome::Appended);
    }
    let after_first = std::fs::read_to_string(&path).unwrap();

    // A fresh handle over the same file sees every key
    let mut appender = DeduplicatingAppender::new(CsvStore::new(&path));
    for r in batch() {
        assert_eq!(appender.append(&r).unwrap(), AppendOutcome::Duplicate);
    }
    let after_second = std::fs::read_to_string(&path).unwrap();

    assert_eq!(after_first, after_second);
    assert_eq!(appender.store().scan().unwrap().len(), 3);
}

#[test]
fn test_natural_key_is_unique_over_overlapping_batches() {
    let dir = TempDir::new().unwrap();
    let mut appender = DeduplicatingAppender::new(CsvStore::new(dir.path().join("db.csv")));

    let overlapping = vec![
        record("00126380", "삼성전자", 2024, FiscalQuarter::Q2),
        record("00126380", "삼성전자", 2024, FiscalQuarter::Q3),
    ];
    for r in batch().iter().chain(overlapping.iter()) {
        let _ = appender.append(r).unwrap();
    }

    let stored = appender.store().scan().unwrap();
    let mut keys: Vec<RecordKey> = stored.iter().map(FinancialRecord::key).collect();
    let total = keys.len();
    keys.sort();
    keys.dedup();
    assert_eq!(keys.len(), total);
    assert_eq!(total, 4);

    let history = appender.history("00126380").unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[2].fiscal_quarter, FiscalQuarter::Q3);
}
