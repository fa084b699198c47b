//! Round-trip tests for the flat record format

use chrono::NaiveDate;
use statement_core::formats::record::{read_statement, read_transactions, write_statement, HEADER};
use statement_core::{
    DecimalSeparator, Payee, Statement, StatementError, Transaction, TransactionType,
};

fn sample_transaction() -> Transaction {
    let date = NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let mut txn = Transaction::new(
        Some(date),
        "COFFEE SHOP 42",
        "-3,20",
        TransactionType::Pos,
        "996,80",
        DecimalSeparator::Comma,
    );
    txn.value_date = NaiveDate::from_ymd_opt(2024, 3, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .into();
    txn
}

#[test]
fn test_transaction_row_round_trip() {
    let txn = sample_transaction();
    let row = txn.to_record_row();
    let back = Transaction::from_record_row(&row, DecimalSeparator::Comma).unwrap();
    assert_eq!(back, txn);
    assert_eq!(back.id(), txn.id());
    assert_eq!(back.raw_description, "COFFEE SHOP 42");
    assert_eq!(back.value_date, txn.value_date);
}

#[test]
fn test_transaction_row_layout() {
    let mut txn = sample_transaction();
    txn.set_description("Coffee Shop");
    txn.payee = Some(Payee::named("Big Coffee"));

    let row = txn.to_record_row();
    assert_eq!(row[0], "2024-03-01 00:00:00");
    assert_eq!(row[1], "2024-03-02 00:00:00");
    // Payee name prefixes the effective description
    assert_eq!(row[2], "Big Coffee - Coffee Shop");
    assert_eq!(row[3], "-3.20");
    assert_eq!(row[4], "996.80");
    assert_eq!(row[5], "-3,20");
    assert_eq!(row[6], "996,80");
    assert_eq!(row[7], "COFFEE SHOP 42");
    assert_eq!(row[8], txn.id());
}

#[test]
fn test_round_trip_ignores_derived_numerics() {
    let txn = sample_transaction();
    let mut row = txn.to_record_row();
    // Tamper with the derived columns: they are recomputed, not trusted
    row[3] = "9999".to_string();
    row[4] = "9999".to_string();
    let back = Transaction::from_record_row(&row, DecimalSeparator::Comma).unwrap();
    assert_eq!(back, txn);
    assert_eq!(back.to_record_row()[3], "-3.20");
}

#[test]
fn test_round_trip_preserves_assigned_id() {
    let txn = sample_transaction();
    let mut row = txn.to_record_row();
    row[8] = "previously-written-id".to_string();
    let back = Transaction::from_record_row(&row, DecimalSeparator::Comma).unwrap();
    // An externally assigned id is pinned, never recomputed
    assert_eq!(back.id(), "previously-written-id");
}

#[test]
fn test_wrong_field_count_is_a_format_error() {
    let row: Vec<String> = (0..8).map(|i| i.to_string()).collect();
    let err = Transaction::from_record_row(&row, DecimalSeparator::Period).unwrap_err();
    assert!(matches!(err, StatementError::Format(_)));
}

#[test]
fn test_statement_round_trip() {
    let mut statement = Statement::builder("12345678")
        .currency("EUR")
        .build()
        .unwrap();
    statement.push(sample_transaction());
    let mut second = sample_transaction();
    second.raw_description = "GROCERIES".to_string();
    statement.push(second);

    let mut buf = Vec::new();
    write_statement(&mut buf, &statement, false).unwrap();

    let back = read_statement(
        buf.as_slice(),
        Statement::builder("12345678").currency("EUR").build().unwrap(),
        DecimalSeparator::Comma,
        false,
    )
    .unwrap();
    assert_eq!(back, statement);
}

#[test]
fn test_statement_file_round_trip_with_header() {
    let mut statement = Statement::new("12345678").unwrap();
    statement.push(sample_transaction());

    let file = tempfile::NamedTempFile::new().unwrap();
    write_statement(file.reopen().unwrap(), &statement, true).unwrap();

    let written = std::fs::read_to_string(file.path()).unwrap();
    assert!(written.starts_with(&HEADER.join(",")));

    let back = read_transactions(
        std::fs::File::open(file.path()).unwrap(),
        DecimalSeparator::Comma,
        true,
    )
    .unwrap();
    assert_eq!(back, statement.transactions());
}

#[test]
fn test_sequential_appends_compose() {
    // No header in data files, so two appended scrapes read back as one list
    let mut first = Statement::new("12345678").unwrap();
    first.push(sample_transaction());
    let mut second = Statement::new("12345678").unwrap();
    let mut other = sample_transaction();
    other.raw_description = "RENT".to_string();
    second.push(other);

    let mut buf = Vec::new();
    write_statement(&mut buf, &first, false).unwrap();
    write_statement(&mut buf, &second, false).unwrap();

    let all = read_transactions(buf.as_slice(), DecimalSeparator::Comma, false).unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0], first.transactions()[0]);
    assert_eq!(all[1], second.transactions()[0]);
}
