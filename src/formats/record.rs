//! The flat record format: one CSV row per transaction
//!
//! Data files carry no header row so sequentially appended scrapes compose
//! into one readable file; the header is written only when explicitly
//! requested.

use std::io::{Read, Write};

use csv::{ReaderBuilder, WriterBuilder};

use crate::ledger::statement::Statement;
use crate::ledger::transaction::{Transaction, RECORD_FIELD_COUNT};
use crate::types::{DecimalSeparator, StatementError, StatementResult};

/// Header row written when requested
pub const HEADER: [&str; RECORD_FIELD_COUNT] = [
    "Date",
    "Value-Date",
    "Description",
    "Amount",
    "New-Balance",
    "Raw-Amount",
    "Raw-New-Balance",
    "Raw-Description",
    "OFX-ID",
];

/// Write a statement's transactions, one row each, in list order
pub fn write_statement<W: Write>(
    writer: W,
    statement: &Statement,
    with_header: bool,
) -> StatementResult<()> {
    let mut wtr = WriterBuilder::new().from_writer(writer);
    if with_header {
        wtr.write_record(HEADER)?;
    }
    for txn in statement.transactions() {
        wtr.write_record(&txn.to_record_row())?;
    }
    wtr.flush()?;
    Ok(())
}

/// Read transactions back from the record format, in row order
pub fn read_transactions<R: Read>(
    reader: R,
    decimal_separator: DecimalSeparator,
    has_header: bool,
) -> StatementResult<Vec<Transaction>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(has_header)
        .flexible(true)
        .from_reader(reader);
    let mut transactions = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let row: Vec<String> = record.iter().map(str::to_string).collect();
        transactions.push(Transaction::from_record_row(&row, decimal_separator)?);
    }
    Ok(transactions)
}

/// Read a record file into a statement built from the given metadata
pub fn read_statement<R: Read>(
    reader: R,
    mut statement: Statement,
    decimal_separator: DecimalSeparator,
    has_header: bool,
) -> StatementResult<Statement> {
    if !statement.is_empty() {
        return Err(StatementError::Format(
            "target statement already contains transactions".to_string(),
        ));
    }
    for txn in read_transactions(reader, decimal_separator, has_header)? {
        statement.push(txn);
    }
    Ok(statement)
}
