//! OFX 2.x interchange document writer
//!
//! One document wraps one or more statements. The emitted element order
//! follows the OFX banking response layout: currency, source account,
//! transaction list, ledger balance, available balance.

use std::io::Write;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use uuid::Uuid;

use crate::ledger::statement::Statement;
use crate::ledger::transaction::Transaction;
use crate::normalize::{parse_amount, to_ofx_datetime};
use crate::types::{Payee, StatementError, StatementResult};

/// Fixed two-line preamble identifying the document as OFX version 200 with
/// no security and no old/new file markers
pub const PREAMBLE: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n",
    "<?OFX OFXHEADER=\"200\" VERSION=\"200\" SECURITY=\"NONE\" OLDFILEUID=\"NONE\" NEWFILEUID=\"NONE\"?>\n",
);

fn xml_err<E: std::fmt::Display>(e: E) -> StatementError {
    StatementError::Xml(e.to_string())
}

fn open<W: Write>(w: &mut Writer<W>, tag: &str) -> StatementResult<()> {
    w.write_event(Event::Start(BytesStart::new(tag)))
        .map_err(xml_err)
}

fn close<W: Write>(w: &mut Writer<W>, tag: &str) -> StatementResult<()> {
    w.write_event(Event::End(BytesEnd::new(tag)))
        .map_err(xml_err)
}

fn elem<W: Write>(w: &mut Writer<W>, tag: &str, text: &str) -> StatementResult<()> {
    open(w, tag)?;
    w.write_event(Event::Text(BytesText::new(text)))
        .map_err(xml_err)?;
    close(w, tag)
}

/// Write a complete OFX document wrapping the given statements
pub fn write_document<W: Write>(mut out: W, statements: &[Statement]) -> StatementResult<()> {
    out.write_all(PREAMBLE.as_bytes())?;

    let mut w = Writer::new_with_indent(&mut out, b' ', 2);
    open(&mut w, "OFX")?;
    open(&mut w, "BANKMSGSRSV1")?;
    for statement in statements {
        write_statement_response(&mut w, statement)?;
    }
    close(&mut w, "BANKMSGSRSV1")?;
    close(&mut w, "OFX")?;
    drop(w);

    out.write_all(b"\n")?;
    Ok(())
}

/// Render a complete OFX document as a string, ready for an upload sink
pub fn document_to_string(statements: &[Statement]) -> StatementResult<String> {
    let mut buf = Vec::new();
    write_document(&mut buf, statements)?;
    String::from_utf8(buf).map_err(xml_err)
}

fn write_statement_response<W: Write>(
    w: &mut Writer<W>,
    statement: &Statement,
) -> StatementResult<()> {
    open(w, "STMTTRNRS")?;
    elem(w, "TRNUID", &Uuid::new_v4().to_string())?;
    open(w, "STMTRS")?;

    elem(w, "CURDEF", &statement.currency)?;

    open(w, "BANKACCTFROM")?;
    if let Some(bank_id) = &statement.bank_id {
        elem(w, "BANKID", bank_id)?;
    }
    elem(w, "ACCTID", &statement.account_number)?;
    elem(w, "ACCTTYPE", statement.account_type.as_str())?;
    close(w, "BANKACCTFROM")?;

    open(w, "BANKTRANLIST")?;
    elem(w, "DTSTART", &to_ofx_datetime(statement.from_date().as_ref()))?;
    elem(w, "DTEND", &to_ofx_datetime(statement.to_date().as_ref()))?;
    for txn in statement.transactions() {
        write_transaction(w, txn)?;
    }
    close(w, "BANKTRANLIST")?;

    let as_of = to_ofx_datetime(statement.to_date().as_ref());
    write_balance(w, "LEDGERBAL", statement, statement.closing_balance(), &as_of)?;
    write_balance(
        w,
        "AVAILBAL",
        statement,
        statement.closing_available(),
        &as_of,
    )?;

    close(w, "STMTRS")?;
    close(w, "STMTTRNRS")
}

fn write_balance<W: Write>(
    w: &mut Writer<W>,
    tag: &str,
    statement: &Statement,
    raw: Option<String>,
    as_of: &str,
) -> StatementResult<()> {
    // Balance text is normalized to a plain base-10 number; an empty
    // statement has no balance to report
    let amount = raw
        .map(|text| {
            statement
                .transactions()
                .first()
                .map(|t| parse_amount(&text, t.decimal_separator))
                .unwrap_or_else(|| parse_amount(&text, Default::default()))
                .to_string()
        })
        .unwrap_or_default();

    open(w, tag)?;
    elem(w, "BALAMT", &amount)?;
    elem(w, "DTASOF", as_of)?;
    close(w, tag)
}

fn write_transaction<W: Write>(w: &mut Writer<W>, txn: &Transaction) -> StatementResult<()> {
    open(w, "STMTTRN")?;
    elem(w, "TRNTYPE", txn.trn_type.as_str())?;
    elem(w, "DTPOSTED", &to_ofx_datetime(txn.date.as_ref()))?;
    elem(w, "TRNAMT", &txn.real_amount().to_string())?;
    elem(w, "FITID", txn.id())?;
    if let Some(check_number) = &txn.check_number {
        elem(w, "CHECKNUM", check_number)?;
    }
    if let Some(payee) = &txn.payee {
        write_payee(w, payee)?;
    }
    elem(w, "MEMO", &txn.effective_description())?;
    close(w, "STMTTRN")
}

fn write_payee<W: Write>(w: &mut Writer<W>, payee: &Payee) -> StatementResult<()> {
    open(w, "PAYEE")?;
    elem(w, "NAME", &payee.name)?;
    elem(w, "ADDR1", &payee.address)?;
    elem(w, "CITY", &payee.city)?;
    elem(w, "STATE", &payee.state)?;
    elem(w, "POSTALCODE", &payee.postal_code)?;
    if let Some(country) = &payee.country {
        elem(w, "COUNTRY", country)?;
    }
    elem(w, "PHONE", &payee.phone)?;
    close(w, "PAYEE")
}
