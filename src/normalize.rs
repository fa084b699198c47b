//! Money and date normalization for scraped statement fields
//!
//! Scraped sources disagree on decimal separators and date spellings; the
//! rest of the crate only ever sees values that went through this module.
//! The OFX encoding produced by [`to_ofx_datetime`] doubles as the canonical
//! date rendering used by transaction identity.

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::types::{DecimalSeparator, StatementError, StatementResult};

/// Formats tried, in order, by [`parse_flexible_datetime`]
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y%m%d%H%M%S", "%d/%m/%Y %H:%M:%S"];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y%m%d", "%d/%m/%Y", "%d.%m.%Y", "%d-%m-%Y"];

/// Strip locale noise from amount text and return the plain base-10 spelling
fn normalize_amount_text(text: &str, sep: DecimalSeparator) -> String {
    let stripped: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    match sep {
        // "." is a thousands separator, "," carries the decimals
        DecimalSeparator::Comma => stripped.replace('.', "").replace(',', "."),
        // "," is a thousands separator
        DecimalSeparator::Period => stripped.replace(',', ""),
    }
}

/// Parse a locale-formatted amount, coercing unparsable text to zero
///
/// This mirrors the lenient reference behavior: scraped junk (including an
/// empty cell) becomes `0` rather than aborting the whole statement. Use
/// [`parse_amount_strict`] when ledger-grade input is required.
pub fn parse_amount(text: &str, sep: DecimalSeparator) -> BigDecimal {
    normalize_amount_text(text, sep)
        .parse::<BigDecimal>()
        .unwrap_or_else(|_| BigDecimal::from(0))
}

/// Parse a locale-formatted amount, rejecting unparsable text
pub fn parse_amount_strict(text: &str, sep: DecimalSeparator) -> StatementResult<BigDecimal> {
    let normalized = normalize_amount_text(text, sep);
    normalized.parse::<BigDecimal>().map_err(|_| {
        StatementError::Validation(format!("amount '{}' is not a number", text.trim()))
    })
}

/// Render an instant in the fixed-width interchange encoding `YYYYMMDDHHMMSS`
///
/// An absent instant renders as the empty string. This is the canonical date
/// encoding: transaction identity always goes through it, never through the
/// in-memory representation.
pub fn to_ofx_datetime(instant: Option<&NaiveDateTime>) -> String {
    match instant {
        Some(dt) => dt.format("%Y%m%d%H%M%S").to_string(),
        None => String::new(),
    }
}

/// Render an instant in the record-format encoding `YYYY-MM-DD HH:MM:SS`
pub fn to_record_datetime(instant: Option<&NaiveDateTime>) -> String {
    match instant {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => String::new(),
    }
}

/// Best-effort parse of free-form scraped date text
///
/// Blank input means "no date" and yields `Ok(None)`. Anything that matches
/// none of the known formats — including the malformed two-digit-year
/// artifacts some sources emit as zero-padded 14-digit strings — fails with a
/// [`StatementError::Format`] the caller can catch; nothing is guessed
/// silently and nothing panics.
pub fn parse_flexible_datetime(raw: &str) -> StatementResult<Option<NaiveDateTime>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(Some(dt));
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Ok(Some(d.and_time(NaiveTime::MIN)));
        }
    }

    Err(StatementError::Format(format!(
        "unrecognized date text '{}'",
        trimmed
    )))
}
