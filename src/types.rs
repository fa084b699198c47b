//! Core types and data structures for the statement ledger

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::normalize::to_record_datetime;

/// Transaction types following the OFX vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    Credit,
    Debit,
    /// Interest earned or paid
    Int,
    /// Dividend
    Div,
    Fee,
    /// Service charge
    SrvChg,
    /// Deposit
    Dep,
    Atm,
    /// Point of sale
    Pos,
    /// Transfer
    Xfer,
    Check,
    Payment,
    Cash,
    /// Direct deposit
    DirectDep,
    DirectDebit,
    /// Repeating payment / standing order
    RepeatPmt,
    Other,
}

impl TransactionType {
    /// Returns the OFX spelling of this transaction type
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Credit => "CREDIT",
            TransactionType::Debit => "DEBIT",
            TransactionType::Int => "INT",
            TransactionType::Div => "DIV",
            TransactionType::Fee => "FEE",
            TransactionType::SrvChg => "SRVCHG",
            TransactionType::Dep => "DEP",
            TransactionType::Atm => "ATM",
            TransactionType::Pos => "POS",
            TransactionType::Xfer => "XFER",
            TransactionType::Check => "CHECK",
            TransactionType::Payment => "PAYMENT",
            TransactionType::Cash => "CASH",
            TransactionType::DirectDep => "DIRECTDEP",
            TransactionType::DirectDebit => "DIRECTDEBIT",
            TransactionType::RepeatPmt => "REPEATPMT",
            TransactionType::Other => "OTHER",
        }
    }
}

impl Default for TransactionType {
    fn default() -> Self {
        TransactionType::Other
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = StatementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CREDIT" => Ok(TransactionType::Credit),
            "DEBIT" => Ok(TransactionType::Debit),
            "INT" => Ok(TransactionType::Int),
            "DIV" => Ok(TransactionType::Div),
            "FEE" => Ok(TransactionType::Fee),
            "SRVCHG" => Ok(TransactionType::SrvChg),
            "DEP" => Ok(TransactionType::Dep),
            "ATM" => Ok(TransactionType::Atm),
            "POS" => Ok(TransactionType::Pos),
            "XFER" => Ok(TransactionType::Xfer),
            "CHECK" => Ok(TransactionType::Check),
            "PAYMENT" => Ok(TransactionType::Payment),
            "CASH" => Ok(TransactionType::Cash),
            "DIRECTDEP" => Ok(TransactionType::DirectDep),
            "DIRECTDEBIT" => Ok(TransactionType::DirectDebit),
            "REPEATPMT" => Ok(TransactionType::RepeatPmt),
            "OTHER" => Ok(TransactionType::Other),
            other => Err(StatementError::Format(format!(
                "unknown transaction type '{}'",
                other
            ))),
        }
    }
}

/// Bank account types recognized by the interchange format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    Checking,
    Savings,
    /// Money market account
    MoneyMrkt,
    /// Line of credit
    CreditLine,
}

impl AccountType {
    /// Returns the OFX spelling of this account type
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Checking => "CHECKING",
            AccountType::Savings => "SAVINGS",
            AccountType::MoneyMrkt => "MONEYMRKT",
            AccountType::CreditLine => "CREDITLINE",
        }
    }
}

impl Default for AccountType {
    fn default() -> Self {
        AccountType::Checking
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = StatementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CHECKING" => Ok(AccountType::Checking),
            "SAVINGS" => Ok(AccountType::Savings),
            "MONEYMRKT" => Ok(AccountType::MoneyMrkt),
            "CREDITLINE" => Ok(AccountType::CreditLine),
            other => Err(StatementError::Format(format!(
                "unknown account type '{}'",
                other
            ))),
        }
    }
}

/// Decimal separator convention used by a scraped source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecimalSeparator {
    /// `1,000,000.32`
    Period,
    /// `1.000.000,32`
    Comma,
}

impl Default for DecimalSeparator {
    fn default() -> Self {
        DecimalSeparator::Period
    }
}

/// Optional payee enrichment of a transaction
///
/// Owned exclusively by its transaction; an absent payee is simply omitted
/// from the interchange output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payee {
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: Option<String>,
    pub phone: String,
}

impl Payee {
    /// Create a payee with just a name; remaining fields stay empty
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Detail attached to a merge conflict so a human can diagnose the data gap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeConflict {
    pub left_from: Option<NaiveDateTime>,
    pub left_to: Option<NaiveDateTime>,
    pub right_from: Option<NaiveDateTime>,
    pub right_to: Option<NaiveDateTime>,
    /// Description of the first transaction that broke the contiguity check
    pub offending: String,
}

impl fmt::Display for MergeConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "statements do not overlap contiguously (left covers {}..{}, right covers {}..{}, first diverging transaction: {})",
            to_record_datetime(self.left_from.as_ref()),
            to_record_datetime(self.left_to.as_ref()),
            to_record_datetime(self.right_from.as_ref()),
            to_record_datetime(self.right_to.as_ref()),
            self.offending
        )
    }
}

/// Errors that can occur while building, merging, or serializing statements
#[derive(Debug, thiserror::Error)]
pub enum StatementError {
    /// Malformed record row, unknown enum spelling, or unparsable date text
    #[error("format error: {0}")]
    Format(String),
    /// Non-contiguous transaction overlap detected during merge
    #[error("merge conflict: {0}")]
    MergeConflict(MergeConflict),
    /// Field constraint violation (account number, bank id, strict amounts)
    #[error("validation error: {0}")]
    Validation(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("XML error: {0}")]
    Xml(String),
    #[error("upload rejected: {0}")]
    Upload(String),
}

/// Result type for statement operations
pub type StatementResult<T> = Result<T, StatementError>;
