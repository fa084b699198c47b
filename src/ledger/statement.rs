//! The statement entity and the merge engine

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::ledger::transaction::Transaction;
use crate::types::{AccountType, MergeConflict, StatementError, StatementResult};
use crate::utils::validation::{validate_account_number, validate_bank_id, validate_currency};

/// An ordered sequence of transactions for one account over one period
///
/// The transaction list's chronological ordering convention (ascending or
/// descending) is the caller's contract: it must be consistent within one
/// statement and across any statements that will be merged together. The
/// derived defaults are positional, not sorted — `closing_balance` falls back
/// to the *first* transaction's balance and `from_date`/`to_date` to the
/// *first*/*last* list entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    /// Account number, 1–22 characters
    pub account_number: String,
    pub account_type: AccountType,
    /// Bank routing id, at most 9 characters
    pub bank_id: Option<String>,
    /// 3-letter currency code
    pub currency: String,
    closing_balance: Option<String>,
    closing_available: Option<String>,
    from_date: Option<NaiveDateTime>,
    to_date: Option<NaiveDateTime>,
    transactions: Vec<Transaction>,
}

impl Statement {
    /// Create an empty statement for the given account number
    pub fn new(account_number: impl Into<String>) -> StatementResult<Self> {
        StatementBuilder::new(account_number).build()
    }

    /// Start building a statement with non-default metadata
    pub fn builder(account_number: impl Into<String>) -> StatementBuilder {
        StatementBuilder::new(account_number)
    }

    /// Append a transaction scraped for this statement's period
    pub fn push(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Mutable access for the rule pipeline
    pub(crate) fn transactions_mut(&mut self) -> &mut [Transaction] {
        &mut self.transactions
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Closing balance: the explicit value, else the first transaction's
    /// balance text
    pub fn closing_balance(&self) -> Option<String> {
        self.closing_balance
            .clone()
            .or_else(|| self.transactions.first().map(|t| t.new_balance.clone()))
    }

    /// Closing available balance, with the same fallback as `closing_balance`
    pub fn closing_available(&self) -> Option<String> {
        self.closing_available
            .clone()
            .or_else(|| self.transactions.first().map(|t| t.new_balance.clone()))
    }

    /// Period start: the explicit value, else the first transaction's date
    pub fn from_date(&self) -> Option<NaiveDateTime> {
        self.from_date
            .or_else(|| self.transactions.first().and_then(|t| t.date))
    }

    /// Period end: the explicit value, else the last transaction's date
    pub fn to_date(&self) -> Option<NaiveDateTime> {
        self.to_date
            .or_else(|| self.transactions.last().and_then(|t| t.date))
    }

    pub fn set_closing_balance(&mut self, balance: impl Into<String>) {
        self.closing_balance = Some(balance.into());
    }

    pub fn set_closing_available(&mut self, balance: impl Into<String>) {
        self.closing_available = Some(balance.into());
    }

    pub fn set_from_date(&mut self, date: NaiveDateTime) {
        self.from_date = Some(date);
    }

    pub fn set_to_date(&mut self, date: NaiveDateTime) {
        self.to_date = Some(date);
    }

    /// Materialize the lazily derived balances and period dates
    pub fn finalize(&mut self) {
        self.closing_balance = self.closing_balance();
        self.closing_available = self.closing_available();
        self.from_date = self.from_date();
        self.to_date = self.to_date();
    }

    /// Merge another statement into this one, non-mutating
    ///
    /// Computes the set union of both transaction lists under transaction
    /// equality: elements of `other` already present advance an insertion
    /// cursor past their match, novel elements are inserted at the cursor (at
    /// the end while nothing has matched yet), preserving `other`'s relative
    /// order. The union must keep this statement's transactions as its exact
    /// prefix — anything else means `other` does not extend this statement
    /// contiguously and the merge fails with
    /// [`StatementError::MergeConflict`] instead of returning a corrupted
    /// union.
    ///
    /// Merging a statement with a duplicate of itself is a no-op, which is
    /// what makes repeated re-scraping of overlapping periods safe.
    ///
    /// All four derived fields (balances and period dates) are cleared on the
    /// merged statement so they re-derive from the merged list.
    pub fn merge(&self, other: &Statement) -> StatementResult<Statement> {
        let merged = self.merged_transactions(other)?;
        Ok(Statement {
            account_number: self.account_number.clone(),
            account_type: self.account_type,
            bank_id: self.bank_id.clone(),
            currency: self.currency.clone(),
            closing_balance: None,
            closing_available: None,
            from_date: None,
            to_date: None,
            transactions: merged,
        })
    }

    /// In-place variant of [`Statement::merge`]
    ///
    /// The contiguity check depends on the current transaction list, so the
    /// caller must hold exclusive access to this statement for the duration
    /// of the call; concurrent merges into the same target are not safe.
    pub fn merge_from(&mut self, other: &Statement) -> StatementResult<()> {
        let merged = self.merged_transactions(other)?;
        self.transactions = merged;
        self.closing_balance = None;
        self.closing_available = None;
        self.from_date = None;
        self.to_date = None;
        Ok(())
    }

    fn merged_transactions(&self, other: &Statement) -> StatementResult<Vec<Transaction>> {
        let mut merged = self.transactions.clone();
        let mut cursor = merged.len();
        for txn in &other.transactions {
            match merged.iter().position(|m| m == txn) {
                Some(pos) => cursor = pos + 1,
                None => {
                    merged.insert(cursor, txn.clone());
                    cursor += 1;
                }
            }
        }

        // Contiguity check: our transactions must survive as the exact prefix
        let prefix_ok = merged.len() >= self.transactions.len()
            && merged
                .iter()
                .zip(self.transactions.iter())
                .all(|(m, a)| m == a);
        if !prefix_ok {
            let offending = merged
                .iter()
                .zip(self.transactions.iter())
                .find(|(m, a)| m != a)
                .map(|(m, _)| m.description().to_string())
                .unwrap_or_default();
            return Err(StatementError::MergeConflict(MergeConflict {
                left_from: self.from_date(),
                left_to: self.to_date(),
                right_from: other.from_date(),
                right_to: other.to_date(),
                offending,
            }));
        }
        Ok(merged)
    }
}

/// Builder for statements, validating metadata on `build`
#[derive(Debug, Clone)]
pub struct StatementBuilder {
    account_number: String,
    account_type: AccountType,
    bank_id: Option<String>,
    currency: String,
}

impl StatementBuilder {
    pub fn new(account_number: impl Into<String>) -> Self {
        Self {
            account_number: account_number.into(),
            account_type: AccountType::default(),
            currency: "EUR".to_string(),
            bank_id: None,
        }
    }

    pub fn account_type(mut self, account_type: AccountType) -> Self {
        self.account_type = account_type;
        self
    }

    pub fn bank_id(mut self, bank_id: impl Into<String>) -> Self {
        self.bank_id = Some(bank_id.into());
        self
    }

    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// Validate the metadata and produce an empty statement
    pub fn build(self) -> StatementResult<Statement> {
        validate_account_number(&self.account_number)?;
        if let Some(bank_id) = &self.bank_id {
            validate_bank_id(bank_id)?;
        }
        validate_currency(&self.currency)?;

        Ok(Statement {
            account_number: self.account_number,
            account_type: self.account_type,
            bank_id: self.bank_id,
            currency: self.currency,
            closing_balance: None,
            closing_available: None,
            from_date: None,
            to_date: None,
            transactions: Vec::new(),
        })
    }
}
