//! The transaction entity: canonical identity and serialization forms

use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::normalize::{parse_amount, parse_flexible_datetime, to_ofx_datetime, to_record_datetime};
use crate::types::{DecimalSeparator, Payee, StatementError, StatementResult, TransactionType};

/// Number of fields in one record-format row
pub const RECORD_FIELD_COUNT: usize = 9;

/// One ledger entry scraped from a bank statement
///
/// Identity (equality, hash, and the content-derived id) is a pure function
/// of `(date, raw_description, amount, type, new_balance)`, with the date
/// rendered through the canonical OFX encoding. Two transactions built from
/// differently-formatted date strings denoting the same instant therefore
/// compare equal. `value_date` is deliberately excluded: it may only be
/// populated by a later scrape of the same transaction.
///
/// Caution: the identity fields must not change once the transaction has been
/// placed in a statement. Rules may still rewrite `amount`, but doing so
/// breaks the identity contract and defeats deduplication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Posting date
    pub date: Option<NaiveDateTime>,
    /// Description exactly as scraped
    pub raw_description: String,
    /// Amount text exactly as scraped, decimals per `decimal_separator`
    pub amount: String,
    /// OFX transaction type
    pub trn_type: TransactionType,
    /// Balance text after this transaction, exactly as scraped
    pub new_balance: String,
    /// Value date; excluded from identity
    pub value_date: Option<NaiveDateTime>,
    /// Rule-installed description override; `None` means "use the raw text"
    description: Option<String>,
    pub payee: Option<Payee>,
    pub check_number: Option<String>,
    /// Decimal separator convention the raw amount texts were scraped with
    pub decimal_separator: DecimalSeparator,
    /// Cached content id; pinned as-is when read back from a serialized row
    #[serde(skip)]
    id: OnceCell<String>,
}

impl Transaction {
    /// Create a transaction from raw scraped fields
    pub fn new(
        date: Option<NaiveDateTime>,
        raw_description: impl Into<String>,
        amount: impl Into<String>,
        trn_type: TransactionType,
        new_balance: impl Into<String>,
        decimal_separator: DecimalSeparator,
    ) -> Self {
        Self {
            date,
            raw_description: raw_description.into(),
            amount: amount.into(),
            trn_type,
            new_balance: new_balance.into(),
            value_date: None,
            description: None,
            payee: None,
            check_number: None,
            decimal_separator,
            id: OnceCell::new(),
        }
    }

    /// The effective description: the rule-installed override, else raw text
    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or(&self.raw_description)
    }

    /// Install a description override
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }

    /// Whether a rule has customized the description
    pub fn has_custom_description(&self) -> bool {
        self.description.is_some()
    }

    /// Description as serialized: prefixed with the payee name when present
    pub fn effective_description(&self) -> String {
        match &self.payee {
            Some(p) if !p.name.is_empty() => format!("{} - {}", p.name, self.description()),
            _ => self.description().to_string(),
        }
    }

    /// Numeric value of the raw amount text (lenient: junk parses as zero)
    pub fn real_amount(&self) -> BigDecimal {
        parse_amount(&self.amount, self.decimal_separator)
    }

    /// Numeric value of the raw balance text
    pub fn real_new_balance(&self) -> BigDecimal {
        parse_amount(&self.new_balance, self.decimal_separator)
    }

    /// The canonical string the content id is derived from
    fn identity_string(&self) -> String {
        format!(
            "{}|{}|{}|{}|{}",
            to_ofx_datetime(self.date.as_ref()),
            self.raw_description,
            self.trn_type,
            self.amount,
            self.new_balance
        )
    }

    fn compute_id(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.identity_string().as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Content-derived stable identifier, computed lazily once and cached
    ///
    /// If an id was assigned via [`Transaction::assign_id`] (a row read back
    /// from a serialized ledger) it is kept verbatim and never recomputed, so
    /// re-reading a previously written ledger reproduces identical ids.
    pub fn id(&self) -> &str {
        self.id.get_or_init(|| self.compute_id())
    }

    /// Pin an externally assigned id; a no-op if the id was already computed
    pub fn assign_id(&self, id: impl Into<String>) {
        let _ = self.id.set(id.into());
    }

    /// Serialize to the 9 ordered record-format fields
    pub fn to_record_row(&self) -> [String; RECORD_FIELD_COUNT] {
        [
            to_record_datetime(self.date.as_ref()),
            to_record_datetime(self.value_date.as_ref()),
            self.effective_description(),
            self.real_amount().to_string(),
            self.real_new_balance().to_string(),
            self.amount.clone(),
            self.new_balance.clone(),
            self.raw_description.clone(),
            self.id().to_string(),
        ]
    }

    /// Rebuild a transaction from a record-format row
    ///
    /// Requires exactly 9 fields. Fields 3–4 (the derived numerics) are
    /// ignored: they are recomputed from the raw text, not trusted. Field 2
    /// is read back into the description override, not the raw description.
    pub fn from_record_row(
        row: &[String],
        decimal_separator: DecimalSeparator,
    ) -> StatementResult<Self> {
        if row.len() != RECORD_FIELD_COUNT {
            return Err(StatementError::Format(format!(
                "record row has {} fields, expected {}",
                row.len(),
                RECORD_FIELD_COUNT
            )));
        }

        let mut txn = Transaction::new(
            parse_flexible_datetime(&row[0])?,
            row[7].clone(),
            row[5].clone(),
            TransactionType::default(),
            row[6].clone(),
            decimal_separator,
        );
        txn.value_date = parse_flexible_datetime(&row[1])?;
        if row[2] != txn.raw_description {
            txn.description = Some(row[2].clone());
        }
        if !row[8].is_empty() {
            txn.assign_id(row[8].clone());
        }
        Ok(txn)
    }

    /// Parse and install the transaction type from its OFX spelling
    pub fn set_type_from_str(&mut self, s: &str) -> StatementResult<()> {
        self.trn_type = TransactionType::from_str(s)?;
        Ok(())
    }
}

// Equality and hash go through the content id, which is itself a pure
// function of the five identity fields rendered through the canonical date
// encoding. A pinned id (a row read back from disk) keeps comparing equal to
// the transaction it was originally computed from.
impl PartialEq for Transaction {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Transaction {}

impl Hash for Transaction {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}
