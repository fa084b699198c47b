//! Extraction session: from raw scraped fields to a finished statement

use serde::{Deserialize, Serialize};

use crate::ledger::statement::Statement;
use crate::ledger::transaction::Transaction;
use crate::normalize::parse_flexible_datetime;
use crate::rules::RuleEngine;
use crate::types::{AccountType, DecimalSeparator, StatementResult, TransactionType};

/// Immutable per-source configuration
///
/// Replaces the original design's class-level mutable directives: a source is
/// constructed with its configuration once and the configuration never
/// changes for the lifetime of the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub account_number: String,
    pub account_type: AccountType,
    pub bank_id: Option<String>,
    pub currency: String,
    pub decimal_separator: DecimalSeparator,
}

impl SourceConfig {
    pub fn new(account_number: impl Into<String>) -> Self {
        Self {
            account_number: account_number.into(),
            account_type: AccountType::default(),
            bank_id: None,
            currency: "EUR".to_string(),
            decimal_separator: DecimalSeparator::default(),
        }
    }

    /// Build an empty statement carrying this configuration's metadata;
    /// validates the account number, bank id, and currency
    pub fn empty_statement(&self) -> StatementResult<Statement> {
        let mut builder = Statement::builder(self.account_number.clone())
            .account_type(self.account_type)
            .currency(self.currency.clone());
        if let Some(bank_id) = &self.bank_id {
            builder = builder.bank_id(bank_id.clone());
        }
        builder.build()
    }
}

/// The raw field tuple an extraction callback yields for one transaction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    /// Free-form date text; parsed flexibly
    pub date: String,
    /// Free-form value date text, may be blank
    pub value_date: String,
    pub description: String,
    /// Amount text, decimals per the source's separator
    pub amount: String,
    /// Balance text after the transaction
    pub new_balance: String,
    /// Transaction type when the source can tell; rules may refine it
    pub trn_type: Option<TransactionType>,
}

/// One extraction run for one source
///
/// Owns the source configuration and the rule pipeline; turns the raw field
/// tuples produced by an extraction callback into a rule-processed, finalized
/// statement. A full run is one linear pipeline per statement; nothing here
/// needs concurrency.
pub struct ExtractionSession {
    config: SourceConfig,
    rules: RuleEngine,
}

impl ExtractionSession {
    pub fn new(config: SourceConfig) -> Self {
        Self {
            config,
            rules: RuleEngine::new(),
        }
    }

    pub fn with_rules(config: SourceConfig, rules: RuleEngine) -> Self {
        Self { config, rules }
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    pub fn rules_mut(&mut self) -> &mut RuleEngine {
        &mut self.rules
    }

    /// Build one transaction from a raw field tuple
    pub fn build_transaction(&self, raw: &RawTransaction) -> StatementResult<Transaction> {
        let mut txn = Transaction::new(
            parse_flexible_datetime(&raw.date)?,
            raw.description.clone(),
            raw.amount.clone(),
            raw.trn_type.unwrap_or_default(),
            raw.new_balance.clone(),
            self.config.decimal_separator,
        );
        txn.value_date = parse_flexible_datetime(&raw.value_date)?;
        Ok(txn)
    }

    /// Build the statement for one scrape: parse every raw tuple in order,
    /// run the rule pipeline rule-major, and finalize the derived fields
    pub fn build_statement(&self, raws: &[RawTransaction]) -> StatementResult<Statement> {
        let mut statement = self.config.empty_statement()?;
        for raw in raws {
            statement.push(self.build_transaction(raw)?);
        }
        self.rules.apply_all(&mut statement);
        statement.finalize();
        Ok(statement)
    }
}
