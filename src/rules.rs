//! Priority-ordered transaction post-processing pipeline
//!
//! Rules rewrite transactions after extraction and before merge or
//! serialization: installing a cleaned-up description, a transaction type, a
//! check number, or a payee based on the raw description and the sign of the
//! amount. Rules execute from highest priority to lowest, ties broken by
//! declaration order. Priority −999 is the conventional slot for catch-all
//! rules that must run after every domain-specific rule.

use regex::Regex;

use crate::ledger::statement::Statement;
use crate::ledger::transaction::Transaction;

/// Priority reserved for catch-all rules
pub const CATCH_ALL_PRIORITY: i32 = -999;

type RuleFn = Box<dyn Fn(&mut Transaction) + Send + Sync>;

struct Rule {
    priority: i32,
    seq: usize,
    body: RuleFn,
}

/// The rule pipeline
///
/// Rules may be registered incrementally in any order; the execution order
/// `(-priority, insertion index)` is re-established on every registration.
#[derive(Default)]
pub struct RuleEngine {
    rules: Vec<Rule>,
    next_seq: usize,
}

impl RuleEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule at the given priority
    pub fn register<F>(&mut self, priority: i32, body: F)
    where
        F: Fn(&mut Transaction) + Send + Sync + 'static,
    {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.rules.push(Rule {
            priority,
            seq,
            body: Box::new(body),
        });
        // Stable by construction: seq breaks priority ties in declaration order
        self.rules.sort_by_key(|r| (-r.priority, r.seq));
    }

    /// Register a rule that fires only when `pattern` matches the raw
    /// description, passing the captures to the body
    pub fn register_pattern<F>(&mut self, priority: i32, pattern: Regex, body: F)
    where
        F: Fn(&mut Transaction, &regex::Captures) + Send + Sync + 'static,
    {
        self.register(priority, move |txn| {
            let raw = txn.raw_description.clone();
            if let Some(caps) = pattern.captures(&raw) {
                body(txn, &caps);
            }
        });
    }

    /// Register the conventional catch-all: when no rule customized the
    /// description, install a title-cased rendering of the raw text
    pub fn register_title_case_fallback(&mut self) {
        self.register(CATCH_ALL_PRIORITY, |txn| {
            if !txn.has_custom_description() {
                txn.set_description(title_case(&txn.raw_description));
            }
        });
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every registered rule against every transaction in the statement
    ///
    /// Rule-major: the first rule sees all transactions before the second
    /// rule runs, so a catch-all can rely on every higher-priority rule
    /// having finished.
    pub fn apply_all(&self, statement: &mut Statement) {
        for rule in &self.rules {
            for txn in statement.transactions_mut() {
                (rule.body)(txn);
            }
        }
    }
}

/// Title-case a scraped description: first letter of each word upper-cased,
/// the rest lowered
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
