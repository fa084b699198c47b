//! Validation utilities

use crate::types::{StatementError, StatementResult};

/// Validate an account number (1–22 characters)
pub fn validate_account_number(account_number: &str) -> StatementResult<()> {
    if account_number.is_empty() {
        return Err(StatementError::Validation(
            "account number cannot be empty".to_string(),
        ));
    }

    if account_number.len() > 22 {
        return Err(StatementError::Validation(format!(
            "account number '{}' exceeds 22 characters",
            account_number
        )));
    }

    Ok(())
}

/// Validate a bank routing id (at most 9 characters)
pub fn validate_bank_id(bank_id: &str) -> StatementResult<()> {
    if bank_id.len() > 9 {
        return Err(StatementError::Validation(format!(
            "bank id '{}' exceeds 9 characters",
            bank_id
        )));
    }

    Ok(())
}

/// Validate a currency code (exactly 3 ASCII letters)
pub fn validate_currency(currency: &str) -> StatementResult<()> {
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(StatementError::Validation(format!(
            "currency '{}' is not a 3-letter code",
            currency
        )));
    }

    Ok(())
}
