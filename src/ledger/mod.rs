//! Ledger module containing the transaction and statement entities

pub mod statement;
pub mod transaction;

pub use statement::*;
pub use transaction::*;
