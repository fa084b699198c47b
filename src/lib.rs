//! # Statement Core
//!
//! A library for turning scraped bank statements into a canonical,
//! deduplicated, chronologically consistent transaction ledger.
//!
//! ## Features
//!
//! - **Canonical transaction identity**: equality, hashing, and a
//!   content-derived stable id computed from the five identity fields through
//!   a canonical date encoding, so two scrapes of the same real-world
//!   transaction compare equal despite formatting noise
//! - **Statement merging**: a set-union merge with a contiguity check that
//!   rejects non-contiguous overlaps instead of silently corrupting the
//!   ledger; re-merging overlapping scrapes is idempotent
//! - **Rule pipeline**: a priority-ordered post-processing engine that
//!   rewrites descriptions, types, check numbers, and payees after extraction
//! - **Round-trip-safe serialization**: a flat 9-field record format (CSV)
//!   and an OFX 2.x interchange document writer
//! - **Collaborator seams**: trait-based page fetcher, extraction source, and
//!   upload sink so scraping and uploading stay outside the core
//!
//! ## Quick Start
//!
//! ```rust
//! use statement_core::{ExtractionSession, RawTransaction, SourceConfig};
//!
//! let config = SourceConfig::new("12345678");
//! let session = ExtractionSession::new(config);
//! let statement = session
//!     .build_statement(&[RawTransaction {
//!         date: "2024-03-01".to_string(),
//!         description: "COFFEE SHOP".to_string(),
//!         amount: "-3.20".to_string(),
//!         new_balance: "996.80".to_string(),
//!         ..RawTransaction::default()
//!     }])
//!     .unwrap();
//! assert_eq!(statement.len(), 1);
//! ```

pub mod formats;
pub mod ledger;
pub mod normalize;
pub mod rules;
pub mod session;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use ledger::*;
pub use rules::*;
pub use session::*;
pub use traits::*;
pub use types::*;
