//! Traits for the external collaborators consumed by the core
//!
//! Fetching pages, site-specific extraction, and uploading serialized
//! documents all live outside this crate; the core depends only on the
//! contracts below, never on how they are implemented. Retry policy belongs
//! to the orchestration layer, not here.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::session::{RawTransaction, SourceConfig};
use crate::types::StatementResult;

/// Opaque handle to a fetched structured document
///
/// The core never inspects the content; it only hands pages to a
/// [`StatementSource`] for extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    body: String,
}

impl Page {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Fetches remote pages and returns structured document handles
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> StatementResult<Page>;
}

/// A bank-specific extraction source
///
/// Maps site markup to the raw field tuples the extraction session turns
/// into transactions.
pub trait StatementSource: Send + Sync {
    /// Stable name the source is registered under
    fn name(&self) -> &str;

    /// The immutable configuration this source was constructed with
    fn config(&self) -> &SourceConfig;

    /// Extract raw transaction fields from a fetched document
    fn extract(&self, page: &Page) -> StatementResult<Vec<RawTransaction>>;
}

/// Outcome reported by an upload sink
#[derive(Debug, Clone, PartialEq)]
pub enum UploadStatus {
    Accepted,
    Rejected(String),
}

/// Accepts a serialized interchange document
#[async_trait]
pub trait UploadSink: Send + Sync {
    async fn upload(&self, document: &str) -> StatementResult<UploadStatus>;
}

type SourceFactory = Box<dyn Fn() -> Box<dyn StatementSource> + Send + Sync>;

/// Explicit registry of extraction sources
///
/// Replaces the original design's load-order auto-registration: sources are
/// registered by name with a factory, and lookups are deterministic.
#[derive(Default)]
pub struct SourceRegistry {
    factories: HashMap<String, SourceFactory>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under a source name; a later registration for the
    /// same name replaces the earlier one
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn StatementSource> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
    }

    /// Construct the source registered under `name`
    pub fn create(&self, name: &str) -> Option<Box<dyn StatementSource>> {
        self.factories.get(name).map(|factory| factory())
    }

    /// Names of every registered source, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
