//! Document store port - hosted database abstraction
//!
//! The backend keeps two collections, `installations` and `users`, of
//! schemaless JSON documents keyed by string ids. Services own the mapping
//! between domain types and document fields (including the epoch-millis
//! timestamp representation); the store only moves documents.

use serde_json::Value as JsonValue;

use crate::domain::result::Result;

/// A stored document: its id plus the raw field map
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub fields: JsonValue,
}

/// Supported query filters
///
/// Mirrors the two query shapes the application needs: a timestamp range for
/// the per-day installation view, and field equality for the email check.
#[derive(Debug, Clone)]
pub enum Filter {
    /// `field >= start_ms AND field <= end_ms`, both bounds inclusive
    TimestampBetween {
        field: String,
        start_ms: i64,
        end_ms: i64,
    },
    /// `field == value`
    Eq { field: String, value: JsonValue },
}

/// Hosted document store abstraction
///
/// Implementations (adapters) provide the actual backend access. Result
/// ordering of `list` and `query` is store-defined, not guaranteed
/// chronological.
pub trait DocumentStore: Send + Sync {
    /// Create a document with a store-assigned id, returning the id
    fn add(&self, collection: &str, fields: JsonValue) -> Result<String>;

    /// Create or replace a document at a caller-chosen id
    fn set(&self, collection: &str, id: &str, fields: JsonValue) -> Result<()>;

    /// Merge the given fields into an existing document
    ///
    /// Fails with `NotFound` when no document exists at the id.
    fn update(&self, collection: &str, id: &str, fields: JsonValue) -> Result<()>;

    /// Delete a document; no existence pre-check
    fn delete(&self, collection: &str, id: &str) -> Result<()>;

    /// Fetch a single document, `None` when absent
    fn get(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    /// Fetch every document in a collection
    fn list(&self, collection: &str) -> Result<Vec<Document>>;

    /// Fetch documents matching a filter
    fn query(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>>;
}
