//! # dxcatalog - Data access layer for a diagnostic test catalog
//!
//! Turns several independently-shaped input arrays and maps into one
//! addressable, indexed, read-only store.
//!
//! dxcatalog provides:
//! - A Prisma-style query engine (where-clauses, multi-key sort, projection, pagination)
//! - Normalizers that tag category arrays and consolidate vendor metadata
//! - A `DataAdapter` seam with an in-memory implementation and O(1) lookup maps
//! - Repositories for tests, vendors, insurance coverage, changelog and glossary
//! - A load-once cache for sharing the assembled store across callers

pub mod record;
pub mod slug;
pub mod model;
pub mod query;
pub mod normalize;
pub mod adapter;
pub mod repository;
pub mod dal;
pub mod cache;
pub mod config;
pub mod output;
pub mod ui;

// Re-exports for convenient access
pub use record::{FieldValue, Record};
pub use model::{Category, DiagnosticTest, Vendor};
pub use query::{FindManyArgs, OrderSpec, QueryResult, Selection, SortDirection, Where};
pub use adapter::{DataAdapter, InMemoryAdapter};
pub use dal::{Dal, DalInputs};
pub use cache::DalCache;

/// Result type alias for dxcatalog operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for dxcatalog operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unknown collection: {0}")]
    UnknownCollection(String),

    #[error("Collection '{collection}' holds {found}, not {expected}")]
    CollectionType {
        collection: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Unknown category: {0}")]
    InvalidCategory(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
