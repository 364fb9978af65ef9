//! Repositories - domain façades over a [`crate::DataAdapter`]
//!
//! Each repository owns a shared handle to the adapter and composes its
//! primitives into catalog queries: category and vendor lookups, coverage
//! resolution, verification lookups and full-text search.

pub mod search;
pub mod vendors;
pub mod insurance;
pub mod changelog;
pub mod glossary;

pub use search::{search_collection, text_matches, SearchOptions};
pub use diagnostic_tests::{TestRepository, TestStats};
pub use vendors::{TestVerification, VendorRepository};
pub use insurance::{evaluate_coverage, CoverageResult, InsuranceRepository, PayerNames};
pub use changelog::ChangelogRepository;
pub use glossary::GlossaryRepository;
