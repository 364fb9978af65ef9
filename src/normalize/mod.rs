//! Normalizers - raw inputs to query-ready collections
//!
//! - `diagnostic_tests`: five category arrays merged into one test collection
//! - `vendors`: four-way join producing the vendor collection
//! - `reference`: insurance providers, changelog and glossary

pub mod vendors;
pub mod reference;

pub use diagnostic_tests::{normalize_test, normalize_tests};
pub use vendors::{consolidate_vendors, VendorSources};
pub use reference::{normalize_changelog, normalize_glossary, normalize_insurance};
