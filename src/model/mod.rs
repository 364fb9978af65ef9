//! Catalog entity types
//!
//! One struct per collection. Each implements [`crate::Record`] so the query
//! engine can address its fields by name.

pub mod category;
pub mod vendor;
pub mod insurance;
pub mod changelog;
pub mod glossary;

pub use category::Category;
pub use diagnostic_test::{
    CoverageCrossReference, DiagnosticTest, MedicareCoverage, PayerPolicy, RawTest, TestDetails,
};
pub use vendor::{
    AssistanceProgram, ContributionRecord, Vendor, VendorContribution, VendorVerification,
    VerificationRecord,
};
pub use insurance::{
    CoverageSource, CoverageStatus, InsuranceProvider, RawInsuranceProvider, GOVERNMENT_PAYER_ID,
};
pub use changelog::{ChangelogEntry, RawChangelogEntry};
pub use glossary::{GlossaryTerm, RawGlossaryTerm};
