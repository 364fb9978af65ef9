//! Vendor consolidation
//!
//! Vendors are an outer join of four sources on the normalized vendor id:
//! test ownership, verification records, contribution records and assistance
//! programs. Any source may introduce a vendor the others never mention.

use crate::model::{
    AssistanceProgram, ContributionRecord, DiagnosticTest, Vendor, VendorContribution,
    VendorVerification, VerificationRecord,
};
use crate::query::sort::locale_compare;
use crate::slug::normalize_vendor_id;
use std::collections::{BTreeMap, HashMap};

/// Borrowed inputs of the vendor join.
#[derive(Debug, Clone, Copy)]
pub struct VendorSources<'a> {
    pub tests: &'a [DiagnosticTest],
    /// Test id → verification
    pub verifications: &'a BTreeMap<String, VerificationRecord>,
    /// Test id → submissions
    pub contributions: &'a BTreeMap<String, Vec<ContributionRecord>>,
    /// Vendor display name → program
    pub assistance: &'a BTreeMap<String, AssistanceProgram>,
}

struct VendorTable<'a> {
    vendors: HashMap<String, Vendor>,
    tests_by_id: HashMap<&'a str, &'a DiagnosticTest>,
}

impl<'a> VendorTable<'a> {
    fn new(tests: &'a [DiagnosticTest]) -> Self {
        let mut tests_by_id = HashMap::with_capacity(tests.len());
        for test in tests {
            tests_by_id.entry(test.id.as_str()).or_insert(test);
        }
        Self {
            vendors: HashMap::new(),
            tests_by_id,
        }
    }

    /// Fetch the vendor for a display name, creating it on first reference.
    /// Names that normalize to nothing are rejected.
    fn entry(&mut self, display_name: &str) -> Option<&mut Vendor> {
        let id = normalize_vendor_id(display_name);
        if id.is_empty() {
            return None;
        }
        Some(
            self.vendors
                .entry(id.clone())
                .or_insert_with(|| Vendor::empty(id, display_name.trim())),
        )
    }

    /// Company named on a side record, falling back to the owning test's vendor
    fn company_for(&self, company: &str, test_id: &str) -> Option<String> {
        if !company.trim().is_empty() {
            return Some(company.to_string());
        }
        self.tests_by_id.get(test_id).map(|t| t.vendor().to_string())
    }

    fn test_name(&self, test_id: &str) -> Option<String> {
        self.tests_by_id.get(test_id).map(|t| t.name().to_string())
    }
}

/// Build the vendor collection, sorted case-insensitively by display name.
pub fn consolidate_vendors(sources: VendorSources<'_>) -> Vec<Vendor> {
    let mut table = VendorTable::new(sources.tests);

    for test in sources.tests {
        let code = test.category.code();
        let Some(vendor) = table.entry(test.vendor()) else {
            tracing::warn!("Test {} has no vendor; skipped in vendor join", test.id);
            continue;
        };
        if !vendor.test_ids.contains(&test.id) {
            vendor.test_ids.push(test.id.clone());
        }
        if !vendor.categories.iter().any(|c| c == code) {
            vendor.categories.push(code.to_string());
        }
    }

    for (test_id, record) in sources.verifications {
        let Some(company) = table.company_for(&record.company, test_id) else {
            tracing::warn!("Verification for unknown test {} has no company; skipped", test_id);
            continue;
        };
        let test_name = table.test_name(test_id);
        let Some(vendor) = table.entry(&company) else {
            continue;
        };
        if vendor.verifications.iter().any(|v| &v.test_id == test_id) {
            continue;
        }
        vendor.verifications.push(VendorVerification {
            test_id: test_id.clone(),
            test_name,
            verifier_name: record.name.clone(),
            verifier_title: record.title.clone(),
            date: record.date.clone(),
        });
    }

    for (test_id, records) in sources.contributions {
        for record in records {
            let Some(company) = table.company_for(&record.company, test_id) else {
                tracing::warn!("Contribution for unknown test {} has no company; skipped", test_id);
                continue;
            };
            let test_name = table.test_name(test_id);
            let Some(vendor) = table.entry(&company) else {
                continue;
            };
            vendor.contributions.push(VendorContribution {
                test_id: test_id.clone(),
                test_name,
                contributor_name: record.name.clone(),
                date: record.date.clone(),
                kind: record.kind.clone(),
                description: record.description.clone(),
            });
        }
    }

    for (name, program) in sources.assistance {
        let Some(vendor) = table.entry(name) else {
            tracing::warn!("Assistance program with blank vendor name skipped");
            continue;
        };
        if vendor.assistance_program.is_some() {
            tracing::warn!("Duplicate assistance program for vendor '{}'; last entry wins", vendor.name);
        }
        vendor.assistance_program = Some(program.clone());
    }

    let mut vendors: Vec<Vendor> = table
        .vendors
        .into_values()
        .map(|mut vendor| {
            vendor.test_count = vendor.test_ids.len();
            vendor.verified_test_count = vendor.verifications.len();
            vendor.has_verified_tests = vendor.verified_test_count > 0;
            vendor.contribution_count = vendor.contributions.len();
            vendor.has_contributions = vendor.contribution_count > 0;
            vendor.has_assistance_program = vendor
                .assistance_program
                .as_ref()
                .is_some_and(|p| p.has_program);
            vendor
        })
        .collect();

    vendors.sort_by(|a, b| locale_compare(&a.name, &b.name).then_with(|| a.id.cmp(&b.id)));
    tracing::debug!("Consolidated {} vendors", vendors.len());
    vendors
}
