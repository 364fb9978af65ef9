//! Vendor aggregate and its source records
//!
//! A vendor is never supplied directly. It is assembled from four unrelated
//! inputs: test ownership, verification records, contribution records and
//! assistance programs.

use crate::record::{self, FieldValue, Record};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Vendor verification of a test, keyed by test id in the input map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRecord {
    /// Vendor display name as written by the verifier
    #[serde(default)]
    pub company: String,
    /// Name of the person who verified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, FieldValue>,
}

/// A data submission for a test, keyed by test id in the input map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionRecord {
    #[serde(default)]
    pub company: String,
    /// Contributor name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, FieldValue>,
}

/// Patient assistance program, keyed by vendor display name in the input map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistanceProgram {
    #[serde(default)]
    pub has_program: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, FieldValue>,
}

/// A verification attached to a vendor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorVerification {
    pub test_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verifier_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verifier_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// A contribution attached to a vendor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorContribution {
    pub test_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Consolidated vendor entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    /// Normalized vendor id (join key)
    pub id: String,
    /// Display name, taken from the first source that referenced the vendor
    pub name: String,
    pub test_ids: Vec<String>,
    /// Category codes of owned tests, in first-seen order
    pub categories: Vec<String>,
    pub verifications: Vec<VendorVerification>,
    pub contributions: Vec<VendorContribution>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assistance_program: Option<AssistanceProgram>,
    pub test_count: usize,
    pub verified_test_count: usize,
    pub has_verified_tests: bool,
    pub contribution_count: usize,
    pub has_contributions: bool,
    pub has_assistance_program: bool,
}

impl Vendor {
    /// An empty vendor entry: every source-derived field zero-valued
    pub fn empty(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            test_ids: Vec::new(),
            categories: Vec::new(),
            verifications: Vec::new(),
            contributions: Vec::new(),
            assistance_program: None,
            test_count: 0,
            verified_test_count: 0,
            has_verified_tests: false,
            contribution_count: 0,
            has_contributions: false,
            has_assistance_program: false,
        }
    }
}

impl Record for Vendor {
    fn id(&self) -> &str {
        &self.id
    }

    fn slug(&self) -> Option<&str> {
        Some(&self.id)
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" | "slug" => Some(FieldValue::from(&self.id)),
            "name" => Some(FieldValue::from(&self.name)),
            "testIds" => record::text_list(&self.test_ids),
            "categories" => record::text_list(&self.categories),
            "verifications" => record::to_field_value(&self.verifications),
            "contributions" => record::to_field_value(&self.contributions),
            "assistanceProgram" => self.assistance_program.as_ref().and_then(record::to_field_value),
            "testCount" => Some(FieldValue::from(self.test_count)),
            "verifiedTestCount" => Some(FieldValue::from(self.verified_test_count)),
            "hasVerifiedTests" => Some(FieldValue::Bool(self.has_verified_tests)),
            "contributionCount" => Some(FieldValue::from(self.contribution_count)),
            "hasContributions" => Some(FieldValue::Bool(self.has_contributions)),
            "hasAssistanceProgram" => Some(FieldValue::Bool(self.has_assistance_program)),
            _ => None,
        }
    }
}
