//! Insurance providers and coverage status

use crate::record::{self, FieldValue, Record};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Provider id of the primary government payer, whose status lives in a
/// dedicated top-level object on each test.
pub const GOVERNMENT_PAYER_ID: &str = "medicare";

/// Provider entry as supplied in the insurance input map (keyed by id).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawInsuranceProvider {
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, FieldValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceProvider {
    pub id: String,
    pub label: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Alternative payer names that resolve to this provider
    pub aliases: Vec<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, FieldValue>,
}

impl Record for InsuranceProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn slug(&self) -> Option<&str> {
        Some(&self.slug)
    }

    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(FieldValue::from(&self.id)),
            "label" => Some(FieldValue::from(&self.label)),
            "slug" => Some(FieldValue::from(&self.slug)),
            "category" => record::text(&self.category),
            "aliases" => record::text_list(&self.aliases),
            other => self.extra.get(other).cloned(),
        }
    }
}

/// Coverage outcome of one test for one payer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoverageStatus {
    Covered,
    Partial,
    NotCovered,
    Unknown,
}

impl CoverageStatus {
    /// Interpret a free-text policy status. Unrecognized text is `Unknown`.
    pub fn parse(status: &str) -> Self {
        let normalized: String = status
            .trim()
            .to_uppercase()
            .chars()
            .map(|c| if c == ' ' || c == '-' { '_' } else { c })
            .collect();
        match normalized.as_str() {
            "COVERED" | "YES" | "APPROVED" => CoverageStatus::Covered,
            "PARTIAL" | "CONDITIONAL" | "LIMITED" | "CASE_BY_CASE" => CoverageStatus::Partial,
            "NOT_COVERED" | "NO" | "EXPERIMENTAL" | "INVESTIGATIONAL" | "DENIED" => {
                CoverageStatus::NotCovered
            }
            _ => CoverageStatus::Unknown,
        }
    }

    /// Covered or partially covered
    pub fn is_covered(&self) -> bool {
        matches!(self, CoverageStatus::Covered | CoverageStatus::Partial)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CoverageStatus::Covered => "COVERED",
            CoverageStatus::Partial => "PARTIAL",
            CoverageStatus::NotCovered => "NOT_COVERED",
            CoverageStatus::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for CoverageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which coverage shape decided a [`CoverageStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CoverageSource {
    /// Structured per-payer policy entry
    PayerPolicy,
    /// Top-level government payer status object
    GovernmentStatus,
    /// Flat list of covering payer names
    CoveredList,
    /// Flat list of non-covering payer names
    NonCoverageList,
    /// No shape mentioned the payer
    None,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coverage_status_parse() {
        assert_eq!(CoverageStatus::parse("COVERED"), CoverageStatus::Covered);
        assert_eq!(CoverageStatus::parse("not covered"), CoverageStatus::NotCovered);
        assert_eq!(CoverageStatus::parse("Not-Covered"), CoverageStatus::NotCovered);
        assert_eq!(CoverageStatus::parse("partial"), CoverageStatus::Partial);
        assert_eq!(CoverageStatus::parse("pending review"), CoverageStatus::Unknown);
    }

    #[test]
    fn test_is_covered() {
        assert!(CoverageStatus::Covered.is_covered());
        assert!(CoverageStatus::Partial.is_covered());
        assert!(!CoverageStatus::NotCovered.is_covered());
        assert!(!CoverageStatus::Unknown.is_covered());
    }
}
