//! Insurance repository and coverage lookup
//!
//! A test can describe payer coverage in three independent shapes:
//! a structured per-payer policy map, a top-level status object for the
//! government payer, and two flat name lists (covered / not covered).
//! [`evaluate_coverage`] decides between them in that order, with the
//! not-covered list consulted only when nothing positive matched.

use crate::adapter::{collections, DataAdapter};
use crate::model::{
    CoverageSource, CoverageStatus, DiagnosticTest, InsuranceProvider, PayerPolicy,
    GOVERNMENT_PAYER_ID,
};
use crate::query::{FindManyArgs, QueryResult};
use crate::slug::normalize_vendor_id;
use crate::Result;
use serde::Serialize;
use std::sync::Arc;

/// Coverage of one test for one payer, with the shape that decided it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageResult {
    pub test_id: String,
    /// Resolved provider id, when the payer name resolved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer_id: Option<String>,
    pub status: CoverageStatus,
    pub source: CoverageSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy: Option<PayerPolicy>,
}

impl CoverageResult {
    pub fn is_covered(&self) -> bool {
        self.status.is_covered()
    }
}

/// Names a payer may appear under in the flat lists, as join keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PayerNames {
    pub payer_id: Option<String>,
    keys: Vec<String>,
}

impl PayerNames {
    /// Names for a payer string that did not resolve to a provider
    pub fn unresolved(name: &str) -> Self {
        let mut names = Self::default();
        names.push(name);
        names
    }

    pub fn for_provider(provider: &InsuranceProvider, requested: &str) -> Self {
        let mut names = Self {
            payer_id: Some(provider.id.clone()),
            keys: Vec::new(),
        };
        names.push(requested);
        names.push(&provider.id);
        names.push(&provider.label);
        for alias in &provider.aliases {
            names.push(alias);
        }
        names
    }

    fn push(&mut self, name: &str) {
        let key = normalize_vendor_id(name);
        if !key.is_empty() && !self.keys.contains(&key) {
            self.keys.push(key);
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        let key = normalize_vendor_id(name);
        !key.is_empty() && self.keys.contains(&key)
    }
}

/// Decide the coverage status of `test` for a payer.
pub fn evaluate_coverage(test: &DiagnosticTest, payer: &PayerNames) -> CoverageResult {
    let details = &test.details;
    let result = |status: CoverageStatus, source: CoverageSource, policy: Option<PayerPolicy>| CoverageResult {
        test_id: test.id.clone(),
        payer_id: payer.payer_id.clone(),
        status,
        source,
        policy,
    };

    if let Some(xref) = &details.coverage_cross_reference {
        let entry = payer
            .payer_id
            .as_deref()
            .and_then(|id| xref.private_payers.get(id))
            .or_else(|| {
                xref.private_payers
                    .iter()
                    .find(|(key, _)| payer.matches(key))
                    .map(|(_, policy)| policy)
            });
        if let Some(policy) = entry {
            let status = policy
                .status
                .as_deref()
                .map(CoverageStatus::parse)
                .unwrap_or(CoverageStatus::Unknown);
            return result(status, CoverageSource::PayerPolicy, Some(policy.clone()));
        }
    }

    if payer.payer_id.as_deref() == Some(GOVERNMENT_PAYER_ID) {
        if let Some(status) = details
            .medicare_coverage
            .as_ref()
            .and_then(|m| m.status.as_deref())
        {
            return result(CoverageStatus::parse(status), CoverageSource::GovernmentStatus, None);
        }
    }

    if details.commercial_payers.iter().any(|name| payer.matches(name)) {
        return result(CoverageStatus::Covered, CoverageSource::CoveredList, None);
    }

    if details
        .commercial_payers_non_coverage
        .iter()
        .any(|name| payer.matches(name))
    {
        return result(CoverageStatus::NotCovered, CoverageSource::NonCoverageList, None);
    }

    result(CoverageStatus::Unknown, CoverageSource::None, None)
}

pub struct InsuranceRepository<A> {
    adapter: Arc<A>,
}

impl<A: DataAdapter> InsuranceRepository<A> {
    pub fn new(adapter: Arc<A>) -> Self {
        Self { adapter }
    }

    pub async fn find_all(&self, args: &FindManyArgs) -> Result<QueryResult<InsuranceProvider>> {
        self.adapter.find_many(collections::INSURANCE, args).await
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<InsuranceProvider>> {
        self.adapter.find_by_id(collections::INSURANCE, id).await
    }

    /// Resolve a free-text payer name: alias first, then provider id, then label.
    pub async fn resolve_payer(&self, name: &str) -> Result<Option<InsuranceProvider>> {
        let needle = name.trim();
        if needle.is_empty() {
            return Ok(None);
        }
        let providers = self
            .adapter
            .get_raw_data::<InsuranceProvider>(collections::INSURANCE)
            .await?;

        let by_alias = providers
            .iter()
            .find(|p| p.aliases.iter().any(|a| a.eq_ignore_ascii_case(needle)));
        let by_id = || providers.iter().find(|p| p.id.eq_ignore_ascii_case(needle));
        let by_label = || providers.iter().find(|p| p.label.eq_ignore_ascii_case(needle));

        Ok(by_alias.or_else(by_id).or_else(by_label).cloned())
    }

    pub async fn payer_names(&self, payer: &str) -> Result<PayerNames> {
        Ok(match self.resolve_payer(payer).await? {
            Some(provider) => PayerNames::for_provider(&provider, payer),
            None => PayerNames::unresolved(payer),
        })
    }

    pub async fn get_coverage(&self, test: &DiagnosticTest, payer: &str) -> Result<CoverageResult> {
        let names = self.payer_names(payer).await?;
        Ok(evaluate_coverage(test, &names))
    }

    /// Coverage for a test looked up by id; `None` if the test is unknown.
    pub async fn get_coverage_by_test_id(&self, test_id: &str, payer: &str) -> Result<Option<CoverageResult>> {
        let test: Option<DiagnosticTest> = self.adapter.find_by_id(collections::TESTS, test_id).await?;
        match test {
            Some(test) => Ok(Some(self.get_coverage(&test, payer).await?)),
            None => Ok(None),
        }
    }

    /// Tests the payer covers fully or partially
    pub async fn find_tests_covered_by(&self, payer: &str) -> Result<Vec<DiagnosticTest>> {
        let names = self.payer_names(payer).await?;
        let tests = self
            .adapter
            .get_raw_data::<DiagnosticTest>(collections::TESTS)
            .await?;
        Ok(tests
            .iter()
            .filter(|t| evaluate_coverage(t, &names).is_covered())
            .cloned()
            .collect())
    }
}
