//! Vendor repository

use super::search::{owned_fields, search_collection, SearchOptions, DEFAULT_VENDOR_FIELDS};
use crate::adapter::{collections, DataAdapter};
use crate::model::{Vendor, VendorContribution, VendorVerification};
use crate::query::{FindManyArgs, QueryResult, Where};
use crate::slug::normalize_vendor_id;
use crate::Result;
use serde::Serialize;
use std::sync::Arc;

/// A verification together with the vendor that holds it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestVerification {
    pub vendor_id: String,
    pub vendor_name: String,
    #[serde(flatten)]
    pub verification: VendorVerification,
}

pub struct VendorRepository<A> {
    adapter: Arc<A>,
    search_fields: Vec<String>,
}

impl<A: DataAdapter> VendorRepository<A> {
    pub fn new(adapter: Arc<A>) -> Self {
        Self {
            adapter,
            search_fields: owned_fields(DEFAULT_VENDOR_FIELDS),
        }
    }

    pub async fn find_all(&self, args: &FindManyArgs) -> Result<QueryResult<Vendor>> {
        self.adapter.find_many(collections::VENDORS, args).await
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Vendor>> {
        self.adapter.find_by_id(collections::VENDORS, id).await
    }

    /// Look up by display name in any spelling that normalizes to the same id
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Vendor>> {
        self.find_by_id(&normalize_vendor_id(name)).await
    }

    pub async fn find_with_verified_tests(&self) -> Result<Vec<Vendor>> {
        self.filtered(Where::new().equals("hasVerifiedTests", true)).await
    }

    /// Vendors whose assistance program is active
    pub async fn find_with_assistance_programs(&self) -> Result<Vec<Vendor>> {
        self.filtered(Where::new().equals("hasAssistanceProgram", true)).await
    }

    pub async fn search(&self, query: &str, options: &SearchOptions) -> Result<QueryResult<Vendor>> {
        search_collection(
            self.adapter.as_ref(),
            collections::VENDORS,
            query,
            &self.search_fields,
            options,
        )
        .await
    }

    pub async fn get_verification_for_test(&self, test_id: &str) -> Result<Option<TestVerification>> {
        let vendors = self.adapter.get_raw_data::<Vendor>(collections::VENDORS).await?;
        let found = vendors.iter().find_map(|vendor| {
            vendor
                .verifications
                .iter()
                .find(|v| v.test_id == test_id)
                .map(|v| TestVerification {
                    vendor_id: vendor.id.clone(),
                    vendor_name: vendor.name.clone(),
                    verification: v.clone(),
                })
        });
        Ok(found)
    }

    /// Every contribution recorded against `test_id`, across all vendors
    pub async fn get_contributions_for_test(&self, test_id: &str) -> Result<Vec<VendorContribution>> {
        let vendors = self.adapter.get_raw_data::<Vendor>(collections::VENDORS).await?;
        Ok(vendors
            .iter()
            .flat_map(|vendor| vendor.contributions.iter())
            .filter(|c| c.test_id == test_id)
            .cloned()
            .collect())
    }

    async fn filtered(&self, filter: Where) -> Result<Vec<Vendor>> {
        let args = FindManyArgs::new().filter(filter);
        Ok(self.find_all(&args).await?.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dal::fixtures;

    fn repo() -> VendorRepository<crate::InMemoryAdapter> {
        VendorRepository::new(fixtures::adapter())
    }

    #[tokio::test]
    async fn test_find_by_name_normalizes() {
        let repo = repo();
        let vendor = repo.find_by_name("GUARDANT-health").await.unwrap().unwrap();
        assert_eq!(vendor.id, "guardant-health");
        assert_eq!(vendor.test_count, 2);
        assert!(repo.find_by_name("Nobody Labs").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_flag_filters() {
        let repo = repo();
        let verified = repo.find_with_verified_tests().await.unwrap();
        let ids: Vec<_> = verified.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["natera"]);

        let assisted = repo.find_with_assistance_programs().await.unwrap();
        let ids: Vec<_> = assisted.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["exact-sciences", "illumina"]);

        let illumina = repo.find_by_id("illumina").await.unwrap().unwrap();
        assert_eq!(illumina.test_count, 0);
    }

    #[tokio::test]
    async fn test_verification_and_contributions_for_test() {
        let repo = repo();
        let verification = repo.get_verification_for_test("mrd-1").await.unwrap().unwrap();
        assert_eq!(verification.vendor_id, "natera");
        assert_eq!(verification.verification.verifier_name.as_deref(), Some("Dr. A. Reviewer"));
        assert!(repo.get_verification_for_test("ecd-2").await.unwrap().is_none());

        let contributions = repo.get_contributions_for_test("ecd-1").await.unwrap();
        assert_eq!(contributions.len(), 2);
        assert!(repo.get_contributions_for_test("hct-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search() {
        let repo = repo();
        let result = repo.search("sciences", &SearchOptions::new()).await.unwrap();
        assert_eq!(result.meta.total, 1);
        assert_eq!(result.data[0].name, "Exact Sciences");
    }
}
