//! Data access layer facade
//!
//! [`DalInputs`] gathers every raw input; [`Dal`] normalizes them once into
//! an [`InMemoryAdapter`] and hands out the repositories that share it.

use crate::adapter::{collections, DataAdapter, InMemoryAdapter};
use crate::config::{CatalogConfig, DataConfig};
use crate::model::{
    AssistanceProgram, Category, ContributionRecord, RawChangelogEntry, RawGlossaryTerm,
    RawInsuranceProvider, RawTest, VerificationRecord,
};
use crate::normalize::{
    consolidate_vendors, normalize_changelog, normalize_glossary, normalize_insurance,
    normalize_tests, VendorSources,
};
use crate::repository::{
    ChangelogRepository, GlossaryRepository, InsuranceRepository, TestRepository, VendorRepository,
};
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// Every raw input the catalog is built from.
#[derive(Debug, Clone, Default)]
pub struct DalInputs {
    /// One array per category
    pub tests: BTreeMap<Category, Vec<RawTest>>,
    /// Test id → vendor verification
    pub verifications: BTreeMap<String, VerificationRecord>,
    /// Test id → submissions
    pub contributions: BTreeMap<String, Vec<ContributionRecord>>,
    /// Vendor display name → assistance program
    pub assistance: BTreeMap<String, AssistanceProgram>,
    /// Provider id → provider
    pub insurance: BTreeMap<String, RawInsuranceProvider>,
    /// Alias → provider id
    pub payer_aliases: BTreeMap<String, String>,
    pub changelog: Vec<RawChangelogEntry>,
    /// Term id → term
    pub glossary: BTreeMap<String, RawGlossaryTerm>,
}

/// A map value given either as a single record or as a list of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> From<OneOrMany<T>> for Vec<T> {
    fn from(value: OneOrMany<T>) -> Self {
        match value {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

impl DalInputs {
    /// Read every input file under the data dir. A missing file is an empty
    /// input; a file that does not parse is an error.
    pub fn load(config: &DataConfig) -> Result<Self> {
        if !config.dir.is_dir() {
            return Err(Error::Config(format!(
                "data directory {} does not exist",
                config.dir.display()
            )));
        }

        let mut tests = BTreeMap::new();
        for &category in Category::all() {
            let raws: Vec<RawTest> = read_json(&config.path(config.category_file(category)))?;
            tests.insert(category, raws);
        }

        let contributions: BTreeMap<String, OneOrMany<ContributionRecord>> =
            read_json(&config.path(&config.contributions))?;

        Ok(Self {
            tests,
            verifications: read_json(&config.path(&config.verification))?,
            contributions: contributions
                .into_iter()
                .map(|(test_id, records)| (test_id, records.into()))
                .collect(),
            assistance: read_json(&config.path(&config.assistance))?,
            insurance: read_json(&config.path(&config.insurance))?,
            payer_aliases: read_json(&config.path(&config.payer_aliases))?,
            changelog: read_json(&config.path(&config.changelog))?,
            glossary: read_json(&config.path(&config.glossary))?,
        })
    }

    pub fn with_tests(mut self, category: Category, tests: Vec<RawTest>) -> Self {
        self.tests.entry(category).or_default().extend(tests);
        self
    }

    pub fn test_count(&self) -> usize {
        self.tests.values().map(Vec::len).sum()
    }

    /// Normalize every input and register the resulting collections.
    pub fn into_adapter(self) -> InMemoryAdapter {
        let tests = normalize_tests(self.tests);
        let vendors = consolidate_vendors(VendorSources {
            tests: &tests,
            verifications: &self.verifications,
            contributions: &self.contributions,
            assistance: &self.assistance,
        });
        let insurance = normalize_insurance(&self.insurance, &self.payer_aliases);
        let changelog = normalize_changelog(self.changelog);
        let glossary = normalize_glossary(&self.glossary);

        tracing::info!(
            "Loaded catalog: {} tests, {} vendors, {} payers, {} changes, {} glossary terms",
            tests.len(),
            vendors.len(),
            insurance.len(),
            changelog.len(),
            glossary.len()
        );

        InMemoryAdapter::new()
            .with_collection(collections::TESTS, tests)
            .with_collection(collections::VENDORS, vendors)
            .with_collection(collections::INSURANCE, insurance)
            .with_collection(collections::CHANGELOG, changelog)
            .with_collection(collections::GLOSSARY, glossary)
    }
}

fn read_json<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if !path.exists() {
        tracing::debug!("{} not found; using empty input", path.display());
        return Ok(T::default());
    }
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| {
        tracing::warn!("Failed to parse {}: {}", path.display(), e);
        Error::Json(e)
    })
}

/// Repositories over one shared adapter.
pub struct Dal<A = InMemoryAdapter> {
    adapter: Arc<A>,
    tests: TestRepository<A>,
    vendors: VendorRepository<A>,
    insurance: InsuranceRepository<A>,
    changelog: ChangelogRepository<A>,
    glossary: GlossaryRepository<A>,
}

impl Dal<InMemoryAdapter> {
    pub fn new(inputs: DalInputs) -> Self {
        Self::from_adapter(Arc::new(inputs.into_adapter()))
    }

    /// Load inputs from disk as described by `config`.
    pub fn from_config(config: &CatalogConfig) -> Result<Self> {
        let inputs = DalInputs::load(&config.data)?;
        Ok(Self::new(inputs).with_test_search_fields(config.search.test_fields.clone()))
    }
}

impl<A: DataAdapter> Dal<A> {
    pub fn from_adapter(adapter: Arc<A>) -> Self {
        Self {
            tests: TestRepository::new(Arc::clone(&adapter)),
            vendors: VendorRepository::new(Arc::clone(&adapter)),
            insurance: InsuranceRepository::new(Arc::clone(&adapter)),
            changelog: ChangelogRepository::new(Arc::clone(&adapter)),
            glossary: GlossaryRepository::new(Arc::clone(&adapter)),
            adapter,
        }
    }

    pub fn with_test_search_fields(mut self, fields: Vec<String>) -> Self {
        self.tests = self.tests.with_search_fields(fields);
        self
    }

    pub fn adapter(&self) -> &Arc<A> {
        &self.adapter
    }

    pub fn tests(&self) -> &TestRepository<A> {
        &self.tests
    }

    pub fn vendors(&self) -> &VendorRepository<A> {
        &self.vendors
    }

    pub fn insurance(&self) -> &InsuranceRepository<A> {
        &self.insurance
    }

    pub fn changelog(&self) -> &ChangelogRepository<A> {
        &self.changelog
    }

    pub fn glossary(&self) -> &GlossaryRepository<A> {
        &self.glossary
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::FindManyArgs;
    use crate::record::Record;
    use serde_json::json;
    use tempfile::TempDir;

    fn two_test_dal() -> Dal {
        let tests: Vec<RawTest> = serde_json::from_value(json!([
            { "id": "mrd-1", "name": "Signatera", "vendor": "Natera", "cancerTypes": ["Colorectal", "Breast"] },
            { "id": "mrd-2", "name": "Reveal", "vendor": "Guardant Health", "cancerTypes": ["Colorectal", "Lung"] }
        ]))
        .unwrap();
        Dal::new(DalInputs::default().with_tests(Category::Mrd, tests))
    }

    #[tokio::test]
    async fn test_two_record_scenario() {
        let dal = two_test_dal();

        let colorectal = dal.tests().find_by_cancer("Colorectal").await.unwrap();
        assert_eq!(colorectal.len(), 2);

        let found = dal.tests().search("guardant", &Default::default()).await.unwrap();
        let ids: Vec<_> = found.data.iter().map(|t| t.id()).collect();
        assert_eq!(ids, vec!["mrd-2"]);

        let page = dal
            .tests()
            .find_all(&FindManyArgs::new().skip(1).take(1))
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page.meta.has_more, Some(false));
        assert_eq!(page.meta.total, 2);
    }

    #[tokio::test]
    async fn test_fixture_counts_by_category() {
        let dal = fixtures::dal();
        let counts = dal.tests().count_by_category().await.unwrap();
        assert_eq!(counts.len(), 4);
        assert_eq!(counts["MRD"], 2);
        assert_eq!(counts["ECD"], 2);
        assert_eq!(counts["CGP"], 1);
        assert_eq!(counts["HCT"], 1);
        assert!(!counts.contains_key("TRM"));
    }

    #[tokio::test]
    async fn test_every_collection_registered() {
        let dal = fixtures::dal();
        let mut expected: Vec<String> = collections::ALL.iter().map(|c| c.to_string()).collect();
        expected.sort();
        assert_eq!(dal.adapter().collection_names(), expected);
        assert_eq!(dal.adapter().len(collections::VENDORS).unwrap(), 6);
    }

    fn write(dir: &Path, file: &str, value: serde_json::Value) {
        std::fs::write(dir.join(file), serde_json::to_string_pretty(&value).unwrap()).unwrap();
    }

    #[tokio::test]
    async fn test_load_from_directory() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "mrd.json",
            json!([{ "id": "mrd-1", "name": "Signatera", "vendor": "Natera" }]),
        );
        write(
            dir.path(),
            "tds.json",
            json!([{ "id": "cgp-1", "name": "Tempus xT", "vendor": "Tempus" }]),
        );
        write(
            dir.path(),
            "contributions.json",
            json!({
                "mrd-1": { "company": "Natera", "type": "data" },
                "cgp-1": [{ "company": "Tempus" }, { "company": "Tempus" }]
            }),
        );

        let config = DataConfig {
            dir: dir.path().to_path_buf(),
            cgp: "tds.json".to_string(),
            ..DataConfig::default()
        };
        let inputs = DalInputs::load(&config).unwrap();
        assert_eq!(inputs.test_count(), 2);
        assert_eq!(inputs.contributions["mrd-1"].len(), 1);
        assert_eq!(inputs.contributions["cgp-1"].len(), 2);
        assert!(inputs.glossary.is_empty());

        let dal = Dal::new(inputs);
        let tempus = dal.vendors().find_by_name("Tempus").await.unwrap().unwrap();
        assert_eq!(tempus.contribution_count, 2);
        assert_eq!(tempus.categories, vec!["CGP"]);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("glossary.json"), "{ not json").unwrap();
        let config = DataConfig {
            dir: dir.path().to_path_buf(),
            ..DataConfig::default()
        };
        assert!(matches!(DalInputs::load(&config), Err(Error::Json(_))));
    }

    #[test]
    fn test_missing_data_dir() {
        let dir = TempDir::new().unwrap();
        let config = DataConfig {
            dir: dir.path().join("absent"),
            ..DataConfig::default()
        };
        assert!(matches!(DalInputs::load(&config), Err(Error::Config(_))));
    }
}
