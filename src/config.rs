use crate::model::Category;
use crate::repository::search::DEFAULT_TEST_FIELDS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct CatalogConfig {
    pub data: DataConfig,
    pub search: SearchConfig,
}

/// Where the input files live. File names are relative to `dir`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DataConfig {
    pub dir: PathBuf,
    pub mrd: String,
    pub ecd: String,
    pub trm: String,
    pub cgp: String,
    pub hct: String,
    pub verification: String,
    pub contributions: String,
    pub assistance: String,
    pub insurance: String,
    pub payer_aliases: String,
    pub changelog: String,
    pub glossary: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
            mrd: "mrd.json".to_string(),
            ecd: "ecd.json".to_string(),
            trm: "trm.json".to_string(),
            cgp: "cgp.json".to_string(),
            hct: "hct.json".to_string(),
            verification: "verification.json".to_string(),
            contributions: "contributions.json".to_string(),
            assistance: "assistance.json".to_string(),
            insurance: "insurance.json".to_string(),
            payer_aliases: "payer_aliases.json".to_string(),
            changelog: "changelog.json".to_string(),
            glossary: "glossary.json".to_string(),
        }
    }
}

impl DataConfig {
    pub fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    pub fn category_file(&self, category: Category) -> &str {
        match category {
            Category::Mrd => &self.mrd,
            Category::Ecd => &self.ecd,
            Category::Trm => &self.trm,
            Category::Cgp => &self.cgp,
            Category::Hct => &self.hct,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    /// Fields of the test collection matched by `search`
    pub test_fields: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            test_fields: DEFAULT_TEST_FIELDS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("dxcatalog.toml")
}

/// Load the config file. A relative data dir is taken relative to the
/// file's own directory.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<CatalogConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let mut config: CatalogConfig = toml::from_str(&contents)?;
    if config.data.dir.is_relative() {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            config.data.dir = parent.join(&config.data.dir);
        }
    }
    tracing::debug!("Loaded config from {}", path.display());
    Ok(Some(config))
}

/// Load the config file, or fall back to defaults when there is none.
pub fn resolve_config(path: Option<&Path>) -> anyhow::Result<CatalogConfig> {
    Ok(load_config(path)?.unwrap_or_default())
}

pub fn write_config(path: &Path, config: &CatalogConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

/// Create the data directory if it does not exist yet.
pub fn ensure_data_dir(config: &DataConfig) -> anyhow::Result<()> {
    if !config.dir.as_os_str().is_empty() && !config.dir.exists() {
        std::fs::create_dir_all(&config.dir)?;
    }
    Ok(())
}
