//! Test categories
//!
//! The five diagnostic-test classes. Codes are inert labels to the query
//! engine; the table here only stamps display metadata onto records.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    /// Molecular residual disease
    Mrd,
    /// Early cancer detection (screening)
    Ecd,
    /// Treatment response monitoring
    Trm,
    /// Comprehensive genomic profiling
    Cgp,
    /// Hereditary cancer testing
    Hct,
}

impl Category {
    pub fn code(&self) -> &'static str {
        match self {
            Category::Mrd => "MRD",
            Category::Ecd => "ECD",
            Category::Trm => "TRM",
            Category::Cgp => "CGP",
            Category::Hct => "HCT",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Mrd => "Molecular Residual Disease",
            Category::Ecd => "Early Cancer Detection",
            Category::Trm => "Treatment Response Monitoring",
            Category::Cgp => "Comprehensive Genomic Profiling",
            Category::Hct => "Hereditary Cancer Testing",
        }
    }

    pub fn url_path(&self) -> &'static str {
        match self {
            Category::Mrd => "/mrd",
            Category::Ecd => "/screen",
            Category::Trm => "/monitor",
            Category::Cgp => "/treatment",
            Category::Hct => "/risk",
        }
    }

    pub fn all() -> &'static [Category] {
        &[
            Category::Mrd,
            Category::Ecd,
            Category::Trm,
            Category::Cgp,
            Category::Hct,
        ]
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "mrd" => Ok(Category::Mrd),
            "ecd" | "screening" => Ok(Category::Ecd),
            "trm" | "monitoring" => Ok(Category::Trm),
            // TDS (treatment decision support) is the older name for CGP
            "cgp" | "tds" => Ok(Category::Cgp),
            "hct" | "hereditary" => Ok(Category::Hct),
            _ => Err(Error::InvalidCategory(s.to_string())),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_roundtrip() {
        for category in Category::all() {
            let parsed: Category = category.code().parse().unwrap();
            assert_eq!(*category, parsed);
        }
    }

    #[test]
    fn test_category_aliases() {
        assert_eq!(Category::from_str("tds").unwrap(), Category::Cgp);
        assert_eq!(Category::from_str(" Mrd ").unwrap(), Category::Mrd);
        assert!(Category::from_str("xyz").is_err());
    }

    #[test]
    fn test_category_serializes_as_code() {
        assert_eq!(serde_json::to_string(&Category::Hct).unwrap(), "\"HCT\"");
    }
}
