//! Secondary collections: insurance providers, changelog, glossary

use crate::model::{
    ChangelogEntry, GlossaryTerm, InsuranceProvider, RawChangelogEntry, RawGlossaryTerm,
    RawInsuranceProvider,
};
use crate::slug::slugify;
use std::collections::BTreeMap;

/// Build providers from the id-keyed map, attaching the aliases that point
/// at each provider.
pub fn normalize_insurance(
    providers: &BTreeMap<String, RawInsuranceProvider>,
    aliases: &BTreeMap<String, String>,
) -> Vec<InsuranceProvider> {
    let mut by_target: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for (alias, target) in aliases {
        if !providers.contains_key(target) {
            tracing::warn!("Payer alias '{}' points at unknown provider '{}'", alias, target);
            continue;
        }
        by_target.entry(target.as_str()).or_default().push(alias.clone());
    }

    providers
        .iter()
        .map(|(id, raw)| {
            let label = if raw.label.trim().is_empty() {
                id.clone()
            } else {
                raw.label.clone()
            };
            InsuranceProvider {
                id: id.clone(),
                slug: slugify(&label),
                label,
                category: raw.category.clone(),
                aliases: by_target.remove(id.as_str()).unwrap_or_default(),
                extra: raw.extra.clone(),
            }
        })
        .collect()
}

/// Assign positional ids (`change-1`, `change-2`, ...) to entries without one.
pub fn normalize_changelog(entries: Vec<RawChangelogEntry>) -> Vec<ChangelogEntry> {
    entries
        .into_iter()
        .enumerate()
        .map(|(i, raw)| ChangelogEntry {
            id: raw
                .id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| format!("change-{}", i + 1)),
            date: raw.date,
            kind: raw.kind,
            test_id: raw.test_id,
            test_name: raw.test_name,
            vendor: raw.vendor,
            category: raw.category,
            description: raw.description,
            contributor: raw.contributor,
        })
        .collect()
}

/// Glossary terms from the id-keyed map. The slug comes from the term,
/// or the id when the term is blank.
pub fn normalize_glossary(terms: &BTreeMap<String, RawGlossaryTerm>) -> Vec<GlossaryTerm> {
    terms
        .iter()
        .map(|(id, raw)| {
            let term = if raw.term.trim().is_empty() {
                id.clone()
            } else {
                raw.term.clone()
            };
            GlossaryTerm {
                id: id.clone(),
                slug: slugify(&term),
                term,
                definition: raw.definition.clone(),
                related_terms: raw.related_terms.clone(),
                source: raw.source.clone(),
                source_url: raw.source_url.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insurance_aliases_attached() {
        let mut providers = BTreeMap::new();
        providers.insert(
            "aetna".to_string(),
            RawInsuranceProvider {
                label: "Aetna".to_string(),
                category: Some("national".to_string()),
                ..RawInsuranceProvider::default()
            },
        );
        providers.insert(
            "bcbs-ma".to_string(),
            RawInsuranceProvider {
                label: "Blue Cross Blue Shield of Massachusetts".to_string(),
                ..RawInsuranceProvider::default()
            },
        );
        let mut aliases = BTreeMap::new();
        aliases.insert("Aetna Inc.".to_string(), "aetna".to_string());
        aliases.insert("CVS Health".to_string(), "aetna".to_string());
        aliases.insert("Nowhere Health".to_string(), "missing".to_string());

        let normalized = normalize_insurance(&providers, &aliases);
        assert_eq!(normalized.len(), 2);
        assert_eq!(normalized[0].aliases, vec!["Aetna Inc.", "CVS Health"]);
        assert_eq!(normalized[1].slug, "blue-cross-blue-shield-of-massachusetts");
        assert!(normalized[1].aliases.is_empty());
    }

    #[test]
    fn test_changelog_ids() {
        let entries = vec![
            RawChangelogEntry {
                id: Some("c-42".to_string()),
                date: "2025-01-02".to_string(),
                ..RawChangelogEntry::default()
            },
            RawChangelogEntry {
                date: "2025-01-03".to_string(),
                ..RawChangelogEntry::default()
            },
        ];
        let normalized = normalize_changelog(entries);
        assert_eq!(normalized[0].id, "c-42");
        assert_eq!(normalized[1].id, "change-2");
    }

    #[test]
    fn test_glossary_slugs() {
        let mut terms = BTreeMap::new();
        terms.insert(
            "ctdna".to_string(),
            RawGlossaryTerm {
                term: "Circulating Tumor DNA (ctDNA)".to_string(),
                definition: "Tumor-derived DNA fragments in the bloodstream".to_string(),
                ..RawGlossaryTerm::default()
            },
        );
        terms.insert("lod".to_string(), RawGlossaryTerm::default());

        let normalized = normalize_glossary(&terms);
        assert_eq!(normalized[0].slug, "circulating-tumor-dna-ctdna");
        assert_eq!(normalized[1].term, "lod");
        assert_eq!(normalized[1].slug, "lod");
    }
}
