use crate::record::{self, FieldValue, Record};
use serde::{Deserialize, Serialize};

/// Glossary entry as supplied in the input map (keyed by term id).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGlossaryTerm {
    #[serde(default)]
    pub term: String,
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub related_terms: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlossaryTerm {
    pub id: String,
    pub slug: String,
    pub term: String,
    pub definition: String,
    pub related_terms: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

impl Record for GlossaryTerm {
    fn id(&self) -> &str {
        &self.id
    }

    fn slug(&self) -> Option<&str> {
        Some(&self.slug)
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(FieldValue::from(&self.id)),
            "slug" => Some(FieldValue::from(&self.slug)),
            "term" => Some(FieldValue::from(&self.term)),
            "definition" => Some(FieldValue::from(&self.definition)),
            "relatedTerms" => record::text_list(&self.related_terms),
            "source" => record::text(&self.source),
            "sourceUrl" => record::text(&self.source_url),
            _ => None,
        }
    }
}
