use crate::record::{self, FieldValue, Record};
use serde::{Deserialize, Serialize};

/// Changelog entry as supplied in the input array. `id` is optional there.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawChangelogEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub date: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributor: Option<String>,
}

/// A catalog change: test added, updated or removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangelogEntry {
    pub id: String,
    /// ISO-8601 date; sorts lexicographically
    pub date: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributor: Option<String>,
}

impl Record for ChangelogEntry {
    fn id(&self) -> &str {
        &self.id
    }

    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(FieldValue::from(&self.id)),
            "date" => Some(FieldValue::from(&self.date)),
            "type" => Some(FieldValue::from(&self.kind)),
            "testId" => record::text(&self.test_id),
            "testName" => record::text(&self.test_name),
            "vendor" => record::text(&self.vendor),
            "category" => record::text(&self.category),
            "description" => Some(FieldValue::from(&self.description)),
            "contributor" => record::text(&self.contributor),
            _ => None,
        }
    }
}
