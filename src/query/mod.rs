//! Query engine
//!
//! Provides the collection-agnostic query operations:
//! - Leaf operators (equality, substring, range, list membership, null checks)
//! - Recursive where-clauses with AND / OR / NOT
//! - Stable multi-key sorting with missing values last
//! - Projection, pagination and the `{data, meta}` result envelope

pub mod operators;
pub mod clause;
pub mod sort;
pub mod builder;

pub use operators::Operator;
pub use clause::{Clause, Condition, Where};
pub use sort::{order_by, OrderSpec, SortDirection, SortKey};
pub use builder::{
    build_result, paginate, select, FindManyArgs, QueryBuilder, QueryMeta, QueryResult, Selection,
};

#[cfg(test)]
pub(crate) mod test_support {
    use crate::record::{self, FieldValue, Record};
    use serde::Serialize;

    #[derive(Debug, Clone, PartialEq, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Item {
        pub id: String,
        pub vendor: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub sensitivity: Option<f64>,
        pub cancer_types: Vec<String>,
    }

    impl Record for Item {
        fn id(&self) -> &str {
            &self.id
        }

        fn field(&self, name: &str) -> Option<FieldValue> {
            match name {
                "id" => Some(FieldValue::from(&self.id)),
                "vendor" => Some(FieldValue::from(&self.vendor)),
                "sensitivity" => self.sensitivity.map(FieldValue::Number),
                "cancerTypes" => record::text_list(&self.cancer_types),
                _ => None,
            }
        }
    }

    pub fn item(id: &str, vendor: &str, sensitivity: Option<f64>, cancer_types: &[&str]) -> Item {
        Item {
            id: id.to_string(),
            vendor: vendor.to_string(),
            sensitivity,
            cancer_types: cancer_types.iter().map(|s| s.to_string()).collect(),
        }
    }
}
