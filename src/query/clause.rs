//! Where-clauses
//!
//! A clause is a recursive boolean expression over a record. Clauses at the
//! same level combine conjunctively, so `{vendor: "Natera", OR: [...]}` means
//! "vendor is Natera AND any of the OR branches".

use crate::query::operators::Operator;
use crate::record::{FieldValue, Record};
use crate::{Error, Result};
use serde_json::Value;

/// Operators applied to a single field; all must pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Condition {
    operators: Vec<Operator>,
}

impl Condition {
    pub fn new(operators: Vec<Operator>) -> Self {
        Self { operators }
    }

    /// Literal condition: implicit equality
    pub fn equals(value: impl Into<FieldValue>) -> Self {
        Self::new(vec![Operator::Equals(value.into())])
    }

    /// Add another operator to the same field
    pub fn and(mut self, operator: Operator) -> Self {
        self.operators.push(operator);
        self
    }

    pub fn operators(&self) -> &[Operator] {
        &self.operators
    }

    pub fn matches(&self, value: Option<&FieldValue>) -> bool {
        self.operators.iter().all(|op| op.matches(value))
    }
}

impl From<Operator> for Condition {
    fn from(operator: Operator) -> Self {
        Self::new(vec![operator])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    Field { name: String, condition: Condition },
    And(Vec<Clause>),
    Or(Vec<Clause>),
    Not(Box<Clause>),
}

impl Clause {
    pub fn field(name: impl Into<String>, condition: impl Into<Condition>) -> Self {
        Clause::Field {
            name: name.into(),
            condition: condition.into(),
        }
    }

    pub fn equals(name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Clause::field(name, Condition::equals(value))
    }

    pub fn negate(clause: Clause) -> Self {
        Clause::Not(Box::new(clause))
    }

    pub fn matches<R: Record>(&self, record: &R) -> bool {
        match self {
            Clause::Field { name, condition } => condition.matches(record.field(name).as_ref()),
            Clause::And(clauses) => clauses.iter().all(|c| c.matches(record)),
            Clause::Or(clauses) => clauses.iter().any(|c| c.matches(record)),
            Clause::Not(clause) => !clause.matches(record),
        }
    }
}

/// A conjunctive list of clauses. Empty matches everything.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Where {
    clauses: Vec<Clause>,
}

impl Where {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Add a clause to the conjunction
    pub fn with(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }

    /// Add a field condition to the conjunction
    pub fn field(self, name: impl Into<String>, condition: impl Into<Condition>) -> Self {
        self.with(Clause::field(name, condition))
    }

    /// Add an implicit-equality field condition
    pub fn equals(self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.with(Clause::equals(name, value))
    }

    /// Collapse into a single clause
    pub fn into_clause(mut self) -> Clause {
        if self.clauses.len() == 1 {
            self.clauses.remove(0)
        } else {
            Clause::And(self.clauses)
        }
    }

    pub fn matches<R: Record>(&self, record: &R) -> bool {
        self.clauses.iter().all(|c| c.matches(record))
    }

    /// Parse the JSON object syntax:
    ///
    /// ```json
    /// { "category": "MRD",
    ///   "sensitivity": { "gte": 90 },
    ///   "OR": [ { "vendor": "Natera" }, { "cancerTypes": { "arrayContains": "lung" } } ],
    ///   "NOT": { "fdaStatus": { "isNull": true } } }
    /// ```
    ///
    /// Unknown operator names are logged and skipped, leaving the rest of the
    /// field condition in force.
    pub fn from_json(value: &Value) -> Result<Self> {
        let map = match value {
            Value::Null => return Ok(Self::new()),
            Value::Object(map) => map,
            other => {
                return Err(Error::InvalidQuery(format!(
                    "where-clause must be an object, got {}",
                    json_kind(other)
                )));
            }
        };

        let mut clauses = Vec::with_capacity(map.len());
        for (key, entry) in map {
            let clause = match key.as_str() {
                "AND" => Clause::And(sub_clauses(key, entry)?),
                "OR" => Clause::Or(sub_clauses(key, entry)?),
                "NOT" => match entry {
                    Value::Array(_) => Clause::And(
                        sub_clauses(key, entry)?
                            .into_iter()
                            .map(Clause::negate)
                            .collect(),
                    ),
                    _ => Clause::negate(Where::from_json(entry)?.into_clause()),
                },
                field => Clause::Field {
                    name: field.to_string(),
                    condition: parse_condition(field, entry),
                },
            };
            clauses.push(clause);
        }
        Ok(Self { clauses })
    }
}

impl From<Clause> for Where {
    fn from(clause: Clause) -> Self {
        Self::new().with(clause)
    }
}

fn sub_clauses(key: &str, value: &Value) -> Result<Vec<Clause>> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| Where::from_json(item).map(Where::into_clause))
            .collect(),
        Value::Object(_) => Ok(vec![Where::from_json(value)?.into_clause()]),
        other => Err(Error::InvalidQuery(format!(
            "{} expects an array of clauses, got {}",
            key,
            json_kind(other)
        ))),
    }
}

fn parse_condition(field: &str, value: &Value) -> Condition {
    let Value::Object(ops) = value else {
        return Condition::equals(FieldValue::from(value));
    };

    let mut operators = Vec::with_capacity(ops.len());
    for (name, target) in ops {
        match Operator::from_json(name, target) {
            Some(op) => operators.push(op),
            None => tracing::warn!("Unknown operator '{}' on field '{}' ignored", name, field),
        }
    }
    Condition::new(operators)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
