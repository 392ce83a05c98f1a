//! # Rich Query Selectors
//!
//! A small subset of the document-store query language used by the record
//! contracts:
//!
//! ```json
//! {"selector": {"docType": "Event", "time": {"$gte": "10:00"}}, "fields": ["value"]}
//! ```
//!
//! Field values match by equality, or by one of `$eq`, `$ne`, `$gt`,
//! `$gte`, `$lt`, `$lte`. Comparisons apply to numbers and strings only.

use serde_json::{Map, Value};
use std::cmp::Ordering;

use super::errors::QueryError;

#[derive(Debug, Clone, PartialEq)]
enum Condition {
    Eq(Value),
    Ne(Value),
    Gt(Value),
    Gte(Value),
    Lt(Value),
    Lte(Value),
}

impl Condition {
    fn parse(op: &str, operand: Value) -> Result<Self, QueryError> {
        Ok(match op {
            "$eq" => Self::Eq(operand),
            "$ne" => Self::Ne(operand),
            "$gt" => Self::Gt(operand),
            "$gte" => Self::Gte(operand),
            "$lt" => Self::Lt(operand),
            "$lte" => Self::Lte(operand),
            other => return Err(QueryError::UnsupportedOperator(other.to_string())),
        })
    }

    fn holds(&self, actual: Option<&Value>) -> bool {
        match self {
            Self::Eq(expected) => actual == Some(expected),
            Self::Ne(expected) => actual != Some(expected),
            Self::Gt(bound) => compare(actual, bound) == Some(Ordering::Greater),
            Self::Gte(bound) => matches!(
                compare(actual, bound),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Self::Lt(bound) => compare(actual, bound) == Some(Ordering::Less),
            Self::Lte(bound) => matches!(
                compare(actual, bound),
                Some(Ordering::Less | Ordering::Equal)
            ),
        }
    }
}

fn compare(actual: Option<&Value>, bound: &Value) -> Option<Ordering> {
    match (actual?, bound) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// A parsed rich query.
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    conditions: Vec<(String, Condition)>,
    fields: Option<Vec<String>>,
}

impl Selector {
    /// Parse a JSON query string.
    pub fn parse(query: &str) -> Result<Self, QueryError> {
        let doc: Value =
            serde_json::from_str(query).map_err(|e| QueryError::InvalidJson(e.to_string()))?;

        let selector = doc
            .get("selector")
            .and_then(Value::as_object)
            .ok_or(QueryError::MissingSelector)?;

        let mut conditions = Vec::with_capacity(selector.len());
        for (field, spec) in selector {
            match spec {
                Value::Object(ops) if ops.keys().all(|k| k.starts_with('$')) && !ops.is_empty() => {
                    for (op, operand) in ops {
                        conditions.push((field.clone(), Condition::parse(op, operand.clone())?));
                    }
                }
                other => conditions.push((field.clone(), Condition::Eq(other.clone()))),
            }
        }

        let fields = match doc.get("fields") {
            None | Some(Value::Null) => None,
            Some(Value::Array(items)) => Some(
                items
                    .iter()
                    .map(|v| v.as_str().map(str::to_string))
                    .collect::<Option<Vec<_>>>()
                    .ok_or(QueryError::InvalidFields)?,
            ),
            Some(_) => return Err(QueryError::InvalidFields),
        };

        Ok(Self { conditions, fields })
    }

    /// True when the document satisfies every condition.
    #[must_use]
    pub fn matches(&self, doc: &Value) -> bool {
        let Some(object) = doc.as_object() else {
            return false;
        };
        self.conditions
            .iter()
            .all(|(field, condition)| condition.holds(object.get(field)))
    }

    /// Apply the `fields` projection, if any.
    #[must_use]
    pub fn project(&self, doc: &Value) -> Value {
        match (&self.fields, doc.as_object()) {
            (Some(fields), Some(object)) => {
                let projected: Map<String, Value> = fields
                    .iter()
                    .filter_map(|f| object.get(f).map(|v| (f.clone(), v.clone())))
                    .collect();
                Value::Object(projected)
            }
            _ => doc.clone(),
        }
    }

    /// Match raw stored bytes, returning the projected document on a hit.
    /// Values that are not JSON objects never match.
    #[must_use]
    pub fn evaluate(&self, value: &[u8]) -> Option<Vec<u8>> {
        let doc: Value = serde_json::from_slice(value).ok()?;
        if !self.matches(&doc) {
            return None;
        }
        serde_json::to_vec(&self.project(&doc)).ok()
    }
}
