//! Search predicates
//!
//! A filter is a tree of field comparisons joined by AND/OR. On the wire it
//! is externally tagged, e.g.
//! `{"or": [{"ilike": {"field": "name", "value": "ann"}}, {"eq": {"field": "active", "value": true}}]}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::store::Record;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    /// Matches every record
    #[default]
    All,
    Eq { field: String, value: Value },
    Ne { field: String, value: Value },
    /// Case-insensitive substring match
    Ilike { field: String, value: String },
    And(Vec<Filter>),
    Or(Vec<Filter>),
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Ne {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn ilike(field: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::Ilike {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Reject predicates on fields `M` does not store.
    pub fn check<M: Record>(&self) -> AppResult<()> {
        match self {
            Filter::All => Ok(()),
            Filter::Eq { field, .. } | Filter::Ne { field, .. } | Filter::Ilike { field, .. } => {
                if M::has_field(field) {
                    Ok(())
                } else {
                    Err(AppError::BadRequest(format!(
                        "Invalid field '{}' on {}",
                        field,
                        M::MODEL
                    )))
                }
            }
            Filter::And(items) | Filter::Or(items) => items.iter().try_for_each(Filter::check::<M>),
        }
    }

    /// Evaluate against a record serialized as a JSON object.
    pub fn matches(&self, record: &Value) -> bool {
        match self {
            Filter::All => true,
            Filter::Eq { field, value } => values_equal(field_value(record, field), value),
            Filter::Ne { field, value } => !values_equal(field_value(record, field), value),
            Filter::Ilike { field, value } => {
                let needle = value.to_lowercase();
                match field_value(record, field) {
                    Value::String(s) => s.to_lowercase().contains(&needle),
                    Value::Null => false,
                    other => other.to_string().to_lowercase().contains(&needle),
                }
            }
            Filter::And(items) => items.iter().all(|f| f.matches(record)),
            Filter::Or(items) => items.iter().any(|f| f.matches(record)),
        }
    }
}

fn field_value<'a>(record: &'a Value, field: &str) -> &'a Value {
    record.get(field).unwrap_or(&Value::Null)
}

fn values_equal(stored: &Value, wanted: &Value) -> bool {
    match (stored, wanted) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        _ => stored == wanted,
    }
}
