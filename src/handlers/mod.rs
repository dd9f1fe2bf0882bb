//! HTTP handlers
//!
//! Every endpoint takes a JSON body and answers with the `ApiResponse`
//! envelope. Core failures come back as `{success: false, error}`.

pub mod department;
pub mod employee;
pub mod extract;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};
use crate::store::Record;

/// Parse a `data` payload; a missing payload is an empty change set.
pub fn parse_data<T: DeserializeOwned + Default>(data: Value) -> AppResult<T> {
    if data.is_null() {
        return Ok(T::default());
    }
    Ok(serde_json::from_value(data)?)
}

/// Reduce a record to `id` plus the requested fields.
pub fn project<M: Record, S: AsRef<str>>(record: &M, fields: &[S]) -> AppResult<Value> {
    let full = serde_json::to_value(record)?;
    let mut out = Map::new();
    out.insert("id".to_string(), Value::from(record.id()));
    for field in fields {
        let field = field.as_ref();
        if !M::has_field(field) {
            return Err(AppError::BadRequest(format!(
                "Invalid field '{}' on {}",
                field,
                M::MODEL
            )));
        }
        out.insert(
            field.to_string(),
            full.get(field).cloned().unwrap_or(Value::Null),
        );
    }
    Ok(Value::Object(out))
}

/// Project every record, failing on the first unknown field.
pub fn project_all<M: Record, S: AsRef<str>>(records: &[M], fields: &[S]) -> AppResult<Vec<Value>> {
    records.iter().map(|r| project(r, fields)).collect()
}
