//! Custom field commands.

use commerce_fields_core::{FieldKind, FieldValue, FieldValueError};
use serde_json::Value;
use thiserror::Error;

use super::print_json;

/// Errors from field commands.
#[derive(Debug, Error)]
pub enum FieldCommandError {
    #[error(transparent)]
    Field(#[from] FieldValueError),
    #[error("raw value is not JSON: {0}")]
    Input(serde_json::Error),
    #[error("failed to encode output: {0}")]
    Output(serde_json::Error),
}

/// Print the canonical value of `raw` for the field kind `kind`.
///
/// `raw` that is not JSON is treated as a plain string, matching how a
/// single category UID is stored.
pub fn normalize(kind: &str, raw: &str) -> Result<(), FieldCommandError> {
    let value = normalize_value(kind, raw)?;
    print_json(&value).map_err(FieldCommandError::Output)
}

fn normalize_value(kind: &str, raw: &str) -> Result<FieldValue, FieldCommandError> {
    let kind: FieldKind = kind.parse()?;
    let raw = match serde_json::from_str::<Value>(raw) {
        Ok(value) => value,
        Err(_) if !raw.trim_start().starts_with(['[', '{']) => Value::String(raw.to_string()),
        Err(e) => return Err(FieldCommandError::Input(e)),
    };
    Ok(FieldValue::normalize(kind, &raw)?)
}
