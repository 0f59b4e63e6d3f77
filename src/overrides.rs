//! Explicit inputs: turn `(key, value)` pairs supplied by the caller into a
//! `toml::Table` layer, and enumerate the input names.

use std::collections::HashSet;

use confique::meta::{FieldKind, Meta};
use serde::Serialize;
use toml::{Table, Value};

use crate::error::LetsconfigError;

/// Convert explicit inputs into a `toml::Table` layer.
///
/// Empty strings count as "not supplied" and are dropped. If multiple entries
/// target the same key, the last one wins. Keys not in `valid` are rejected.
pub fn overrides_to_table(
    entries: &[(String, Value)],
    valid: &HashSet<String>,
) -> Result<Table, LetsconfigError> {
    let mut table = Table::new();
    for (key, value) in entries {
        if !valid.contains(key) {
            return Err(LetsconfigError::UnknownInput(key.clone()));
        }
        if matches!(value, Value::String(s) if s.is_empty()) {
            table.remove(key);
            continue;
        }
        table.insert(key.clone(), value.clone());
    }
    Ok(table)
}

/// Serialize `source` and keep the top-level entries whose keys are in `valid`.
///
/// Fields the serializer omits (`None` with `skip_serializing_if`) never appear.
pub fn pairs_from<S: Serialize>(
    source: &S,
    valid: &HashSet<String>,
) -> Result<Vec<(String, Value)>, LetsconfigError> {
    let value = Value::try_from(source).map_err(|e| LetsconfigError::InvalidValue {
        key: "<inputs>".into(),
        reason: e.to_string(),
    })?;
    let Value::Table(table) = value else {
        return Err(LetsconfigError::InvalidValue {
            key: "<inputs>".into(),
            reason: "source did not serialize to a table".into(),
        });
    };
    Ok(table
        .into_iter()
        .filter(|(key, _)| valid.contains(key))
        .collect())
}

/// Names of the inputs a flat confique struct accepts.
pub fn valid_keys(meta: &Meta) -> HashSet<String> {
    meta.fields
        .iter()
        .filter(|field| matches!(field.kind, FieldKind::Leaf { .. }))
        .map(|field| field.name.to_string())
        .collect()
}
