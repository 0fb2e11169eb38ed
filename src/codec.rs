//! Whole-table encodings.
//!
//! The binary form is CBOR: a self-describing tagged-value format, so the
//! file carries no header of its own. The JSON form holds the same snapshot
//! and is never written to disk by the store.

use serde::{Deserialize, Serialize};

use crate::{
    common::NdbError,
    row::Row,
    schema::{Column, Schema},
    value::Value,
};

/// Full contents of a table: schema in column order, rows in insertion order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub columns: Schema,
    pub rows: Vec<Row>,
}

/// # Errors
///
/// `Encode` when the CBOR writer fails.
pub fn to_binary(snapshot: &TableSnapshot) -> Result<Vec<u8>, NdbError> {
    let mut buffer = Vec::new();
    ciborium::ser::into_writer(snapshot, &mut buffer)
        .map_err(|e| NdbError::Encode(format!("CBOR serialization failed: {e}")))?;
    Ok(buffer)
}

/// # Errors
///
/// `Decode` on truncated or malformed input, or bytes left after the snapshot.
pub fn from_binary(bytes: &[u8]) -> Result<TableSnapshot, NdbError> {
    let mut reader = bytes;
    let snapshot = ciborium::de::from_reader(&mut reader)
        .map_err(|e| NdbError::Decode(format!("CBOR deserialization failed: {e}")))?;

    if !reader.is_empty() {
        return Err(NdbError::Decode(format!(
            "{} trailing byte(s) after table snapshot",
            reader.len()
        )));
    }

    Ok(snapshot)
}

/// # Errors
///
/// `Encode` when a value has no JSON form (non-finite numbers).
pub fn to_json(snapshot: &TableSnapshot) -> Result<serde_json::Value, NdbError> {
    if let Some(number) = first_non_finite(snapshot) {
        return Err(NdbError::Encode(format!(
            "JSON serialization failed: {number} has no JSON form"
        )));
    }

    serde_json::to_value(snapshot)
        .map_err(|e| NdbError::Encode(format!("JSON serialization failed: {e}")))
}

/// # Errors
///
/// `Decode` when `json` is not shaped like a snapshot.
pub fn from_json(json: serde_json::Value) -> Result<TableSnapshot, NdbError> {
    serde_json::from_value(json)
        .map_err(|e| NdbError::Decode(format!("JSON deserialization failed: {e}")))
}

// serde_json writes NaN and infinities as `null`, which cannot be read back.
fn first_non_finite(snapshot: &TableSnapshot) -> Option<f64> {
    let defaults = snapshot
        .columns
        .columns()
        .iter()
        .filter_map(Column::default_value);
    let cells = snapshot
        .rows
        .iter()
        .flat_map(|row| row.data.values().cloned());

    defaults
        .chain(cells)
        .find_map(|value| non_finite_in(&value))
}

fn non_finite_in(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) if !number.is_finite() => Some(*number),
        Value::List(items) => items.iter().find_map(non_finite_in),
        Value::Map(entries) => entries.values().find_map(non_finite_in),
        _ => None,
    }
}
