use std::fmt::Display;

use indexmap::IndexMap;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::value::Value;

pub const ROW_ID_BYTE_SIZE: usize = 16;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub id: String,
    pub data: IndexMap<String, Value>,
}

impl Row {
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.data.get(column)
    }

    /// True when every `(column, value)` pair equals the stored value. A
    /// `Null` expectation matches a column absent from the row.
    pub(crate) fn matches<'a>(
        &self,
        predicate: impl IntoIterator<Item = (&'a String, &'a Value)>,
    ) -> bool {
        predicate
            .into_iter()
            .all(|(column, expected)| self.get(column).unwrap_or(&Value::Null) == expected)
    }
}

/// Fresh 128-bit random id, lowercase hex.
#[must_use]
pub fn generate_row_id() -> String {
    let mut bytes = [0u8; ROW_ID_BYTE_SIZE];
    rand::rng().fill(&mut bytes[..]);

    hex::encode(bytes)
}

impl Display for Row {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let row: Vec<String> = self
            .data
            .iter()
            .map(|(column, value)| format!("{column}={value}"))
            .collect();
        write!(f, "{} | {}", self.id, row.join(" | "))
    }
}
