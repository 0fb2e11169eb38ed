use std::{collections::HashSet, fmt::Display};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{common::NdbError, value::Value};

/// Settings shared by every column, typed by the value domain of the column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef<T> {
    pub name: String,
    pub default: Option<T>,
    pub required: bool,
    pub unique: bool,
}

impl<T> ColumnDef<T> {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
            required: false,
            unique: false,
        }
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    #[must_use]
    pub fn with_default(mut self, default: T) -> Self {
        self.default = Some(default);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Column {
    Text(ColumnDef<String>),
    Number(ColumnDef<f64>),
    Boolean(ColumnDef<bool>),
    Timestamp(ColumnDef<DateTime<Utc>>),
    Json(ColumnDef<Value>),
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ColumnKind {
    Text,
    Number,
    Boolean,
    Timestamp,
    Json,
}

impl Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            Self::Text => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Timestamp => "date",
            Self::Json => "json",
        };
        write!(f, "{kind}")
    }
}

// Expands `$body` once per variant with `$def` bound to the inner `ColumnDef`.
macro_rules! on_def {
    ($column:expr, $def:ident => $body:expr) => {
        match $column {
            Column::Text($def) => $body,
            Column::Number($def) => $body,
            Column::Boolean($def) => $body,
            Column::Timestamp($def) => $body,
            Column::Json($def) => $body,
        }
    };
}

impl Column {
    #[must_use]
    pub fn name(&self) -> &str {
        on_def!(self, def => &def.name)
    }

    #[must_use]
    pub const fn is_required(&self) -> bool {
        on_def!(self, def => def.required)
    }

    #[must_use]
    pub const fn is_unique(&self) -> bool {
        on_def!(self, def => def.unique)
    }

    #[must_use]
    pub const fn kind(&self) -> ColumnKind {
        match self {
            Self::Text(_) => ColumnKind::Text,
            Self::Number(_) => ColumnKind::Number,
            Self::Boolean(_) => ColumnKind::Boolean,
            Self::Timestamp(_) => ColumnKind::Timestamp,
            Self::Json(_) => ColumnKind::Json,
        }
    }

    /// The column default as a cell value.
    #[must_use]
    pub fn default_value(&self) -> Option<Value> {
        match self {
            Self::Text(def) => def.default.clone().map(Value::Text),
            Self::Number(def) => def.default.map(Value::Number),
            Self::Boolean(def) => def.default.map(Value::Boolean),
            Self::Timestamp(def) => def.default.map(Value::Timestamp),
            Self::Json(def) => def.default.clone(),
        }
    }

    #[must_use]
    pub const fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::Text(_) => matches!(value, Value::Text(_)),
            Self::Number(_) => matches!(value, Value::Number(_)),
            Self::Boolean(_) => matches!(value, Value::Boolean(_)),
            Self::Timestamp(_) => matches!(value, Value::Timestamp(_)),
            Self::Json(_) => value.is_structured(),
        }
    }

    /// # Errors
    ///
    /// `TypeMismatch` when `value` is outside the domain of this column.
    pub fn check_type(&self, value: &Value) -> Result<(), NdbError> {
        if self.accepts(value) {
            Ok(())
        } else {
            Err(NdbError::TypeMismatch {
                column: self.name().to_string(),
                expected: self.kind(),
                actual: value.kind(),
            })
        }
    }
}

/// Ordered column list with unique names.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema(Vec<Column>);

impl Schema {
    /// # Errors
    ///
    /// `DuplicateColumn` on a repeated name, `TypeMismatch` on a default the
    /// column itself would reject.
    pub fn new(columns: Vec<Column>) -> Result<Self, NdbError> {
        let mut names = HashSet::new();

        for column in &columns {
            if !names.insert(column.name()) {
                return Err(NdbError::DuplicateColumn(column.name().to_string()));
            }

            if let Some(default) = column.default_value() {
                column.check_type(&default)?;
            }
        }

        Ok(Self(columns))
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Column> {
        self.0.iter().find(|column| column.name() == name)
    }

    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|column| column.name() == name)
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let schema: Vec<String> = self
            .0
            .iter()
            .map(|column| format!("{} ({})", column.name(), column.kind()))
            .collect();
        write!(f, "{}", schema.join(" | "))
    }
}

#[cfg(test)]
mod test {
    use indexmap::IndexMap;

    use super::*;
    use crate::value::ValueKind;

    #[test]
    fn test_column_builder() {
        let column = Column::Text(ColumnDef::new("email").required().unique());

        assert_eq!("email", column.name());
        assert!(column.is_required());
        assert!(column.is_unique());
        assert_eq!(ColumnKind::Text, column.kind());
        assert_eq!(None, column.default_value());
    }

    #[test]
    fn test_default_value_conversion() {
        let column = Column::Number(ColumnDef::new("age").with_default(18.0));
        assert_eq!(Some(Value::Number(18.0)), column.default_value());

        let column = Column::Boolean(ColumnDef::new("active").with_default(true));
        assert_eq!(Some(Value::Boolean(true)), column.default_value());
    }

    #[test]
    fn test_accepts_dispatch() {
        let json = Column::Json(ColumnDef::new("meta"));

        assert!(json.accepts(&Value::List(vec![])));
        assert!(json.accepts(&Value::Map(IndexMap::new())));
        assert!(!json.accepts(&Value::from("{}")));

        let timestamp = Column::Timestamp(ColumnDef::new("created_at"));
        assert!(timestamp.accepts(&Value::from(Utc::now())));
        assert!(!timestamp.accepts(&Value::from(1_700_000_000)));
    }

    #[test]
    fn test_check_type_reports_kinds() {
        let column = Column::Number(ColumnDef::new("age"));

        match column.check_type(&Value::from("abc")) {
            Err(NdbError::TypeMismatch {
                column,
                expected,
                actual,
            }) => {
                assert_eq!("age", column);
                assert_eq!(ColumnKind::Number, expected);
                assert_eq!(ValueKind::Text, actual);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_schema_rejects_duplicate_names() {
        let result = Schema::new(vec![
            Column::Text(ColumnDef::new("name")),
            Column::Number(ColumnDef::new("name")),
        ]);

        assert!(matches!(result, Err(NdbError::DuplicateColumn(name)) if name == "name"));
    }

    #[test]
    fn test_schema_rejects_scalar_json_default() {
        let result = Schema::new(vec![Column::Json(
            ColumnDef::new("meta").with_default(Value::from(1)),
        )]);

        assert!(matches!(result, Err(NdbError::TypeMismatch { .. })));
    }

    #[test]
    fn test_schema_lookup_keeps_order() {
        let schema = Schema::new(vec![
            Column::Text(ColumnDef::new("b")),
            Column::Text(ColumnDef::new("a")),
        ])
        .unwrap();

        let names: Vec<&str> = schema.columns().iter().map(Column::name).collect();
        assert_eq!(vec!["b", "a"], names);
        assert!(schema.get("a").is_some());
        assert!(schema.get("c").is_none());
        assert_eq!(Some(1), schema.position("a"));
        assert_eq!("b (string) | a (string)", schema.to_string());
    }
}
