use std::fmt::Display;

use indexmap::IndexMap;
use log::debug;

use crate::{
    codec::{self, TableSnapshot},
    common::NdbError,
    row::{generate_row_id, Row},
    schema::{Column, Schema},
    value::Value,
};

/// Column name to value, as supplied to `insert` and `update`. Validation
/// walks the pairs in the order given.
pub type Values = IndexMap<String, Value>;

/// Column name to expected value. Rows match when every pair is equal.
pub type Predicate = IndexMap<String, Value>;

/// An in-memory table: a fixed schema plus rows in insertion order.
///
/// All reads are full scans. Every mutation validates its whole input before
/// touching the row collection, so a failed call leaves the table unchanged.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    schema: Schema,
    rows: Vec<Row>,
}

impl Table {
    /// # Errors
    ///
    /// When `columns` repeat a name or carry a default of the wrong type.
    pub fn new(columns: Vec<Column>) -> Result<Self, NdbError> {
        Ok(Self {
            schema: Schema::new(columns)?,
            rows: vec![],
        })
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        self.schema.columns()
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.schema.get(name)
    }

    #[must_use]
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Validates `values` against the schema and appends a new row.
    ///
    /// Every schema column is resolved: a column that is omitted or `Null`
    /// takes its default. Resolved values go through the required, unique and
    /// type checks; columns left without a value are absent from the row.
    ///
    /// Returns a copy of the stored row.
    ///
    /// # Errors
    ///
    /// `UnknownColumn`, `MissingRequiredValue`, `UniqueConstraintViolation` or
    /// `TypeMismatch`.
    pub fn insert(&mut self, mut values: Values) -> Result<Row, NdbError> {
        if let Some(unknown) = values.keys().find(|name| self.schema.get(name).is_none()) {
            return Err(NdbError::UnknownColumn(unknown.clone()));
        }

        let mut data = IndexMap::new();
        for column in self.schema.columns() {
            let supplied = values.shift_remove(column.name()).unwrap_or(Value::Null);
            if let Some(value) = self.resolve(column, supplied, None)? {
                data.insert(column.name().to_string(), value);
            }
        }

        let row = Row {
            id: self.fresh_row_id(),
            data,
        };
        debug!("Inserted row {}", row.id);

        self.rows.push(row.clone());
        Ok(row)
    }

    /// All rows, in insertion order.
    #[must_use]
    pub fn select(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn select_one(&self, id: &str) -> Option<&Row> {
        self.rows.iter().find(|row| row.id == id)
    }

    /// Rows where every predicate column equals its expected value. An empty
    /// predicate selects everything.
    #[must_use]
    pub fn select_where(&self, predicate: &Predicate) -> Vec<&Row> {
        self.rows.iter().filter(|row| row.matches(predicate)).collect()
    }

    /// Replaces the supplied columns of row `id`. Columns not in `values` keep
    /// their current value; a `Null` falls back to the default, and an
    /// optional column left without a value is removed from the row.
    ///
    /// The uniqueness scan skips the row being updated, so writing a row's
    /// own value back is allowed.
    ///
    /// # Errors
    ///
    /// `RowNotFound`, then the same validation errors as [`Table::insert`].
    pub fn update(&mut self, id: &str, values: Values) -> Result<Row, NdbError> {
        let Some(position) = self.rows.iter().position(|row| row.id == id) else {
            return Err(NdbError::RowNotFound(id.to_string()));
        };

        let mut changes = Vec::with_capacity(values.len());
        for (name, supplied) in values {
            let column = self
                .schema
                .get(&name)
                .ok_or_else(|| NdbError::UnknownColumn(name.clone()))?;
            let resolved = self.resolve(column, supplied, Some(id))?;
            changes.push((name, resolved));
        }

        let row = &mut self.rows[position];
        for (name, resolved) in changes {
            match resolved {
                Some(value) => {
                    row.data.insert(name, value);
                }
                None => {
                    row.data.shift_remove(&name);
                }
            }
        }
        let schema = &self.schema;
        row.data
            .sort_by(|lhs, _, rhs, _| schema.position(lhs).cmp(&schema.position(rhs)));
        debug!("Updated row {id}");

        Ok(row.clone())
    }

    /// # Errors
    ///
    /// `RowNotFound` when no row has this id.
    pub fn delete(&mut self, id: &str) -> Result<Row, NdbError> {
        let Some(position) = self.rows.iter().position(|row| row.id == id) else {
            return Err(NdbError::RowNotFound(id.to_string()));
        };

        debug!("Deleted row {id}");
        Ok(self.rows.remove(position))
    }

    /// Removes and returns every row matching `predicate`. Matching nothing is
    /// not an error.
    pub fn delete_where(&mut self, predicate: &Predicate) -> Vec<Row> {
        let (deleted, kept): (Vec<Row>, Vec<Row>) = std::mem::take(&mut self.rows)
            .into_iter()
            .partition(|row| row.matches(predicate));
        self.rows = kept;

        debug!("Deleted {} row(s) by predicate", deleted.len());
        deleted
    }

    pub fn delete_all(&mut self) -> Vec<Row> {
        debug!("Deleted all {} row(s)", self.rows.len());
        std::mem::take(&mut self.rows)
    }

    #[must_use]
    pub fn snapshot(&self) -> TableSnapshot {
        TableSnapshot {
            columns: self.schema.clone(),
            rows: self.rows.clone(),
        }
    }

    /// Replaces schema and rows wholesale. Imported rows are trusted and not
    /// checked against the imported schema.
    pub fn restore(&mut self, snapshot: TableSnapshot) {
        self.schema = snapshot.columns;
        self.rows = snapshot.rows;
    }

    /// # Errors
    ///
    /// `Encode` when a number is NaN or infinite, since JSON has no form for it.
    pub fn export_as_json(&self) -> Result<serde_json::Value, NdbError> {
        codec::to_json(&self.snapshot())
    }

    /// # Errors
    ///
    /// `Decode` when `json` is not a table snapshot. The table is unchanged
    /// on error.
    pub fn import_from_json(&mut self, json: serde_json::Value) -> Result<(), NdbError> {
        self.restore(codec::from_json(json)?);
        Ok(())
    }

    /// # Errors
    ///
    /// `Encode` when the binary writer fails.
    pub fn export_as_binary(&self) -> Result<Vec<u8>, NdbError> {
        codec::to_binary(&self.snapshot())
    }

    /// # Errors
    ///
    /// `Decode` on corrupt input or bytes after the encoded table. The table is
    /// unchanged on error.
    pub fn import_from_binary(&mut self, bytes: &[u8]) -> Result<(), NdbError> {
        self.restore(codec::from_binary(bytes)?);
        Ok(())
    }

    // Default, required, unique then type, for one column. `skip_id` names the
    // row excluded from the uniqueness scan.
    fn resolve(
        &self,
        column: &Column,
        supplied: Value,
        skip_id: Option<&str>,
    ) -> Result<Option<Value>, NdbError> {
        let value = match supplied {
            Value::Null => column.default_value(),
            value => Some(value),
        };

        let Some(value) = value else {
            if column.is_required() {
                return Err(NdbError::MissingRequiredValue(column.name().to_string()));
            }
            return Ok(None);
        };

        if column.is_unique() && self.is_taken(column.name(), &value, skip_id) {
            return Err(NdbError::UniqueConstraintViolation(
                column.name().to_string(),
            ));
        }

        column.check_type(&value)?;

        Ok(Some(value))
    }

    fn is_taken(&self, column: &str, value: &Value, skip_id: Option<&str>) -> bool {
        self.rows
            .iter()
            .filter(|row| Some(row.id.as_str()) != skip_id)
            .any(|row| row.get(column) == Some(value))
    }

    fn fresh_row_id(&self) -> String {
        loop {
            let id = generate_row_id();
            if self.select_one(&id).is_none() {
                return id;
            }
        }
    }
}

impl Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.schema)?;
        for row in &self.rows {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}
