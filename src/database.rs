use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::{debug, info};

use crate::{common::NdbError, table::Table, table_files::TableFiles};

/// Where a database lives on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub name: String,
    pub dir: PathBuf,
}

impl DatabaseConfig {
    #[must_use]
    pub fn new(name: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            dir: dir.into(),
        }
    }

    /// Stores the database in `<base>/<name>`.
    #[must_use]
    pub fn under(base: impl AsRef<Path>, name: impl Into<String>) -> Self {
        let name = name.into();
        let dir = base.as_ref().join(&name);
        Self { name, dir }
    }
}

/// A fixed set of named tables plus the directory they are checkpointed to.
///
/// The table names are closed at construction. Mutation happens through the
/// tables themselves; `save` and `load` are explicit checkpoints and never run
/// on their own.
#[derive(Debug)]
pub struct Database {
    name: String,
    files: TableFiles,
    tables: IndexMap<String, Table>,
}

impl Database {
    /// Binds `tables` and creates the storage directory if it is missing.
    ///
    /// # Errors
    ///
    /// When the storage directory cannot be created.
    pub fn new(config: DatabaseConfig, tables: IndexMap<String, Table>) -> Result<Self, NdbError> {
        let files = TableFiles::new(config.dir);
        files.ensure_dir()?;
        debug!(
            "Opened database {} at {} with {} table(s)",
            config.name,
            files.dir.display(),
            tables.len()
        );

        Ok(Self {
            name: config.name,
            files,
            tables,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.files.dir
    }

    /// # Errors
    ///
    /// `UnknownTable` when `name` was not bound at construction.
    pub fn table(&self, name: &str) -> Result<&Table, NdbError> {
        self.tables
            .get(name)
            .ok_or_else(|| NdbError::UnknownTable(name.to_string()))
    }

    /// # Errors
    ///
    /// `UnknownTable` when `name` was not bound at construction.
    pub fn table_mut(&mut self, name: &str) -> Result<&mut Table, NdbError> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| NdbError::UnknownTable(name.to_string()))
    }

    #[must_use]
    pub const fn tables(&self) -> &IndexMap<String, Table> {
        &self.tables
    }

    #[must_use]
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.keys().map(String::as_str).collect()
    }

    /// Writes every table to `<dir>/<table>.ndb`, replacing existing files.
    ///
    /// Tables are written one after another; a failure leaves the earlier
    /// files written and the later ones untouched.
    ///
    /// # Errors
    ///
    /// On encoding or file operations.
    pub fn save(&self) -> Result<(), NdbError> {
        for (table_name, table) in &self.tables {
            let bytes = table.export_as_binary()?;
            self.files.write_table(table_name, &bytes)?;
            info!(
                "Saved table {}.{} ({} row(s), {} bytes)",
                self.name,
                table_name,
                table.len(),
                bytes.len()
            );
        }

        Ok(())
    }

    /// Replaces each table with the contents of its file. Tables without a
    /// file keep their in-memory state.
    ///
    /// # Errors
    ///
    /// On file operations or a corrupt file. Tables loaded before the failing
    /// one stay loaded.
    pub fn load(&mut self) -> Result<(), NdbError> {
        for (table_name, table) in &mut self.tables {
            if !self.files.exists(table_name) {
                debug!("No file for table {}.{}, skipped", self.name, table_name);
                continue;
            }

            let bytes = self.files.read_table(table_name)?;
            table.import_from_binary(&bytes)?;
            info!(
                "Loaded table {}.{} ({} row(s))",
                self.name,
                table_name,
                table.len()
            );
        }

        Ok(())
    }
}
