use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::common::NdbError;

pub const TABLE_FILE_EXTENSION: &str = "ndb";

/// Storage directory of one database: one `<table>.ndb` file per table.
#[derive(Debug)]
pub struct TableFiles {
    pub dir: PathBuf,
}

impl TableFiles {
    #[must_use]
    pub const fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    #[must_use]
    pub fn table_data_file_name(&self, table_name: &str) -> PathBuf {
        let mut out = self.dir.clone();
        out.push(format!("{table_name}.{TABLE_FILE_EXTENSION}"));
        out
    }

    #[must_use]
    pub fn exists(&self, table_name: &str) -> bool {
        self.table_data_file_name(table_name).is_file()
    }

    /// Creates the directory and its parents. No-op when it already exists.
    ///
    /// # Errors
    ///
    /// On file operations.
    pub fn ensure_dir(&self) -> Result<(), NdbError> {
        if self.dir.is_dir() {
            return Ok(());
        }
        fs::create_dir_all(&self.dir).map_err(|source| io_error(&self.dir, source))
    }

    /// # Errors
    ///
    /// On file operations.
    pub fn read_table(&self, table_name: &str) -> Result<Vec<u8>, NdbError> {
        let path = self.table_data_file_name(table_name);
        fs::read(&path).map_err(|source| io_error(&path, source))
    }

    /// Overwrites the whole table file.
    ///
    /// # Errors
    ///
    /// On file operations.
    pub fn write_table(&self, table_name: &str, bytes: &[u8]) -> Result<(), NdbError> {
        let path = self.table_data_file_name(table_name);
        fs::write(&path, bytes).map_err(|source| io_error(&path, source))
    }
}

fn io_error(path: &Path, source: std::io::Error) -> NdbError {
    NdbError::Io {
        path: path.to_path_buf(),
        source,
    }
}
