use std::path::PathBuf;

use crate::{schema::ColumnKind, value::ValueKind};

pub type Error = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum NdbError {
    #[error("Column {0} does not exist")]
    UnknownColumn(String),

    #[error("Column {0} is required")]
    MissingRequiredValue(String),

    #[error("Column {0} must be unique")]
    UniqueConstraintViolation(String),

    #[error("Column {column} must be of type {expected}. Got {actual}")]
    TypeMismatch {
        column: String,
        expected: ColumnKind,
        actual: ValueKind,
    },

    #[error("Row {0} does not exist")]
    RowNotFound(String),

    #[error("Column {0} is defined more than once")]
    DuplicateColumn(String),

    #[error("Table {0} is not part of this database")]
    UnknownTable(String),

    #[error("File operation failed on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Encoding failed: {0}")]
    Encode(String),

    #[error("Decoding failed: {0}")]
    Decode(String),
}

/// Removes every file matching `pattern`. Unreadable entries and failed
/// removals are skipped.
pub fn delete_all_files_by_glob(pattern: &str) {
    let Ok(paths) = glob::glob(pattern) else {
        return;
    };

    for path in paths.flatten() {
        if path.is_file() {
            let _ = std::fs::remove_file(path);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_delete_all_files_by_glob() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("users.ndb"), b"x").unwrap();
        std::fs::write(dir.path().join("posts.ndb"), b"x").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();

        let pattern = format!("{}/*.ndb", dir.path().display());
        delete_all_files_by_glob(&pattern);

        assert!(!dir.path().join("users.ndb").exists());
        assert!(!dir.path().join("posts.ndb").exists());
        assert!(dir.path().join("notes.txt").exists());
    }

    #[test]
    fn test_type_mismatch_message() {
        let err = NdbError::TypeMismatch {
            column: "age".into(),
            expected: ColumnKind::Number,
            actual: ValueKind::Text,
        };

        assert_eq!("Column age must be of type number. Got text", err.to_string());
    }
}
