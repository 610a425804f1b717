//! Error types for loading and configuration.
//!
//! A load either fully succeeds or fails with a `LoadError`; there is no
//! partial result. Empty entity classes are not errors, they are reported as
//! `EmptyClassWarning`s alongside a successful build.

use crate::node::EntityKind;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for table loading.
pub type Result<T> = std::result::Result<T, LoadError>;

/// A source table could not be read or is malformed. Always fatal.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path}: missing required column '{column}'")]
    MissingColumn { path: PathBuf, column: String },

    #[error("{path}: row {row}: {message}")]
    Malformed {
        path: PathBuf,
        row: usize,
        message: String,
    },

    #[error("{path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl LoadError {
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn missing_column(path: impl AsRef<Path>, column: &str) -> Self {
        Self::MissingColumn {
            path: path.as_ref().to_path_buf(),
            column: column.to_string(),
        }
    }

    pub fn malformed(path: impl AsRef<Path>, row: usize, message: impl Into<String>) -> Self {
        Self::Malformed {
            path: path.as_ref().to_path_buf(),
            row,
            message: message.into(),
        }
    }

    /// Wraps a csv error, unwrapping IO failures so a missing file reads as one.
    pub fn csv(path: impl AsRef<Path>, source: csv::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        if let csv::ErrorKind::Io(err) = source.kind() {
            return Self::Io {
                path,
                source: io::Error::new(err.kind(), err.to_string()),
            };
        }
        Self::Csv { path, source }
    }
}

/// The configuration file could not be used.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid edge limit '{0}': expected a non-negative integer or 'unlimited'")]
    EdgeLimit(String),

    #[error("invalid config value for {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

/// An entity class ended up with zero members.
///
/// Non-fatal: downstream stages place no nodes for the class and mark its
/// degree statistics as undefined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyClassWarning {
    pub kind: EntityKind,
}

impl fmt::Display for EmptyClassWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no {} entities after filtering", self.kind.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_maps_to_io() {
        let err = csv::Reader::from_path("/definitely/not/here.tsv").unwrap_err();
        let err = LoadError::csv("/definitely/not/here.tsv", err);
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.tsv"));
    }

    #[test]
    fn test_warning_display() {
        let warning = EmptyClassWarning {
            kind: EntityKind::Gene,
        };
        assert_eq!(warning.to_string(), "no gene entities after filtering");
    }
}
