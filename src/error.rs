//! Error and diagnostic types.
//!
//! [`Error`] covers collaborator failures (files, parsing), which abort the
//! command that hit them. [`SchemaIssue`] describes inconsistencies in a
//! hand-edited schema; those are logged and skipped, never fatal.

use crate::schema::ValueKind;
use crate::tree::Path;
use serde_json::Value;
use std::path::PathBuf;

/// Failure of a file-backed collaborator.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid YAML in {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{what} has an unexpected shape: {source}")]
    Shape {
        what: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for collaborator operations.
pub type Result<T> = std::result::Result<T, Error>;

/// A rejected entry found while compiling the schema.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaIssue {
    #[error("`{task}.{group}` is not related to any argument group")]
    MissingGroup { task: String, group: String },

    #[error("`{path}` is not an existing argument")]
    UnknownOverride { path: Path },

    #[error("`{value}` ({found}) and `{path}` ({expected}) are in different types")]
    OverrideTypeMismatch {
        path: Path,
        value: Value,
        found: ValueKind,
        expected: ValueKind,
    },

    #[error("`{value}` is not an option of argument `{path}`")]
    OverrideNotAnOption { path: Path, value: Value },
}

impl SchemaIssue {
    /// The schema location the issue refers to.
    pub fn path(&self) -> Path {
        match self {
            SchemaIssue::MissingGroup { task, group } => Path::from([task.as_str(), group.as_str()]),
            SchemaIssue::UnknownOverride { path }
            | SchemaIssue::OverrideTypeMismatch { path, .. }
            | SchemaIssue::OverrideNotAnOption { path, .. } => path.clone(),
        }
    }
}
