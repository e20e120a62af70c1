use std::collections::HashMap;
use std::fmt;
use std::io::Error;
use std::path::PathBuf;

use derive_setters::Setters;
use polars::error::PolarsError;

#[derive(Debug)]
pub enum TVError {
    IoError(Error),
    PolarsError(PolarsError),
    LoadingFailed(String),
    FileNotFound(PathBuf),
    PermissionDenied(PathBuf),
    UnknownFileType(PathBuf),
    // Unterminated brace group in a dropped path list
    MalformedInput(String),
    SchemaMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },
    UnknownColumn(String),
    UnknownFile(String),
    InvalidQuery(String),
}

impl fmt::Display for TVError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TVError::IoError(e) => write!(f, "I/O error: {e}"),
            TVError::PolarsError(e) => write!(f, "Failed to read data: {e}"),
            TVError::LoadingFailed(msg) => write!(f, "Loading failed: {msg}"),
            TVError::FileNotFound(path) => write!(f, "File not found: {}", path.display()),
            TVError::PermissionDenied(path) => {
                write!(f, "Permission denied: {}", path.display())
            }
            TVError::UnknownFileType(path) => {
                write!(f, "Unknown file type: {}", path.display())
            }
            TVError::MalformedInput(msg) => write!(f, "Malformed path list: {msg}"),
            TVError::SchemaMismatch {
                row,
                expected,
                found,
            } => write!(
                f,
                "Row {row} has {found} values but the table has {expected} columns"
            ),
            TVError::UnknownColumn(name) => write!(f, "Unknown column \"{name}\""),
            TVError::UnknownFile(name) => write!(f, "No file named \"{name}\" in the file list"),
            TVError::InvalidQuery(msg) => write!(f, "Invalid filter: {msg}"),
        }
    }
}

impl std::error::Error for TVError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TVError::IoError(e) => Some(e),
            TVError::PolarsError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<Error> for TVError {
    fn from(err: Error) -> Self {
        TVError::IoError(err)
    }
}

impl From<PolarsError> for TVError {
    fn from(err: PolarsError) -> Self {
        TVError::PolarsError(err)
    }
}

/// Actions the orchestration layer feeds into `Model::update`.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Raw payload of a drop event, possibly holding several brace wrapped paths.
    DropFiles(String),
    /// An already resolved path.
    AddFile(PathBuf),
    /// Display the listed file with this name.
    Open(String),
    /// Free text search entry. Empty input clears the filter.
    Search(String),
    FilterColumns(HashMap<String, String>),
    Reset,
}

#[derive(Debug, Clone, Setters)]
pub struct TVConfig {
    /// File extensions accepted from drop events, without the leading dot.
    pub extensions: Vec<String>,
    /// Cell width after which the text renderer truncates.
    pub max_column_width: usize,
}

impl Default for TVConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["csv".to_string()],
            max_column_width: 40,
        }
    }
}
