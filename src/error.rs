//! Error types.
//!
//! File-level failures (`SheetError`) abort a load. Row-level failures
//! (`PointError`) are carried as data inside `ParsedPoint::Invalid` and never
//! escalate.

use std::path::PathBuf;
use thiserror::Error;

/// Why a coordinate cell could not be read as three numbers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PointError {
    #[error("empty cell")]
    Empty,

    #[error("malformed coordinates: {0}")]
    Malformed(String),

    #[error("expected 3 values, found {found}")]
    WrongCount { found: usize },

    #[error("not a number: '{token}'")]
    NotANumber { token: String },
}

/// Errors that stop a whole file from being processed.
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "unsupported file type '{}' (expected .xlsx, .xlsm, .xlsb, .xls, .ods or .csv)",
        .extension.as_deref().unwrap_or("")
    )]
    UnsupportedFormat { extension: Option<String> },

    #[error("cannot read workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("cannot read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("workbook has no worksheets")]
    NoWorksheet,

    #[error("worksheet '{0}' not found")]
    WorksheetNotFound(String),

    #[error("the file has no header row")]
    NoHeader,

    #[error(
        "the uploaded file does not contain the required columns ({}); found: {}",
        quoted(.missing),
        quoted(.found)
    )]
    MissingColumns {
        missing: Vec<String>,
        found: Vec<String>,
    },
}

/// Errors writing a wireframe export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no zone has enough valid vertices to export")]
    NothingToExport,
}

fn quoted(names: &[String]) -> String {
    if names.is_empty() {
        return "none".to_string();
    }
    names
        .iter()
        .map(|n| format!("'{}'", n))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_columns_message_names_each_column() {
        let err = SheetError::MissingColumns {
            missing: vec!["Data points".to_string()],
            found: vec!["Zone name".to_string(), "Notes".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("'Data points'"));
        assert!(msg.contains("found: 'Zone name', 'Notes'"));
    }

    #[test]
    fn point_error_messages() {
        assert_eq!(PointError::WrongCount { found: 2 }.to_string(), "expected 3 values, found 2");
        assert_eq!(
            PointError::NotANumber { token: "x".into() }.to_string(),
            "not a number: 'x'"
        );
    }
}
