//! Input-shape error types.
//!
//! These represent spreadsheets that cannot be turned into statistics at all.
//! They are fatal for the current pass and surfaced to the caller as-is.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while discovering, loading, or analysing a response table.
#[derive(Debug, Error)]
pub enum StatsError {
    /// A column required for a question (or for filtering) is absent.
    #[error("missing column '{column}'{}", question_suffix(.question))]
    MissingColumn {
        column: String,
        question: Option<usize>,
    },

    /// No spreadsheet files were found in the working directory.
    #[error("no spreadsheet files found in {}", .0.display())]
    NoSpreadsheets(PathBuf),

    /// The file extension is not a supported spreadsheet format.
    #[error("unsupported spreadsheet format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// The spreadsheet has no header row.
    #[error("spreadsheet has no header row: {}", .0.display())]
    EmptySheet(PathBuf),
}

fn question_suffix(question: &Option<usize>) -> String {
    match question {
        Some(i) => format!(" for question {i}"),
        None => String::new(),
    }
}

impl StatsError {
    /// Shorthand for a missing per-question column.
    pub fn missing_question_column(column: impl Into<String>, question: usize) -> Self {
        StatsError::MissingColumn {
            column: column.into(),
            question: Some(question),
        }
    }

    /// Shorthand for a missing metadata column (teacher, class, ...).
    pub fn missing_column(column: impl Into<String>) -> Self {
        StatsError::MissingColumn {
            column: column.into(),
            question: None,
        }
    }
}
