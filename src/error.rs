//! Error handling for sheet parsing and heatmap preparation.
//!
//! Structural failures (undecodable text, broken grid shape) abort a parse
//! immediately. Cell-level failures are collected into [`Diagnostics`] and only
//! surface as a single [`HeatmapError::IncompleteMatrix`] once every cell has
//! been examined.

use crate::diagnostics::Diagnostics;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HeatmapError {
    #[error("Malformed input: {reason} (valid up to byte {valid_up_to})")]
    MalformedInput { reason: String, valid_up_to: usize },

    #[error("Shape error: {0}")]
    Shape(#[from] ShapeError),

    #[error("Incomplete matrix: {} cell(s) could not be parsed", .diagnostics.cell_error_count())]
    IncompleteMatrix { diagnostics: Diagnostics },

    #[error("Matrix of {rows}×{columns} labels cannot hold {values} values")]
    DimensionMismatch {
        rows: usize,
        columns: usize,
        values: usize,
    },

    #[error("IO error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Parse task for {path} failed: {message}")]
    ParseTask { path: PathBuf, message: String },

    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}

impl HeatmapError {
    /// Create an I/O error tied to the file being read
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Diagnostics carried by an incomplete-matrix failure
    pub fn diagnostics(&self) -> Option<&Diagnostics> {
        match self {
            Self::IncompleteMatrix { diagnostics } => Some(diagnostics),
            _ => None,
        }
    }
}

/// Violations of the rectangular grid shape. Unrecoverable for the parse.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeError {
    #[error("row {row} has {found} fields, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("grid has {found} row(s), at least {required} required")]
    TooFewRows { found: usize, required: usize },

    #[error("grid has {found} column(s), at least {required} required")]
    TooFewColumns { found: usize, required: usize },
}

impl ShapeError {
    /// Source row the violation refers to, if any
    pub fn row(&self) -> Option<usize> {
        match self {
            Self::RaggedRow { row, .. } => Some(*row),
            Self::TooFewColumns { .. } => Some(0),
            Self::TooFewRows { .. } => None,
        }
    }
}

/// Why an interior cell was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellErrorReason {
    Empty,
    NotANumber,
    NonFinite,
}

impl fmt::Display for CellErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Empty => "empty cell",
            Self::NotANumber => "not a number",
            Self::NonFinite => "value out of range",
        };
        f.write_str(text)
    }
}

/// A single interior cell that failed numeric parsing.
///
/// `row` and `column` are source-grid coordinates, so the first data cell is
/// at (1, 1).
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("cell (row {row}, column {column}) {reason}: {raw_value:?}")]
pub struct CellParseError {
    pub row: usize,
    pub column: usize,
    pub raw_value: String,
    pub reason: CellErrorReason,
}

impl CellParseError {
    /// Zero-based position of the cell inside the assembled matrix.
    ///
    /// Row and column 0 hold labels, so a cell built by hand with either
    /// coordinate at 0 maps onto the first matrix row or column.
    pub fn matrix_position(&self) -> (usize, usize) {
        (self.row.saturating_sub(1), self.column.saturating_sub(1))
    }
}

pub type Result<T> = std::result::Result<T, HeatmapError>;
