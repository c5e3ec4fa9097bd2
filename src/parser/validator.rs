//! Rectangularity checks and the validated raw grid.

use super::tokenizer::TokenizedRow;
use crate::constants::{MIN_COLUMNS, MIN_ROWS};
use crate::error::ShapeError;
use tracing::debug;

/// Rectangular grid of raw fields, at least `MIN_ROWS` × `MIN_COLUMNS`.
///
/// Only [`GridValidator`] builds one, so every row has the same width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawGrid<'a> {
    rows: Vec<Vec<&'a str>>,
    width: usize,
}

impl<'a> RawGrid<'a> {
    /// Number of rows including the label row
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of fields per row including the label column
    pub fn width(&self) -> usize {
        self.width
    }

    /// Field at (row 0, column 0)
    pub fn corner(&self) -> &'a str {
        self.rows[0][0]
    }

    /// Fields of the label row after the corner
    pub fn header_fields(&self) -> &[&'a str] {
        &self.rows[0][1..]
    }

    /// Rows below the label row
    pub fn data_rows(&self) -> impl Iterator<Item = &[&'a str]> {
        self.rows[1..].iter().map(Vec::as_slice)
    }
}

/// Checks that a tokenized row sequence forms a usable rectangular grid
#[derive(Debug, Clone, Copy)]
pub struct GridValidator {
    min_rows: usize,
    min_columns: usize,
}

impl Default for GridValidator {
    fn default() -> Self {
        Self {
            min_rows: MIN_ROWS,
            min_columns: MIN_COLUMNS,
        }
    }
}

impl GridValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume rows and build the grid, stopping at the first shape violation.
    ///
    /// Blank rows at the end of the input are dropped. A blank row followed by
    /// more content is kept and checked like any other row.
    pub fn validate<'a, I>(&self, rows: I) -> Result<RawGrid<'a>, ShapeError>
    where
        I: IntoIterator<Item = TokenizedRow<'a>>,
    {
        let mut grid: Vec<Vec<&'a str>> = Vec::new();
        let mut pending_blank: Vec<TokenizedRow<'a>> = Vec::new();
        let mut width = 0;

        for row in rows {
            if row.is_blank() {
                pending_blank.push(row);
                continue;
            }

            for held in pending_blank.drain(..).chain(std::iter::once(row)) {
                if grid.is_empty() {
                    width = held.width();
                    if width < self.min_columns {
                        return Err(ShapeError::TooFewColumns {
                            found: width,
                            required: self.min_columns,
                        });
                    }
                } else if held.width() != width {
                    return Err(ShapeError::RaggedRow {
                        row: held.index,
                        expected: width,
                        found: held.width(),
                    });
                }
                grid.push(held.fields);
            }
        }

        if !pending_blank.is_empty() {
            debug!("Dropped {} trailing blank row(s)", pending_blank.len());
        }

        if grid.len() < self.min_rows {
            return Err(ShapeError::TooFewRows {
                found: grid.len(),
                required: self.min_rows,
            });
        }

        debug!("Validated grid of {} rows × {} fields", grid.len(), width);
        Ok(RawGrid { rows: grid, width })
    }
}
