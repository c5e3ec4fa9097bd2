//! Separates label cells from numeric cells and parses the numbers.
//!
//! Row 0 supplies the column labels and column 0 the row labels. The corner
//! field is read with the rest of row 0 and dropped without being inspected.
//! Every interior cell is parsed; failures are recorded and parsing carries on
//! so one pass reports every bad cell.

use super::validator::RawGrid;
use super::{DecimalMark, ParseOptions};
use crate::diagnostics::{Diagnostics, ParseStage};
use crate::error::{CellErrorReason, CellParseError};
use crate::models::AxisLabels;
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Plain decimal notation with optional exponent. No thousands separators,
/// no `inf`/`nan`, no hex.
static DECIMAL_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?$")
        .expect("decimal number pattern is valid")
});

/// Labels plus row-major values from a classified grid.
///
/// `values` holds `NaN` where a cell failed to parse; the matching finding is
/// in the diagnostics.
#[derive(Debug, Clone)]
pub struct ClassifiedGrid {
    pub labels: AxisLabels,
    pub values: Vec<f64>,
}

/// Parse one numeric field.
///
/// With [`DecimalMark::Comma`] a single comma is read as the decimal point.
pub fn parse_number(raw: &str, decimal_mark: DecimalMark) -> Result<f64, CellErrorReason> {
    if raw.is_empty() {
        return Err(CellErrorReason::Empty);
    }

    let normalized: Cow<'_, str> = match decimal_mark {
        DecimalMark::Point => Cow::Borrowed(raw),
        DecimalMark::Comma => {
            if raw.contains('.') {
                return Err(CellErrorReason::NotANumber);
            }
            Cow::Owned(raw.replacen(',', ".", 1))
        }
    };

    if !DECIMAL_NUMBER.is_match(&normalized) {
        return Err(CellErrorReason::NotANumber);
    }

    let value: f64 = normalized
        .parse()
        .map_err(|_| CellErrorReason::NotANumber)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CellErrorReason::NonFinite)
    }
}

#[derive(Debug, Clone)]
pub struct Classifier<'o> {
    options: &'o ParseOptions,
}

impl<'o> Classifier<'o> {
    pub fn new(options: &'o ParseOptions) -> Self {
        Self { options }
    }

    fn clean<'f>(&self, field: &'f str) -> &'f str {
        if self.options.trim_fields {
            field.trim()
        } else {
            field
        }
    }

    /// Split the grid into labels and values, recording every bad cell
    pub fn classify(&self, grid: &RawGrid<'_>, diagnostics: &mut Diagnostics) -> ClassifiedGrid {
        let _corner = grid.corner();

        let column_labels: Vec<String> = grid
            .header_fields()
            .iter()
            .map(|field| self.clean(field).to_string())
            .collect();

        let data_width = grid.width() - 1;
        let data_height = grid.height() - 1;
        let mut row_labels = Vec::with_capacity(data_height);
        let mut values = Vec::with_capacity(data_width * data_height);
        let mut failures = 0usize;

        for (offset, fields) in grid.data_rows().enumerate() {
            let row = offset + 1;
            row_labels.push(self.clean(fields[0]).to_string());

            for (column, raw) in fields.iter().enumerate().skip(1) {
                let field = self.clean(raw);
                match parse_number(field, self.options.decimal_mark) {
                    Ok(value) => values.push(value),
                    Err(reason) => {
                        failures += 1;
                        debug!(
                            "Cell ({}, {}) rejected ({}): {:?}",
                            row, column, reason, raw
                        );
                        diagnostics.record_cell(
                            ParseStage::Classifying,
                            CellParseError {
                                row,
                                column,
                                raw_value: (*raw).to_string(),
                                reason,
                            },
                        );
                        values.push(f64::NAN);
                    }
                }
            }
        }

        if failures > 0 {
            warn!(
                "{} of {} interior cells are not valid numbers",
                failures,
                values.len()
            );
        }

        ClassifiedGrid {
            labels: AxisLabels::new(row_labels, column_labels),
            values,
        }
    }
}
