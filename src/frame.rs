//! Polars export of a parsed matrix.
//!
//! Produces a data frame with the same orientation as the source sheet: one
//! string column of row labels followed by one `Float64` column per column
//! label.

use crate::constants::ROW_LABEL_COLUMN;
use crate::error::Result;
use crate::models::Matrix;
use polars::prelude::*;
use std::collections::HashSet;

/// Make column names unique by appending `_2`, `_3`, ... to repeats
pub fn unique_column_names<'a>(labels: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::from([ROW_LABEL_COLUMN.to_string()]);
    labels
        .into_iter()
        .map(|label| {
            let mut candidate = label.to_string();
            let mut suffix = 2;
            while used.contains(&candidate) {
                candidate = format!("{}_{}", label, suffix);
                suffix += 1;
            }
            used.insert(candidate.clone());
            candidate
        })
        .collect()
}

impl Matrix {
    /// Convert to a polars `DataFrame`
    pub fn to_data_frame(&self) -> Result<DataFrame> {
        let names = unique_column_names(self.column_labels().iter().map(String::as_str));

        let mut columns: Vec<Column> = Vec::with_capacity(names.len() + 1);
        columns.push(Column::new(ROW_LABEL_COLUMN.into(), self.row_labels()));
        for (index, name) in names.iter().enumerate() {
            let values = self.column(index).unwrap_or_default();
            columns.push(Column::new(name.as_str().into(), values));
        }

        Ok(DataFrame::new(columns)?)
    }
}
