//! Core data structures produced by the sheet parser.
//!
//! A [`Matrix`] is the only thing handed to downstream stages. Cell position is
//! carried purely by array index: value `(i, j)` belongs to row label `i` and
//! column label `j`.

use serde::{Deserialize, Serialize};

/// Row and column labels in source order. Labels need not be unique.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AxisLabels {
    pub rows: Vec<String>,
    pub columns: Vec<String>,
}

impl AxisLabels {
    pub fn new(rows: Vec<String>, columns: Vec<String>) -> Self {
        Self { rows, columns }
    }
}

/// A single value together with its matrix position
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatrixCell {
    pub row: usize,
    pub column: usize,
    pub value: f64,
}

/// Labelled N×M numeric matrix assembled from a sheet.
///
/// Values are stored row-major. The matrix is immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Matrix {
    labels: AxisLabels,
    values: Vec<f64>,
}

impl Matrix {
    /// Build a matrix from labels and row-major values.
    ///
    /// Returns `None` when the value count does not match the label lengths.
    pub fn new(labels: AxisLabels, values: Vec<f64>) -> Option<Self> {
        if labels.rows.len() * labels.columns.len() != values.len() {
            return None;
        }
        Some(Self { labels, values })
    }

    pub fn labels(&self) -> &AxisLabels {
        &self.labels
    }

    pub fn row_labels(&self) -> &[String] {
        &self.labels.rows
    }

    pub fn column_labels(&self) -> &[String] {
        &self.labels.columns
    }

    pub fn rows(&self) -> usize {
        self.labels.rows.len()
    }

    pub fn columns(&self) -> usize {
        self.labels.columns.len()
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows(), self.columns())
    }

    /// Number of numeric cells
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, row: usize, column: usize) -> Option<f64> {
        if row >= self.rows() || column >= self.columns() {
            return None;
        }
        self.values.get(row * self.columns() + column).copied()
    }

    pub fn row(&self, row: usize) -> Option<&[f64]> {
        if row >= self.rows() {
            return None;
        }
        let start = row * self.columns();
        self.values.get(start..start + self.columns())
    }

    /// Values of one column, top to bottom
    pub fn column(&self, column: usize) -> Option<Vec<f64>> {
        if column >= self.columns() {
            return None;
        }
        Some(
            self.values
                .iter()
                .skip(column)
                .step_by(self.columns())
                .copied()
                .collect(),
        )
    }

    /// Raw row-major values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Iterate cells in (row, column) order
    pub fn cells(&self) -> impl Iterator<Item = MatrixCell> + '_ {
        let columns = self.columns();
        self.values
            .iter()
            .enumerate()
            .map(move |(index, &value)| MatrixCell {
                row: index / columns,
                column: index % columns,
                value,
            })
    }

    /// Smallest and largest value, `None` for an empty matrix
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.values.iter().fold(None, |range, &value| match range {
            None => Some((value, value)),
            Some((min, max)) => Some((min.min(value), max.max(value))),
        })
    }

    /// Copy into nested rows
    pub fn to_nested(&self) -> Vec<Vec<f64>> {
        self.values
            .chunks(self.columns().max(1))
            .map(<[f64]>::to_vec)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Matrix {
        Matrix::new(
            AxisLabels::new(
                vec!["X".to_string(), "Y".to_string()],
                vec!["A".to_string(), "B".to_string(), "C".to_string()],
            ),
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
        )
        .unwrap()
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let labels = AxisLabels::new(vec!["X".to_string()], vec!["A".to_string()]);
        assert!(Matrix::new(labels, vec![1.0, 2.0]).is_none());
    }

    #[test]
    fn test_indexed_access() {
        let matrix = sample();
        assert_eq!(matrix.shape(), (2, 3));
        assert_eq!(matrix.get(1, 2), Some(6.0));
        assert_eq!(matrix.get(2, 0), None);
        assert_eq!(matrix.get(0, 3), None);
        assert_eq!(matrix.row(1), Some(&[4.0, 5.0, 6.0][..]));
        assert_eq!(matrix.column(1), Some(vec![2.0, 5.0]));
        assert_eq!(matrix.column(3), None);
    }

    #[test]
    fn test_cells_follow_row_major_order() {
        let positions: Vec<(usize, usize)> =
            sample().cells().map(|cell| (cell.row, cell.column)).collect();
        assert_eq!(
            positions,
            vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]
        );
    }

    #[test]
    fn test_value_range_and_nesting() {
        let matrix = sample();
        assert_eq!(matrix.value_range(), Some((1.0, 6.0)));
        assert_eq!(
            matrix.to_nested(),
            vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]
        );
    }
}
