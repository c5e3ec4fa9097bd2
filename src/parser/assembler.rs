//! Final matrix assembly.

use super::classifier::ClassifiedGrid;
use crate::diagnostics::Diagnostics;
use crate::error::{HeatmapError, Result};
use crate::models::Matrix;

/// Build the matrix, or fail with the full report if any cell was rejected
pub fn assemble(classified: ClassifiedGrid, diagnostics: &Diagnostics) -> Result<Matrix> {
    if diagnostics.has_cell_errors() {
        return Err(HeatmapError::IncompleteMatrix {
            diagnostics: diagnostics.clone(),
        });
    }

    let rows = classified.labels.rows.len();
    let columns = classified.labels.columns.len();
    let values = classified.values.len();
    Matrix::new(classified.labels, classified.values).ok_or(HeatmapError::DimensionMismatch {
        rows,
        columns,
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::ParseStage;
    use crate::error::{CellErrorReason, CellParseError};
    use crate::models::AxisLabels;

    fn classified() -> ClassifiedGrid {
        ClassifiedGrid {
            labels: AxisLabels::new(
                vec!["X".to_string(), "Y".to_string()],
                vec!["A".to_string(), "B".to_string()],
            ),
            values: vec![1.0, 2.0, 3.0, 4.0],
        }
    }

    #[test]
    fn test_assemble_clean_grid() {
        let matrix = assemble(classified(), &Diagnostics::new()).unwrap();
        assert_eq!(matrix.to_nested(), vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        assert_eq!(matrix.row_labels(), &["X", "Y"]);
        assert_eq!(matrix.column_labels(), &["A", "B"]);
    }

    #[test]
    fn test_assemble_refuses_partial_matrix() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.record_cell(
            ParseStage::Classifying,
            CellParseError {
                row: 1,
                column: 2,
                raw_value: "q".to_string(),
                reason: CellErrorReason::NotANumber,
            },
        );

        match assemble(classified(), &diagnostics) {
            Err(HeatmapError::IncompleteMatrix { diagnostics }) => {
                assert_eq!(diagnostics.cell_error_count(), 1);
            }
            other => panic!("Expected IncompleteMatrix, got {:?}", other),
        }
    }
}
