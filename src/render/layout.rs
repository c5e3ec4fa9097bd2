//! Grid layout for drawing a matrix as a heatmap.
//!
//! The layout is a renderer-agnostic draw list. Cell `(i, j)` is placed from
//! its array index alone: row `i` counts down from the top of the grid and
//! column `j` counts right from the label gutter.

use super::colormap::{ColorScale, Rgb};
use crate::constants::{
    COLUMN_LABEL_ROTATION_DEGREES, DEFAULT_ANNOTATION_PRECISION, DEFAULT_CELL_GAP,
    DEFAULT_CELL_HEIGHT, DEFAULT_CELL_WIDTH, DEFAULT_COLORBAR_LABEL,
};
use crate::error::{HeatmapError, Result};
use crate::models::Matrix;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Layout settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub cell_width: f64,
    pub cell_height: f64,
    /// Blank margin between neighbouring cells
    pub cell_gap: f64,
    /// Force cells to be square, using `cell_width` for both sides
    pub square_cells: bool,
    /// Print the value inside each cell
    pub annotate: bool,
    /// Decimal places used for annotations
    pub annotation_precision: usize,
    pub title: Option<String>,
    pub colorbar_label: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            cell_width: DEFAULT_CELL_WIDTH,
            cell_height: DEFAULT_CELL_HEIGHT,
            cell_gap: DEFAULT_CELL_GAP,
            square_cells: true,
            annotate: true,
            annotation_precision: DEFAULT_ANNOTATION_PRECISION,
            title: None,
            colorbar_label: DEFAULT_COLORBAR_LABEL.to_string(),
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.cell_width.is_finite() && self.cell_width > 0.0) {
            return Err(HeatmapError::configuration("cell width must be positive"));
        }
        if !self.square_cells && !(self.cell_height.is_finite() && self.cell_height > 0.0) {
            return Err(HeatmapError::configuration("cell height must be positive"));
        }
        if !(self.cell_gap.is_finite() && self.cell_gap >= 0.0) {
            return Err(HeatmapError::configuration("cell gap cannot be negative"));
        }
        Ok(())
    }

    /// Effective (width, height) of one cell
    pub fn cell_size(&self) -> (f64, f64) {
        if self.square_cells {
            (self.cell_width, self.cell_width)
        } else {
            (self.cell_width, self.cell_height)
        }
    }
}

/// One coloured rectangle in the grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutCell {
    pub row: usize,
    pub column: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub value: f64,
    pub color: Rgb,
    /// Formatted value, present when annotation is enabled
    pub annotation: Option<String>,
    /// Text colour readable on top of `color`
    pub text_color: Rgb,
}

/// A label anchored next to the grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisLabel {
    pub index: usize,
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub rotation_degrees: f64,
}

/// Colour bar drawn beside the grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorBar {
    pub label: String,
    pub min: f64,
    pub max: f64,
    pub center: f64,
    /// Evenly spaced (value, colour) samples from `min` to `max`
    pub ticks: Vec<(f64, Rgb)>,
}

/// Complete draw list for one heatmap
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapLayout {
    pub title: Option<String>,
    pub width: f64,
    pub height: f64,
    pub cells: Vec<LayoutCell>,
    pub row_labels: Vec<AxisLabel>,
    pub column_labels: Vec<AxisLabel>,
    pub colorbar: ColorBar,
}

const COLORBAR_TICKS: usize = 9;

impl HeatmapLayout {
    /// Lay out every matrix cell, in (row, column) order
    pub fn build(matrix: &Matrix, scale: &ColorScale, config: &LayoutConfig) -> Result<Self> {
        config.validate()?;

        let (cell_width, cell_height) = config.cell_size();
        let pitch_x = cell_width + config.cell_gap;
        let pitch_y = cell_height + config.cell_gap;

        let cells: Vec<LayoutCell> = matrix
            .cells()
            .map(|cell| {
                let color = scale.color(cell.value);
                LayoutCell {
                    row: cell.row,
                    column: cell.column,
                    x: cell.column as f64 * pitch_x,
                    y: cell.row as f64 * pitch_y,
                    width: cell_width,
                    height: cell_height,
                    value: cell.value,
                    color,
                    annotation: config
                        .annotate
                        .then(|| format!("{:.*}", config.annotation_precision, cell.value)),
                    text_color: if color.luminance() > 0.5 {
                        Rgb::new(0, 0, 0)
                    } else {
                        Rgb::new(255, 255, 255)
                    },
                }
            })
            .collect();

        let row_labels = matrix
            .row_labels()
            .iter()
            .enumerate()
            .map(|(index, text)| AxisLabel {
                index,
                text: text.clone(),
                x: -config.cell_gap,
                y: index as f64 * pitch_y + cell_height / 2.0,
                rotation_degrees: 0.0,
            })
            .collect();

        let column_labels = matrix
            .column_labels()
            .iter()
            .enumerate()
            .map(|(index, text)| AxisLabel {
                index,
                text: text.clone(),
                x: index as f64 * pitch_x + cell_width / 2.0,
                y: -config.cell_gap,
                rotation_degrees: COLUMN_LABEL_ROTATION_DEGREES,
            })
            .collect();

        let (min, max) = scale.bounds();
        let step = (max - min) / (COLORBAR_TICKS - 1) as f64;
        let ticks = (0..COLORBAR_TICKS)
            .map(|i| {
                let value = min + step * i as f64;
                (value, scale.color(value))
            })
            .collect();

        let width = extent(matrix.columns(), pitch_x, config.cell_gap);
        let height = extent(matrix.rows(), pitch_y, config.cell_gap);
        debug!(
            "Laid out {} cells on a {:.0}×{:.0} grid",
            cells.len(),
            width,
            height
        );

        Ok(Self {
            title: config.title.clone(),
            width,
            height,
            cells,
            row_labels,
            column_labels,
            colorbar: ColorBar {
                label: config.colorbar_label.clone(),
                min,
                max,
                center: scale.center(),
                ticks,
            },
        })
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&LayoutCell> {
        let columns = self.column_labels.len();
        if column >= columns {
            return None;
        }
        self.cells.get(row * columns + column)
    }
}

/// Total span of `count` cells laid out at `pitch`, without the trailing gap
fn extent(count: usize, pitch: f64, gap: f64) -> f64 {
    if count == 0 {
        0.0
    } else {
        count as f64 * pitch - gap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AxisLabels;
    use crate::render::colormap::{ColorScaleConfig, Colormap};

    fn matrix() -> Matrix {
        Matrix::new(
            AxisLabels::new(
                vec!["X".to_string(), "Y".to_string()],
                vec!["A".to_string(), "B".to_string()],
            ),
            vec![-4.0, 0.0, 2.0, 4.0],
        )
        .unwrap()
    }

    fn scale() -> ColorScale {
        ColorScale::new(&ColorScaleConfig {
            colormap: Colormap::Bwr,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_cells_positioned_by_index() {
        let layout = HeatmapLayout::build(&matrix(), &scale(), &LayoutConfig::default()).unwrap();

        assert_eq!(layout.cells.len(), 4);
        let cell = layout.cell(1, 0).unwrap();
        assert_eq!((cell.row, cell.column), (1, 0));
        assert_eq!((cell.x, cell.y), (0.0, 43.0));
        let cell = layout.cell(0, 1).unwrap();
        assert_eq!((cell.x, cell.y), (43.0, 0.0));
        assert_eq!(layout.width, 83.0);
        assert_eq!(layout.height, 83.0);
    }

    #[test]
    fn test_cell_colors_and_annotations() {
        let layout = HeatmapLayout::build(&matrix(), &scale(), &LayoutConfig::default()).unwrap();

        assert_eq!(layout.cell(0, 0).unwrap().color, Rgb::new(0, 0, 255));
        assert_eq!(layout.cell(0, 1).unwrap().color, Rgb::new(255, 255, 255));
        assert_eq!(layout.cell(1, 1).unwrap().color, Rgb::new(255, 0, 0));
        assert_eq!(
            layout.cell(1, 0).unwrap().annotation.as_deref(),
            Some("2.0")
        );
        assert_eq!(layout.cell(0, 1).unwrap().text_color, Rgb::new(0, 0, 0));
    }

    #[test]
    fn test_rectangular_cells_without_annotation() {
        let config = LayoutConfig {
            square_cells: false,
            cell_width: 20.0,
            cell_height: 10.0,
            cell_gap: 0.0,
            annotate: false,
            ..Default::default()
        };
        let layout = HeatmapLayout::build(&matrix(), &scale(), &config).unwrap();

        let cell = layout.cell(1, 1).unwrap();
        assert_eq!((cell.x, cell.y, cell.width, cell.height), (20.0, 10.0, 20.0, 10.0));
        assert!(cell.annotation.is_none());
    }

    #[test]
    fn test_labels_and_colorbar() {
        let layout = HeatmapLayout::build(&matrix(), &scale(), &LayoutConfig::default()).unwrap();

        let rows: Vec<&str> = layout.row_labels.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(rows, vec!["X", "Y"]);
        assert_eq!(layout.column_labels[1].rotation_degrees, 45.0);
        assert_eq!(layout.colorbar.ticks.len(), 9);
        assert_eq!(layout.colorbar.ticks[0].0, -4.0);
        assert_eq!(layout.colorbar.ticks[8].0, 4.0);
        assert_eq!(layout.colorbar.label, "log2 (fold change)");
    }

    #[test]
    fn test_invalid_layout_rejected() {
        let config = LayoutConfig {
            cell_width: 0.0,
            ..Default::default()
        };
        assert!(HeatmapLayout::build(&matrix(), &scale(), &config).is_err());
    }
}
