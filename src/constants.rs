//! Application constants for the heatmap maker
//!
//! Default values shared by the parser, the colour scale, the layout
//! builder and the command-line interface.

// =============================================================================
// Input Format
// =============================================================================

/// Field separator used by German spreadsheet CSV exports
pub const DEFAULT_SEPARATOR: char = ';';

/// One label row plus at least one data row
pub const MIN_ROWS: usize = 2;

/// One label column plus at least one data column
pub const MIN_COLUMNS: usize = 2;

/// Leading byte-order mark written by some spreadsheet exporters
pub const UTF8_BOM: &str = "\u{feff}";

/// Characters that may appear inside a number and therefore cannot separate fields
pub const NUMERIC_CHARACTERS: &str = "0123456789.+-eE";

/// File extensions picked up when a directory is given as input
pub const SHEET_EXTENSIONS: &[&str] = &["csv", "txt"];

// =============================================================================
// Colour Scale
// =============================================================================

/// Lower bound of the colour scale
pub const DEFAULT_COLOR_MIN: f64 = -4.0;

/// Upper bound of the colour scale
pub const DEFAULT_COLOR_MAX: f64 = 4.0;

/// Preset used when none is requested
pub const DEFAULT_COLORMAP: &str = "seismic";

// =============================================================================
// Layout
// =============================================================================

pub const DEFAULT_CELL_WIDTH: f64 = 40.0;
pub const DEFAULT_CELL_HEIGHT: f64 = 40.0;

/// White margin drawn between neighbouring cells
pub const DEFAULT_CELL_GAP: f64 = 3.0;

/// Decimal places shown in annotated cells
pub const DEFAULT_ANNOTATION_PRECISION: usize = 1;

/// Rotation applied to column labels drawn above the grid
pub const COLUMN_LABEL_ROTATION_DEGREES: f64 = 45.0;

pub const DEFAULT_COLORBAR_LABEL: &str = "log2 (fold change)";

// =============================================================================
// Data Frame Export
// =============================================================================

/// Name of the leading string column holding the row labels
pub const ROW_LABEL_COLUMN: &str = "row_label";

// =============================================================================
// Processing
// =============================================================================

/// Upper bound on sheets parsed at the same time when no limit is configured
pub const MAX_CONCURRENT_SHEETS: usize = 16;

/// Progress bar template shared by batch operations
pub const PROGRESS_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}";
