//! Heatmap Maker Library
//!
//! Turns spreadsheet-exported delimited text tables into labelled numeric
//! matrices ready for heatmap rendering.
//!
//! This library provides tools for:
//! - Parsing sheets through a staged pipeline (tokenize, validate, classify, assemble)
//! - Collecting every bad cell of a sheet in one pass, not just the first
//! - Mapping values onto diverging colour maps with a configurable center
//! - Laying out cells, axis labels and a colour bar for any renderer
//! - Exporting matrices as polars data frames
//! - Parsing many sheets concurrently with progress reporting

pub mod batch;
pub mod cli;
pub mod config;
pub mod constants;
pub mod diagnostics;
pub mod error;
pub mod frame;
pub mod loader;
pub mod models;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use config::HeatmapConfig;
pub use diagnostics::{Diagnostic, Diagnostics, ParseStage};
pub use error::{CellErrorReason, CellParseError, HeatmapError, Result, ShapeError};
pub use models::{AxisLabels, Matrix, MatrixCell};
pub use parser::{DecimalMark, ParseOptions, ParseResult, SheetParser, parse_sheet};
pub use render::{ColorScale, ColorScaleConfig, Colormap, HeatmapLayout, LayoutConfig};
