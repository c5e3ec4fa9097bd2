//! Downstream consumers of a parsed [`Matrix`](crate::models::Matrix).
//!
//! - [`colormap`] - colour-map presets and the value → colour scale
//! - [`layout`] - positions, colours and labels for every cell
//!
//! Nothing here writes image files; the layout is handed to whatever draws it.

pub mod colormap;
pub mod layout;

pub use colormap::{ColorScale, ColorScaleConfig, Colormap, Rgb};
pub use layout::{HeatmapLayout, LayoutCell, LayoutConfig};
