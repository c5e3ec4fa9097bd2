//! Configuration management and validation.
//!
//! Bundles the parse options, colour scale, layout and concurrency settings.
//! Settings are layered: built-in defaults, then an optional JSON file, then
//! command-line overrides applied through the `with_*` builders.

use crate::constants::MAX_CONCURRENT_SHEETS;
use crate::error::{HeatmapError, Result};
use crate::parser::{DecimalMark, ParseOptions};
use crate::render::{ColorScaleConfig, Colormap, LayoutConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Global configuration for heatmap preparation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapConfig {
    /// Input format
    pub parse: ParseOptions,

    /// Value → colour mapping
    pub color_scale: ColorScaleConfig,

    /// Cell geometry and annotation
    pub layout: LayoutConfig,

    /// Maximum sheets parsed at the same time
    pub max_concurrent_sheets: usize,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            parse: ParseOptions::default(),
            color_scale: ColorScaleConfig::default(),
            layout: LayoutConfig::default(),
            max_concurrent_sheets: num_cpus::get().clamp(1, MAX_CONCURRENT_SHEETS),
        }
    }
}

impl HeatmapConfig {
    /// Load a JSON configuration file; missing keys fall back to defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| HeatmapError::io(path, e))?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            HeatmapError::configuration(format!("invalid config file {}: {}", path.display(), e))
        })?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Set the field separator
    pub fn with_separator(mut self, separator: char) -> Self {
        self.parse.separator = separator;
        self
    }

    /// Read `1,5` style decimal numbers
    pub fn with_decimal_comma(mut self) -> Self {
        self.parse.decimal_mark = DecimalMark::Comma;
        self
    }

    /// Keep whitespace around labels and values
    pub fn without_trimming(mut self) -> Self {
        self.parse.trim_fields = false;
        self
    }

    pub fn with_colormap(mut self, colormap: Colormap) -> Self {
        self.color_scale.colormap = colormap;
        self
    }

    /// Set the colour scale bounds
    pub fn with_bounds(mut self, min: f64, max: f64) -> Self {
        self.color_scale.min = min;
        self.color_scale.max = max;
        self
    }

    pub fn with_center(mut self, center: f64) -> Self {
        self.color_scale.center = Some(center);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.layout.title = Some(title.into());
        self
    }

    pub fn without_annotations(mut self) -> Self {
        self.layout.annotate = false;
        self
    }

    pub fn without_square_cells(mut self) -> Self {
        self.layout.square_cells = false;
        self
    }

    /// Set maximum concurrent sheets
    pub fn with_max_concurrent_sheets(mut self, max_sheets: usize) -> Self {
        self.max_concurrent_sheets = max_sheets;
        self
    }

    /// Check every section
    pub fn validate(&self) -> Result<()> {
        self.parse.validate()?;
        self.color_scale.validate()?;
        self.layout.validate()?;
        if self.max_concurrent_sheets == 0 {
            return Err(HeatmapError::configuration(
                "max_concurrent_sheets must be at least 1",
            ));
        }
        Ok(())
    }
}
