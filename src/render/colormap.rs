//! Colour-map presets and the value → colour lookup.
//!
//! Presets are piecewise-linear ramps through a handful of anchor colours,
//! close enough to their matplotlib namesakes for a heatmap preview.

use crate::constants::{DEFAULT_COLOR_MAX, DEFAULT_COLOR_MIN};
use crate::error::{HeatmapError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb`
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    fn lerp(self, other: Self, t: f64) -> Self {
        let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
        Self::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }

    /// Relative luminance in [0, 1], used to pick annotation text colour
    pub fn luminance(self) -> f64 {
        (0.299 * f64::from(self.r) + 0.587 * f64::from(self.g) + 0.114 * f64::from(self.b))
            / 255.0
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Colour-map presets offered by the tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Colormap {
    #[default]
    #[serde(rename = "seismic")]
    Seismic,
    #[serde(rename = "bwr")]
    Bwr,
    #[serde(rename = "ocean_r")]
    OceanR,
    #[serde(rename = "Blues")]
    Blues,
    #[serde(rename = "binary")]
    Binary,
    #[serde(rename = "PuOr")]
    PuOr,
}

const SEISMIC: &[(f64, Rgb)] = &[
    (0.0, Rgb::new(0, 0, 77)),
    (0.25, Rgb::new(0, 0, 255)),
    (0.5, Rgb::new(255, 255, 255)),
    (0.75, Rgb::new(255, 0, 0)),
    (1.0, Rgb::new(128, 0, 0)),
];

const BWR: &[(f64, Rgb)] = &[
    (0.0, Rgb::new(0, 0, 255)),
    (0.5, Rgb::new(255, 255, 255)),
    (1.0, Rgb::new(255, 0, 0)),
];

const OCEAN_R: &[(f64, Rgb)] = &[
    (0.0, Rgb::new(255, 255, 255)),
    (0.333, Rgb::new(0, 128, 170)),
    (0.667, Rgb::new(0, 0, 85)),
    (1.0, Rgb::new(0, 128, 0)),
];

const BLUES: &[(f64, Rgb)] = &[
    (0.0, Rgb::new(247, 251, 255)),
    (0.5, Rgb::new(107, 174, 214)),
    (1.0, Rgb::new(8, 48, 107)),
];

const BINARY: &[(f64, Rgb)] = &[(0.0, Rgb::new(255, 255, 255)), (1.0, Rgb::new(0, 0, 0))];

const PUOR: &[(f64, Rgb)] = &[
    (0.0, Rgb::new(127, 59, 8)),
    (0.25, Rgb::new(253, 184, 99)),
    (0.5, Rgb::new(247, 247, 247)),
    (0.75, Rgb::new(178, 171, 210)),
    (1.0, Rgb::new(45, 0, 75)),
];

impl Colormap {
    pub const ALL: [Colormap; 6] = [
        Colormap::Seismic,
        Colormap::Bwr,
        Colormap::OceanR,
        Colormap::Blues,
        Colormap::Binary,
        Colormap::PuOr,
    ];

    /// Short matplotlib-style name
    pub fn name(self) -> &'static str {
        match self {
            Self::Seismic => "seismic",
            Self::Bwr => "bwr",
            Self::OceanR => "ocean_r",
            Self::Blues => "Blues",
            Self::Binary => "binary",
            Self::PuOr => "PuOr",
        }
    }

    /// Human-readable description shown to users
    pub fn description(self) -> &'static str {
        match self {
            Self::Seismic => "Blue and Red (strong)",
            Self::Bwr => "Blue and Red (light)",
            Self::OceanR => "Blue with high values in green",
            Self::Blues => "White to Blue",
            Self::Binary => "Black and White",
            Self::PuOr => "Color Blind Mode",
        }
    }

    fn stops(self) -> &'static [(f64, Rgb)] {
        match self {
            Self::Seismic => SEISMIC,
            Self::Bwr => BWR,
            Self::OceanR => OCEAN_R,
            Self::Blues => BLUES,
            Self::Binary => BINARY,
            Self::PuOr => PUOR,
        }
    }

    /// Colour at position `t` in [0, 1]; out-of-range positions are clamped
    pub fn sample(self, t: f64) -> Rgb {
        let stops = self.stops();
        let t = if t.is_nan() { 0.5 } else { t.clamp(0.0, 1.0) };

        for pair in stops.windows(2) {
            let (start, from) = pair[0];
            let (end, to) = pair[1];
            if t <= end {
                let span = end - start;
                let local = if span > 0.0 { (t - start) / span } else { 0.0 };
                return from.lerp(to, local);
            }
        }
        stops[stops.len() - 1].1
    }
}

impl fmt::Display for Colormap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Colormap {
    type Err = HeatmapError;

    /// Accepts the short name (case-insensitive) or the description
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|map| {
                map.name().eq_ignore_ascii_case(wanted) || map.description() == wanted
            })
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|map| map.name()).collect();
                HeatmapError::configuration(format!(
                    "unknown colormap '{}' (expected one of: {})",
                    wanted,
                    known.join(", ")
                ))
            })
    }
}

/// Colour scale settings as they appear in configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorScaleConfig {
    pub colormap: Colormap,
    pub min: f64,
    pub max: f64,
    /// Value mapped to the middle of the colour map; midpoint of the bounds when unset
    pub center: Option<f64>,
}

impl Default for ColorScaleConfig {
    fn default() -> Self {
        Self {
            colormap: Colormap::default(),
            min: DEFAULT_COLOR_MIN,
            max: DEFAULT_COLOR_MAX,
            center: None,
        }
    }
}

impl ColorScaleConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(HeatmapError::configuration(
                "colour scale bounds must be finite",
            ));
        }
        if self.min >= self.max {
            return Err(HeatmapError::configuration(format!(
                "colour scale minimum {} must be below maximum {}",
                self.min, self.max
            )));
        }
        if self.center.is_some_and(|center| !center.is_finite()) {
            return Err(HeatmapError::configuration(
                "colour scale center must be finite",
            ));
        }
        Ok(())
    }
}

/// Validated value → colour mapping.
///
/// Values are clamped to `[min, max]` and mapped symmetrically around
/// `center`, so the center always lands on the middle colour of the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    colormap: Colormap,
    min: f64,
    max: f64,
    center: f64,
    half_range: f64,
}

impl ColorScale {
    pub fn new(config: &ColorScaleConfig) -> Result<Self> {
        config.validate()?;
        let center = config.center.unwrap_or((config.min + config.max) / 2.0);
        let half_range = (config.max - center).max(center - config.min);
        Ok(Self {
            colormap: config.colormap,
            min: config.min,
            max: config.max,
            center,
            half_range,
        })
    }

    pub fn colormap(&self) -> Colormap {
        self.colormap
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    pub fn center(&self) -> f64 {
        self.center
    }

    /// Position of a value on the colour map, in [0, 1]
    pub fn position(&self, value: f64) -> f64 {
        let clamped = value.clamp(self.min, self.max);
        if self.half_range <= 0.0 {
            return 0.5;
        }
        (0.5 + (clamped - self.center) / (2.0 * self.half_range)).clamp(0.0, 1.0)
    }

    pub fn color(&self, value: f64) -> Rgb {
        self.colormap.sample(self.position(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_endpoints() {
        assert_eq!(Colormap::Bwr.sample(0.0), Rgb::new(0, 0, 255));
        assert_eq!(Colormap::Bwr.sample(0.5), Rgb::new(255, 255, 255));
        assert_eq!(Colormap::Bwr.sample(1.0), Rgb::new(255, 0, 0));
        assert_eq!(Colormap::Binary.sample(-3.0), Rgb::new(255, 255, 255));
        assert_eq!(Colormap::Binary.sample(7.0), Rgb::new(0, 0, 0));
        assert_eq!(Colormap::Binary.sample(0.5), Rgb::new(128, 128, 128));
    }

    #[test]
    fn test_colormap_lookup_by_name_and_description() {
        assert_eq!("seismic".parse::<Colormap>().unwrap(), Colormap::Seismic);
        assert_eq!("blues".parse::<Colormap>().unwrap(), Colormap::Blues);
        assert_eq!(
            "Color Blind Mode".parse::<Colormap>().unwrap(),
            Colormap::PuOr
        );
        assert!("viridis".parse::<Colormap>().is_err());
    }

    #[test]
    fn test_default_scale_is_linear_between_bounds() {
        let scale = ColorScale::new(&ColorScaleConfig::default()).unwrap();
        assert_eq!(scale.center(), 0.0);
        assert_eq!(scale.position(-4.0), 0.0);
        assert_eq!(scale.position(0.0), 0.5);
        assert_eq!(scale.position(2.0), 0.75);
        assert_eq!(scale.position(100.0), 1.0);
        assert_eq!(scale.color(0.0), Rgb::new(255, 255, 255));
    }

    #[test]
    fn test_off_center_scale_is_symmetric_around_center() {
        let config = ColorScaleConfig {
            colormap: Colormap::Bwr,
            min: 0.0,
            max: 10.0,
            center: Some(2.0),
        };
        let scale = ColorScale::new(&config).unwrap();
        assert_eq!(scale.position(2.0), 0.5);
        assert_eq!(scale.position(10.0), 1.0);
        // 2 units below center out of a half range of 8
        assert_eq!(scale.position(0.0), 0.375);
    }

    #[test]
    fn test_invalid_bounds_rejected() {
        let config = ColorScaleConfig {
            min: 1.0,
            max: 1.0,
            ..Default::default()
        };
        assert!(ColorScale::new(&config).is_err());

        let config = ColorScaleConfig {
            max: f64::INFINITY,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_hex_format() {
        assert_eq!(Rgb::new(255, 0, 16).to_hex(), "#ff0010");
    }
}
