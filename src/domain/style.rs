//! Cosmetic parameters for the annotated output.
//!
//! The defaults live in [`defaults`] so the HTTP query parser, the
//! `/api/config` endpoint (read by the browser UI) and [`StyleConfig::default`]
//! all agree.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::{DomainError, DomainResult};

pub mod defaults {
    use super::RgbColor;

    pub const MIN_CONFIDENCE: f32 = 0.25;
    pub const BORDER_THICKNESS: u32 = 50;
    pub const BORDER_COLOR: RgbColor = RgbColor::new(50, 50, 50);
    pub const TEXT_SCALE: f32 = 0.7;
    pub const TEXT_THICKNESS: u32 = 2;
    pub const TEXT_COLOR: RgbColor = RgbColor::new(255, 255, 255);
    pub const BG_COLOR: RgbColor = RgbColor::new(0, 0, 0);
    pub const BG_OPACITY: f32 = 0.5;
    pub const BOX_COLOR: RgbColor = RgbColor::new(0, 255, 0);
    pub const BOX_THICKNESS: u32 = 2;

    pub const MAX_BORDER_THICKNESS: u32 = 1024;
    pub const MAX_TEXT_SCALE: f32 = 10.0;
    /// Upper bound for both text and box strokes.
    pub const MAX_THICKNESS: u32 = 32;

    pub const JPEG_QUALITY: u8 = 95;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.r, self.g, self.b)
    }
}

/// Parses `"R,G,B"`; each component must be an integer in 0..=255.
impl FromStr for RgbColor {
    type Err = DomainError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| DomainError::InvalidColor {
            value: raw.to_string(),
            reason,
        };

        let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(invalid(format!(
                "expected 3 comma-separated components, got {}",
                parts.len()
            )));
        }

        let mut rgb = [0u8; 3];
        for (slot, part) in rgb.iter_mut().zip(&parts) {
            let value: i64 = part
                .parse()
                .map_err(|_| invalid(format!("component '{}' is not an integer", part)))?;
            *slot = u8::try_from(value)
                .map_err(|_| invalid(format!("component {} is outside 0..=255", value)))?;
        }
        Ok(RgbColor::new(rgb[0], rgb[1], rgb[2]))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleConfig {
    pub border_thickness: u32,
    pub border_color: RgbColor,
    pub text_scale: f32,
    pub text_thickness: u32,
    pub text_color: RgbColor,
    pub bg_color: RgbColor,
    pub bg_opacity: f32,
    pub min_confidence: f32,
    pub box_color: RgbColor,
    pub box_thickness: u32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            border_thickness: defaults::BORDER_THICKNESS,
            border_color: defaults::BORDER_COLOR,
            text_scale: defaults::TEXT_SCALE,
            text_thickness: defaults::TEXT_THICKNESS,
            text_color: defaults::TEXT_COLOR,
            bg_color: defaults::BG_COLOR,
            bg_opacity: defaults::BG_OPACITY,
            min_confidence: defaults::MIN_CONFIDENCE,
            box_color: defaults::BOX_COLOR,
            box_thickness: defaults::BOX_THICKNESS,
        }
    }
}

impl StyleConfig {
    pub fn validate(&self) -> DomainResult<()> {
        fn unit_range(field: &str, value: f32) -> DomainResult<()> {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(DomainError::InvalidInput(format!(
                    "{} must be within [0, 1], got {}",
                    field, value
                )))
            }
        }

        fn stroke(field: &str, value: u32) -> DomainResult<()> {
            if (1..=defaults::MAX_THICKNESS).contains(&value) {
                Ok(())
            } else {
                Err(DomainError::InvalidInput(format!(
                    "{} must be within 1..={}, got {}",
                    field,
                    defaults::MAX_THICKNESS,
                    value
                )))
            }
        }

        if self.border_thickness > defaults::MAX_BORDER_THICKNESS {
            return Err(DomainError::InvalidInput(format!(
                "border thickness must be at most {}, got {}",
                defaults::MAX_BORDER_THICKNESS,
                self.border_thickness
            )));
        }
        if !(self.text_scale > 0.0 && self.text_scale <= defaults::MAX_TEXT_SCALE) {
            return Err(DomainError::InvalidInput(format!(
                "text scale must be within (0, {}], got {}",
                defaults::MAX_TEXT_SCALE,
                self.text_scale
            )));
        }
        stroke("text thickness", self.text_thickness)?;
        stroke("box thickness", self.box_thickness)?;
        unit_range("bg_opacity", self.bg_opacity)?;
        unit_range("min_confidence", self.min_confidence)
    }
}
