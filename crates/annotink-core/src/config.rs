//! Controller configuration.

use crate::shapes::{SerializableColor, ShapeKind, ShapeStyle};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Invalid device pixel ratio: {0} (must be finite and positive)")]
    InvalidScaleFactor(f64),
    #[error("Invalid line width: {0} (must be finite and non-negative)")]
    InvalidLineWidth(f64),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Initial settings for a [`ShapeController`](crate::ShapeController).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Kind of shape created on empty space.
    #[serde(default)]
    pub shape_kind: ShapeKind,
    /// Style applied to newly created shapes.
    #[serde(default = "default_style")]
    pub style: ShapeStyle,
    /// Device pixel ratio of the backing surface.
    #[serde(default = "default_scale_factor")]
    pub scale_factor: f64,
}

fn default_style() -> ShapeStyle {
    ShapeStyle {
        stroke_color: Some(SerializableColor::black()),
        line_width: Some(2.0),
        fill_color: None,
    }
}

fn default_scale_factor() -> f64 {
    1.0
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            shape_kind: ShapeKind::default(),
            style: default_style(),
            scale_factor: default_scale_factor(),
        }
    }
}

impl ControllerConfig {
    /// Check the values a controller cannot work with.
    pub fn validate(&self) -> ConfigResult<()> {
        validate_scale_factor(self.scale_factor)?;
        validate_style(&self.style)
    }
}

pub(crate) fn validate_scale_factor(scale_factor: f64) -> ConfigResult<()> {
    if scale_factor.is_finite() && scale_factor > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidScaleFactor(scale_factor))
    }
}

pub(crate) fn validate_style(style: &ShapeStyle) -> ConfigResult<()> {
    match style.line_width {
        Some(width) if !width.is_finite() || width < 0.0 => Err(ConfigError::InvalidLineWidth(width)),
        _ => Ok(()),
    }
}
