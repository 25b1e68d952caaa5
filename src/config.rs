use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::brush::BrushWidthLimits;
use crate::input::GestureConfig;
use crate::tools::StrokeConfig;

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Invalid config value: {0}")]
    InvalidValue(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Every recognized option of the sketching core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // missing keys fall back to the defaults below
pub struct SketchConfig {
    /// Displacement in pixels before a touch counts as a drag
    pub drag_slop_px: f64,
    /// Minimum distance between accepted stroke points, in canvas pixels
    pub min_path_segment_length_px: f64,
    /// Minimum time between accepted stroke points
    pub min_path_segment_interval_ms: u64,
    pub min_brush_width_px: f64,
    pub max_brush_width_px: f64,
    /// Emit cubic segments instead of straight lines
    pub curve_smoothing: bool,
    /// Maximum undo depth, -1 for unbounded
    pub undo_history_depth: i64,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            drag_slop_px: 8.0,
            min_path_segment_length_px: 3.0,
            min_path_segment_interval_ms: 8,
            min_brush_width_px: 1.0,
            max_brush_width_px: 64.0,
            curve_smoothing: false,
            undo_history_depth: -1,
        }
    }
}

impl SketchConfig {
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: SketchConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.drag_slop_px >= 0.0) {
            return Err(ConfigError::InvalidValue(format!(
                "drag_slop_px must be >= 0, got {}",
                self.drag_slop_px
            )));
        }
        if !(self.min_path_segment_length_px >= 0.0) {
            return Err(ConfigError::InvalidValue(format!(
                "min_path_segment_length_px must be >= 0, got {}",
                self.min_path_segment_length_px
            )));
        }
        if !(self.min_brush_width_px > 0.0 && self.min_brush_width_px <= self.max_brush_width_px) {
            return Err(ConfigError::InvalidValue(format!(
                "brush width range [{}, {}] is empty",
                self.min_brush_width_px, self.max_brush_width_px
            )));
        }
        if self.undo_history_depth < -1 {
            return Err(ConfigError::InvalidValue(format!(
                "undo_history_depth must be -1 or >= 0, got {}",
                self.undo_history_depth
            )));
        }
        Ok(())
    }

    pub fn gesture_config(&self) -> GestureConfig {
        GestureConfig {
            drag_slop_px: self.drag_slop_px,
        }
    }

    pub fn stroke_config(&self) -> StrokeConfig {
        StrokeConfig {
            min_segment_length_px: self.min_path_segment_length_px,
            min_segment_interval_ms: self.min_path_segment_interval_ms,
            curve_smoothing: self.curve_smoothing,
        }
    }

    pub fn brush_width_limits(&self) -> BrushWidthLimits {
        BrushWidthLimits {
            min_px: self.min_brush_width_px,
            max_px: self.max_brush_width_px,
        }
    }

    /// `None` means unbounded
    pub fn history_depth(&self) -> Option<usize> {
        usize::try_from(self.undo_history_depth).ok()
    }
}
