//! Editor configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grid::GridSettings;
use crate::sort::ReadingPattern;
use crate::viewport::ViewportChrome;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Vertical gaps used when stacking labels beneath an image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelGaps {
    /// Gap between the image bottom and its name.
    pub name_gap: f64,
    /// Gap between the name bottom and the position caption.
    pub position_gap: f64,
}

impl Default for LabelGaps {
    fn default() -> Self {
        Self {
            name_gap: 8.0,
            position_gap: 4.0,
        }
    }
}

/// Tunables for the layout editor. Every field falls back to its default when missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub chrome: ViewportChrome,
    /// Screen pixels of pointer travel before a press becomes a drag.
    pub drag_threshold_px: f64,
    /// Minimum overlap (intersection over the smaller area) that triggers a swap.
    pub swap_overlap: f64,
    /// Vertical distance within which layers belong to the same row.
    pub row_threshold: f64,
    pub gaps: LabelGaps,
    pub grid: GridSettings,
    pub reading_pattern: ReadingPattern,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            chrome: ViewportChrome::default(),
            drag_threshold_px: 3.0,
            swap_overlap: 0.3,
            row_threshold: 20.0,
            gaps: LabelGaps::default(),
            grid: GridSettings::default(),
            reading_pattern: ReadingPattern::default(),
        }
    }
}

impl LayoutConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
