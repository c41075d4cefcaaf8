use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::OutputFormat;

/// Canvas side length used when none is configured.
pub const DEFAULT_CANVAS_SIZE: usize = 900;
/// Global opacity applied to a watermark's own alpha when none is configured.
pub const DEFAULT_WATERMARK_OPACITY: f32 = 0.3;
/// Background that transparency is flattened onto for formats without alpha.
pub const DEFAULT_FLATTEN_BACKGROUND: [u8; 3] = [255, 255, 255];
/// Width cap used by the standalone max-width shrink.
pub const DEFAULT_MAX_WIDTH: usize = 900;

/// Processing parameters suitable for config files and presets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingParams {
    /// Output format; names batch outputs and decides whether alpha survives
    pub format: OutputFormat,
    /// Crop to detected content bounds, then normalize onto a square canvas
    pub crop: bool,
    /// Canvas side length in pixels, used when `crop` is enabled
    pub canvas_size: usize,
    /// Optional watermark overlay path (must carry an alpha channel)
    pub watermark: Option<PathBuf>,
    /// Watermark opacity in [0, 1]
    pub opacity: f32,
    /// Apply a 5x5 morphological opening to the segmentation mask before
    /// contour extraction (3-channel inputs only)
    pub denoise: bool,
}

impl Default for ProcessingParams {
    fn default() -> Self {
        Self {
            format: OutputFormat::PNG,
            crop: false,
            canvas_size: DEFAULT_CANVAS_SIZE,
            watermark: None,
            opacity: DEFAULT_WATERMARK_OPACITY,
            denoise: false,
        }
    }
}

impl ProcessingParams {
    /// Load parameters from a JSON preset file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents).map_err(|e| Error::InvalidParams {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}
