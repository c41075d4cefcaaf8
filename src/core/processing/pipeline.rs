use tracing::info;

use crate::core::params::DEFAULT_CANVAS_SIZE;
use crate::core::processing::{bounds, compose, flatten, resize};
use crate::error::Result;
use crate::types::{PixelBuffer, WatermarkSpec};

/// Settings for one full processing pass over a decoded image.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Crop to detected content and re-center on the square canvas.
    pub crop_to_content: bool,
    /// Side length of the square canvas used after cropping.
    pub canvas_size: usize,
    /// Apply morphological opening to the binary mask before contour
    /// detection on 3-channel inputs.
    pub denoise: bool,
    /// Watermark blended onto the result when present.
    pub watermark: Option<WatermarkSpec>,
    /// Flatten the alpha channel onto this background when present,
    /// yielding a 3-channel result.
    pub flatten_background: Option<[u8; 3]>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            crop_to_content: false,
            canvas_size: DEFAULT_CANVAS_SIZE,
            denoise: false,
            watermark: None,
            flatten_background: None,
        }
    }
}

/// Run the enabled stages in their fixed order: content crop with canvas
/// normalization first, then watermarking, then alpha flattening. Stage
/// failures abort the pass and surface unchanged.
pub fn run_pipeline(buffer: PixelBuffer, config: &PipelineConfig) -> Result<PixelBuffer> {
    info!(
        "Processing {}x{} ({} channels)",
        buffer.width(),
        buffer.height(),
        buffer.channels().count()
    );

    let mut current = buffer;

    if config.crop_to_content {
        current = bounds::crop_to_content(&current, config.denoise)?;
        current = resize::normalize_to_canvas(&current, config.canvas_size)?;
    }

    if let Some(watermark) = &config.watermark {
        compose::apply_watermark(&mut current, watermark)?;
    }

    if let Some(background) = config.flatten_background {
        current = flatten::flatten(&current, background)?;
    }

    Ok(current)
}
