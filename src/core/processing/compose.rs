use tracing::warn;

use crate::error::{Error, Result};
use crate::types::{PixelBuffer, WatermarkSpec};

/// Intersection of a centered overlay with its base image, expressed in
/// both coordinate spaces. `width`/`height` of zero means no overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlapRegion {
    pub base_x: usize,
    pub base_y: usize,
    pub overlay_x: usize,
    pub overlay_y: usize,
    pub width: usize,
    pub height: usize,
}

impl OverlapRegion {
    /// Place the overlay centered on the base and clip to the base bounds.
    /// The offset may be negative on either axis when the overlay is
    /// larger; floor division keeps the centering stable in that case.
    pub fn centered(
        base_width: usize,
        base_height: usize,
        overlay_width: usize,
        overlay_height: usize,
    ) -> Self {
        let x_offset = (base_width as isize - overlay_width as isize).div_euclid(2);
        let y_offset = (base_height as isize - overlay_height as isize).div_euclid(2);

        let base_x = x_offset.max(0);
        let base_y = y_offset.max(0);
        let base_x_end = (x_offset + overlay_width as isize).min(base_width as isize);
        let base_y_end = (y_offset + overlay_height as isize).min(base_height as isize);

        OverlapRegion {
            base_x: base_x as usize,
            base_y: base_y as usize,
            overlay_x: (-x_offset).max(0) as usize,
            overlay_y: (-y_offset).max(0) as usize,
            width: (base_x_end - base_x).max(0) as usize,
            height: (base_y_end - base_y).max(0) as usize,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Alpha-blend `overlay` onto the center of `base` in place.
///
/// Per-pixel coverage is the overlay alpha scaled by the global `opacity`;
/// color channels mix as `coverage * overlay + (1 - coverage) * base` with
/// the result truncated back to u8. The base alpha channel, when present,
/// is left untouched, so repeated application keeps compounding rather
/// than accumulating coverage.
pub fn composite(base: &mut PixelBuffer, overlay: &PixelBuffer, opacity: f32) -> Result<()> {
    if !overlay.has_alpha() {
        return Err(Error::MissingAlphaChannel {
            context: "watermark compositing",
        });
    }
    if !(0.0..=1.0).contains(&opacity) {
        return Err(Error::InvalidArgument {
            arg: "opacity",
            value: opacity.to_string(),
        });
    }

    let region = OverlapRegion::centered(
        base.width(),
        base.height(),
        overlay.width(),
        overlay.height(),
    );
    if region.is_empty() {
        warn!("Overlay does not intersect the base image; nothing to blend");
        return Ok(());
    }

    let base_stride = base.pixel_stride();
    let base_row_stride = base.row_stride();
    let overlay_row_stride = overlay.row_stride();
    let overlay_data = overlay.data();
    let base_data = base.data_mut();

    for row in 0..region.height {
        let mut base_idx =
            (region.base_y + row) * base_row_stride + region.base_x * base_stride;
        let mut overlay_idx =
            (region.overlay_y + row) * overlay_row_stride + region.overlay_x * 4;
        for _ in 0..region.width {
            let coverage = (overlay_data[overlay_idx + 3] as f32 / 255.0) * opacity;
            for channel in 0..3 {
                let blended = coverage * overlay_data[overlay_idx + channel] as f32
                    + (1.0 - coverage) * base_data[base_idx + channel] as f32;
                base_data[base_idx + channel] = blended as u8;
            }
            base_idx += base_stride;
            overlay_idx += 4;
        }
    }

    Ok(())
}

/// Blend a configured watermark onto `base`.
pub fn apply_watermark(base: &mut PixelBuffer, watermark: &WatermarkSpec) -> Result<()> {
    composite(base, watermark.buffer(), watermark.opacity())
}
