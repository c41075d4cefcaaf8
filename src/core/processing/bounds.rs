//! Content-bounds detection: the tight bounding box of the non-transparent
//! (or non-background) region of a buffer, and the crop built on top of it.
use tracing::info;

use crate::core::processing::segment;
use crate::error::{Error, Result};
use crate::types::{BoundingBox, Channels, PixelBuffer};

/// How content is told apart from background. Alpha-based detection is exact
/// and preferred when an alpha channel exists; contour-based detection is the
/// heuristic fallback for flat-color images.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum DetectionStrategy {
    AlphaBased,
    ContourBased,
}

impl DetectionStrategy {
    pub fn for_buffer(buffer: &PixelBuffer) -> Self {
        match buffer.channels() {
            Channels::Rgba => DetectionStrategy::AlphaBased,
            Channels::Rgb => DetectionStrategy::ContourBased,
        }
    }
}

/// Minimal axis-aligned rectangle enclosing the buffer's content.
///
/// 4-channel buffers: every pixel with alpha > 0 qualifies; fails with
/// `NoContentFound` when none do. 3-channel buffers: Otsu-thresholded
/// luminance with inverted polarity, optionally opened with a 5x5 kernel
/// when `denoise` is set, then the largest foreground region; fails with
/// `NoContoursFound` when the mask is empty.
pub fn detect_content_bounds(buffer: &PixelBuffer, denoise: bool) -> Result<BoundingBox> {
    let bounds = match DetectionStrategy::for_buffer(buffer) {
        DetectionStrategy::AlphaBased => alpha_bounds(buffer)?,
        DetectionStrategy::ContourBased => contour_bounds(buffer, denoise)?,
    };
    info!(
        "Detected content bounds: ({},{}) {}x{} in {}x{}",
        bounds.x,
        bounds.y,
        bounds.width,
        bounds.height,
        buffer.width(),
        buffer.height()
    );
    Ok(bounds)
}

/// Detect content bounds and slice them out into a new buffer.
pub fn crop_to_content(buffer: &PixelBuffer, denoise: bool) -> Result<PixelBuffer> {
    let bounds = detect_content_bounds(buffer, denoise)?;
    buffer.crop(&bounds)
}

fn alpha_bounds(buffer: &PixelBuffer) -> Result<BoundingBox> {
    let mut min_x = usize::MAX;
    let mut min_y = usize::MAX;
    let mut max_x = 0usize;
    let mut max_y = 0usize;
    let mut found = false;

    let stride = buffer.pixel_stride();
    for (y, row) in buffer.data().chunks_exact(buffer.row_stride()).enumerate() {
        for (x, pixel) in row.chunks_exact(stride).enumerate() {
            if pixel[3] == 0 {
                continue;
            }
            found = true;
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }

    if !found {
        return Err(Error::NoContentFound);
    }
    Ok(BoundingBox {
        x: min_x,
        y: min_y,
        width: max_x - min_x + 1,
        height: max_y - min_y + 1,
    })
}

fn contour_bounds(buffer: &PixelBuffer, denoise: bool) -> Result<BoundingBox> {
    let gray = segment::luminance(buffer);
    let threshold = segment::otsu_threshold(&gray);
    let mut mask = segment::binarize_inverted(&gray, threshold);
    if denoise {
        mask = segment::open_mask(&mask);
    }
    segment::largest_region_bounds(&mask).ok_or(Error::NoContoursFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgba_with_block(
        width: usize,
        height: usize,
        block: BoundingBox,
        color: [u8; 4],
    ) -> PixelBuffer {
        let mut buf = PixelBuffer::filled(width, height, Channels::Rgba, &[0, 0, 0, 0]).unwrap();
        for y in block.y..block.bottom() {
            for x in block.x..block.right() {
                buf.pixel_mut(x, y).copy_from_slice(&color);
            }
        }
        buf
    }

    #[test]
    fn strategy_follows_channel_count() {
        let rgba = PixelBuffer::filled(2, 2, Channels::Rgba, &[0, 0, 0, 0]).unwrap();
        let rgb = PixelBuffer::filled(2, 2, Channels::Rgb, &[0, 0, 0]).unwrap();
        assert_eq!(
            DetectionStrategy::for_buffer(&rgba),
            DetectionStrategy::AlphaBased
        );
        assert_eq!(
            DetectionStrategy::for_buffer(&rgb),
            DetectionStrategy::ContourBased
        );
    }

    #[test]
    fn alpha_bounds_are_tight() {
        let block = BoundingBox {
            x: 3,
            y: 8,
            width: 4,
            height: 4,
        };
        let buf = rgba_with_block(10, 20, block, [200, 10, 10, 255]);
        assert_eq!(detect_content_bounds(&buf, false).unwrap(), block);
    }

    #[test]
    fn a_single_barely_visible_pixel_counts() {
        let mut buf = PixelBuffer::filled(5, 5, Channels::Rgba, &[0, 0, 0, 0]).unwrap();
        buf.pixel_mut(2, 3).copy_from_slice(&[0, 0, 0, 1]);
        assert_eq!(
            detect_content_bounds(&buf, false).unwrap(),
            BoundingBox {
                x: 2,
                y: 3,
                width: 1,
                height: 1
            }
        );
    }

    #[test]
    fn fully_transparent_buffer_has_no_content() {
        let buf = PixelBuffer::filled(5, 5, Channels::Rgba, &[9, 9, 9, 0]).unwrap();
        let err = detect_content_bounds(&buf, false).unwrap_err();
        assert!(matches!(err, Error::NoContentFound));
    }

    #[test]
    fn contour_bounds_find_dark_content_on_light_background() {
        let mut buf = PixelBuffer::filled(12, 12, Channels::Rgb, &[240, 240, 240]).unwrap();
        for y in 4..9 {
            for x in 2..7 {
                buf.pixel_mut(x, y).copy_from_slice(&[20, 20, 20]);
            }
        }
        assert_eq!(
            detect_content_bounds(&buf, false).unwrap(),
            BoundingBox {
                x: 2,
                y: 4,
                width: 5,
                height: 5
            }
        );
    }

    #[test]
    fn denoise_drops_a_thin_spike_from_the_box() {
        let mut buf = PixelBuffer::filled(24, 24, Channels::Rgb, &[240, 240, 240]).unwrap();
        for y in 8..16 {
            for x in 8..16 {
                buf.pixel_mut(x, y).copy_from_slice(&[20, 20, 20]);
            }
        }
        // One-pixel-wide spike attached to the block stretches the raw box
        for x in 16..21 {
            buf.pixel_mut(x, 12).copy_from_slice(&[20, 20, 20]);
        }

        let raw = detect_content_bounds(&buf, false).unwrap();
        assert_eq!(
            raw,
            BoundingBox {
                x: 8,
                y: 8,
                width: 13,
                height: 8
            }
        );

        let cleaned = detect_content_bounds(&buf, true).unwrap();
        assert_eq!(
            cleaned,
            BoundingBox {
                x: 8,
                y: 8,
                width: 8,
                height: 8
            }
        );
    }

    #[test]
    fn crop_is_idempotent() {
        let block = BoundingBox {
            x: 1,
            y: 2,
            width: 6,
            height: 3,
        };
        let buf = rgba_with_block(9, 9, block, [1, 2, 3, 128]);

        let cropped = crop_to_content(&buf, false).unwrap();
        assert_eq!(cropped.width(), 6);
        assert_eq!(cropped.height(), 3);

        // Detecting again on the cropped result returns its full extent
        let again = detect_content_bounds(&cropped, false).unwrap();
        assert_eq!(
            again,
            BoundingBox {
                x: 0,
                y: 0,
                width: 6,
                height: 3
            }
        );
        assert_eq!(crop_to_content(&cropped, false).unwrap(), cropped);
    }
}
