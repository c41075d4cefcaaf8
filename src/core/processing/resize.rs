use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer, images::Image};
use tracing::info;

use crate::core::processing::padding::pad_to_canvas;
use crate::error::{Error, Result};
use crate::types::{Channels, PixelBuffer};

/// Dimensions after uniformly scaling the long side down to `target_size`.
/// Buffers whose long side is already at or below the target are unchanged;
/// upscaling never happens. The short side rounds to the nearest pixel and
/// never drops below 1.
pub fn calculate_fit_dimensions(
    width: usize,
    height: usize,
    target_size: usize,
) -> (usize, usize) {
    let long_side = width.max(height);
    if long_side <= target_size {
        return (width, height);
    }

    let scale_factor = target_size as f64 / long_side as f64;
    let short_side = (width.min(height) as f64 * scale_factor).round().max(1.0) as usize;

    if width >= height {
        (target_size, short_side)
    } else {
        (short_side, target_size)
    }
}

/// Lanczos3 resample to the exact target dimensions, all channels
/// interpolated independently (straight, non-premultiplied alpha).
pub fn resize_buffer(
    buffer: &PixelBuffer,
    target_width: usize,
    target_height: usize,
) -> Result<PixelBuffer> {
    if target_width == 0 || target_height == 0 {
        return Err(Error::ZeroSize {
            size: target_width.min(target_height),
        });
    }
    if target_width == buffer.width() && target_height == buffer.height() {
        return Ok(buffer.clone());
    }

    let pixel_type = match buffer.channels() {
        Channels::Rgb => PixelType::U8x3,
        Channels::Rgba => PixelType::U8x4,
    };
    let resize_options =
        ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Lanczos3));
    let mut resizer = Resizer::new();

    let src_image = Image::from_vec_u8(
        buffer.width() as u32,
        buffer.height() as u32,
        buffer.data().to_vec(),
        pixel_type,
    )
    .map_err(|e| Error::external(e))?;
    let mut dst_image = Image::new(target_width as u32, target_height as u32, pixel_type);
    resizer
        .resize(&src_image, &mut dst_image, &resize_options)
        .map_err(|e| Error::external(e))?;

    PixelBuffer::from_raw(
        target_width,
        target_height,
        buffer.channels(),
        dst_image.into_vec(),
    )
}

/// Shrink so the width does not exceed `max_width`, preserving aspect ratio.
/// Buffers already within the cap are returned unchanged.
pub fn resize_to_max_width(buffer: &PixelBuffer, max_width: usize) -> Result<PixelBuffer> {
    if max_width == 0 {
        return Err(Error::ZeroSize { size: max_width });
    }
    if buffer.width() <= max_width {
        return Ok(buffer.clone());
    }

    let scale_factor = max_width as f64 / buffer.width() as f64;
    let new_height = (buffer.height() as f64 * scale_factor).round().max(1.0) as usize;
    info!(
        "Shrinking {}x{} -> {}x{} (max width {})",
        buffer.width(),
        buffer.height(),
        max_width,
        new_height,
        max_width
    );
    resize_buffer(buffer, max_width, new_height)
}

/// Fit the buffer onto an exact `canvas_size` x `canvas_size` canvas:
/// uniform downscale when the long side exceeds the canvas, then centered
/// padding on both axes (transparent for 4-channel, white for 3-channel).
pub fn normalize_to_canvas(buffer: &PixelBuffer, canvas_size: usize) -> Result<PixelBuffer> {
    if canvas_size == 0 {
        return Err(Error::ZeroSize { size: canvas_size });
    }

    let max_dim = buffer.width().max(buffer.height());
    let scaled = if max_dim > canvas_size {
        let (new_width, new_height) =
            calculate_fit_dimensions(buffer.width(), buffer.height(), canvas_size);
        info!(
            "Scaling {}x{} -> {}x{} (long side {})",
            buffer.width(),
            buffer.height(),
            new_width,
            new_height,
            canvas_size
        );
        resize_buffer(buffer, new_width, new_height)?
    } else {
        buffer.clone()
    };

    pad_to_canvas(&scaled, canvas_size)
}
