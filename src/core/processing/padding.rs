use tracing::info;

use crate::error::{Error, Result};
use crate::types::{Channels, PixelBuffer};

/// Padding fill for each channel layout: opaque white where no alpha
/// channel exists, fully transparent where one does.
pub fn pad_color(channels: Channels) -> &'static [u8] {
    match channels {
        Channels::Rgb => &[255, 255, 255],
        Channels::Rgba => &[0, 0, 0, 0],
    }
}

/// Center the buffer on a square `canvas_size` canvas filled with the
/// padding color. When the leftover space on an axis is odd, the extra
/// pixel goes to the trailing side.
pub fn pad_to_canvas(buffer: &PixelBuffer, canvas_size: usize) -> Result<PixelBuffer> {
    if buffer.width() > canvas_size || buffer.height() > canvas_size {
        return Err(Error::Processing(format!(
            "cannot pad {}x{} onto a {} canvas",
            buffer.width(),
            buffer.height(),
            canvas_size
        )));
    }

    let pad_left = (canvas_size - buffer.width()) / 2;
    let pad_top = (canvas_size - buffer.height()) / 2;

    info!(
        "Adding padding: {}x{} -> {}x{}, pad_left={}, pad_top={}",
        buffer.width(),
        buffer.height(),
        canvas_size,
        canvas_size,
        pad_left,
        pad_top
    );

    let mut canvas = PixelBuffer::filled(
        canvas_size,
        canvas_size,
        buffer.channels(),
        pad_color(buffer.channels()),
    )?;

    let stride = buffer.pixel_stride();
    let src_row_len = buffer.width() * stride;
    let canvas_row_stride = canvas.row_stride();
    // Copy per row using slice copies to minimize per-pixel indexing
    for row in 0..buffer.height() {
        let src_offset = row * src_row_len;
        let dst_offset = (row + pad_top) * canvas_row_stride + pad_left * stride;
        let src_slice = &buffer.data()[src_offset..src_offset + src_row_len];
        let dst_slice = &mut canvas.data_mut()[dst_offset..dst_offset + src_row_len];
        dst_slice.copy_from_slice(src_slice);
    }

    Ok(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad_colors_match_channel_layout() {
        assert_eq!(pad_color(Channels::Rgb), &[255, 255, 255]);
        assert_eq!(pad_color(Channels::Rgba), &[0, 0, 0, 0]);
    }

    #[test]
    fn odd_leftover_goes_to_the_trailing_side() {
        let buf = PixelBuffer::filled(5, 3, Channels::Rgba, &[7, 7, 7, 255]).unwrap();
        let padded = pad_to_canvas(&buf, 12).unwrap();
        // pad_left = (12-5)/2 = 3 leading, 4 trailing
        assert_eq!(padded.pixel(2, 5), &[0, 0, 0, 0]);
        assert_eq!(padded.pixel(3, 5), &[7, 7, 7, 255]);
        assert_eq!(padded.pixel(7, 5), &[7, 7, 7, 255]);
        assert_eq!(padded.pixel(8, 5), &[0, 0, 0, 0]);
        // pad_top = (12-3)/2 = 4 leading, 5 trailing
        assert_eq!(padded.pixel(5, 3), &[0, 0, 0, 0]);
        assert_eq!(padded.pixel(5, 4), &[7, 7, 7, 255]);
        assert_eq!(padded.pixel(5, 6), &[7, 7, 7, 255]);
        assert_eq!(padded.pixel(5, 7), &[0, 0, 0, 0]);
    }

    #[test]
    fn rgb_input_pads_with_white() {
        let buf = PixelBuffer::filled(2, 2, Channels::Rgb, &[1, 2, 3]).unwrap();
        let padded = pad_to_canvas(&buf, 4).unwrap();
        assert_eq!(padded.pixel(0, 0), &[255, 255, 255]);
        assert_eq!(padded.pixel(1, 1), &[1, 2, 3]);
        assert_eq!(padded.pixel(2, 2), &[1, 2, 3]);
        assert_eq!(padded.pixel(3, 3), &[255, 255, 255]);
    }

    #[test]
    fn exact_fit_is_a_plain_copy() {
        let buf = PixelBuffer::filled(6, 6, Channels::Rgb, &[9, 8, 7]).unwrap();
        assert_eq!(pad_to_canvas(&buf, 6).unwrap(), buf);
    }

    #[test]
    fn oversized_buffer_is_rejected() {
        let buf = PixelBuffer::filled(10, 4, Channels::Rgb, &[0, 0, 0]).unwrap();
        assert!(pad_to_canvas(&buf, 8).is_err());
    }
}
