use tracing::info;

use crate::error::Result;
use crate::types::{Channels, PixelBuffer};

/// Merge the alpha channel into the color channels against a solid
/// `background`, producing a 3-channel buffer. Each color channel mixes as
/// `coverage * color + (1 - coverage) * background` with the result
/// truncated to u8. Buffers without alpha are returned unchanged.
pub fn flatten(buffer: &PixelBuffer, background: [u8; 3]) -> Result<PixelBuffer> {
    if !buffer.has_alpha() {
        return Ok(buffer.clone());
    }

    info!(
        "Flattening {}x{} RGBA onto background {:?}",
        buffer.width(),
        buffer.height(),
        background
    );

    let mut flat = Vec::with_capacity(buffer.width() * buffer.height() * 3);
    for pixel in buffer.data().chunks_exact(4) {
        let coverage = pixel[3] as f32 / 255.0;
        for channel in 0..3 {
            let blended = coverage * pixel[channel] as f32
                + (1.0 - coverage) * background[channel] as f32;
            flat.push(blended as u8);
        }
    }

    PixelBuffer::from_raw(buffer.width(), buffer.height(), Channels::Rgb, flat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_input_is_returned_unchanged() {
        let buf = PixelBuffer::filled(3, 3, Channels::Rgb, &[12, 34, 56]).unwrap();
        assert_eq!(flatten(&buf, [255, 255, 255]).unwrap(), buf);
    }

    #[test]
    fn fully_transparent_pixels_take_the_background() {
        let buf = PixelBuffer::filled(4, 2, Channels::Rgba, &[90, 90, 90, 0]).unwrap();
        let flat = flatten(&buf, [255, 255, 255]).unwrap();
        assert_eq!(flat.channels(), Channels::Rgb);
        for y in 0..2 {
            for x in 0..4 {
                assert_eq!(flat.pixel(x, y), &[255, 255, 255]);
            }
        }
    }

    #[test]
    fn fully_opaque_pixels_keep_their_color() {
        let buf = PixelBuffer::filled(2, 2, Channels::Rgba, &[13, 57, 211, 255]).unwrap();
        let flat = flatten(&buf, [0, 0, 0]).unwrap();
        assert_eq!(flat.pixel(1, 1), &[13, 57, 211]);
    }

    #[test]
    fn partial_alpha_mixes_toward_the_background() {
        let buf = PixelBuffer::filled(1, 1, Channels::Rgba, &[200, 0, 60, 128]).unwrap();
        let flat = flatten(&buf, [0, 200, 0]).unwrap();
        // coverage = 128/255: 100.39 -> 100, 99.61 -> 99, 30.12 -> 30
        assert_eq!(flat.pixel(0, 0), &[100, 99, 30]);
    }

    #[test]
    fn output_drops_the_alpha_channel() {
        let buf = PixelBuffer::filled(5, 4, Channels::Rgba, &[1, 2, 3, 200]).unwrap();
        let flat = flatten(&buf, [255, 255, 255]).unwrap();
        assert_eq!(flat.width(), 5);
        assert_eq!(flat.height(), 4);
        assert_eq!(flat.data().len(), 5 * 4 * 3);
    }
}
