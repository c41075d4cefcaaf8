use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};

use crate::error::{Error, Result};
use crate::types::{Channels, PixelBuffer};

fn color_type(channels: Channels) -> ExtendedColorType {
    match channels {
        Channels::Rgb => ExtendedColorType::Rgb8,
        Channels::Rgba => ExtendedColorType::Rgba8,
    }
}

/// Encode a buffer as PNG into memory, keeping the alpha channel when
/// the buffer has one.
pub fn encode_png(buffer: &PixelBuffer) -> Result<Vec<u8>> {
    let mut encoded = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut encoded, CompressionType::Default, FilterType::Adaptive);
    encoder
        .write_image(
            buffer.data(),
            buffer.width() as u32,
            buffer.height() as u32,
            color_type(buffer.channels()),
        )
        .map_err(|e| Error::Encode(e.to_string()))?;
    Ok(encoded)
}

/// Encode a buffer as PNG straight to a file.
pub fn write_png(output: &Path, buffer: &PixelBuffer) -> Result<()> {
    let file = File::create(output)?;
    let writer = BufWriter::new(file);
    let encoder =
        PngEncoder::new_with_quality(writer, CompressionType::Default, FilterType::Adaptive);
    encoder
        .write_image(
            buffer.data(),
            buffer.width() as u32,
            buffer.height() as u32,
            color_type(buffer.channels()),
        )
        .map_err(|e| Error::Encode(e.to_string()))?;
    Ok(())
}
