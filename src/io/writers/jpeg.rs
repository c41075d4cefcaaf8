use jpeg_encoder::{ColorType, Encoder};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::PixelBuffer;

/// Export quality for all JPEG output.
pub const JPEG_QUALITY: u8 = 100;

/// Encode a 3-channel buffer as JPEG into memory.
pub fn encode_rgb_jpeg(buffer: &PixelBuffer) -> Result<Vec<u8>> {
    let mut encoded = Vec::new();
    let encoder = Encoder::new(&mut encoded, JPEG_QUALITY);
    encoder
        .encode(
            buffer.data(),
            buffer.width() as u16,
            buffer.height() as u16,
            ColorType::Rgb,
        )
        .map_err(|e| Error::Encode(e.to_string()))?;
    Ok(encoded)
}

/// Encode a 3-channel buffer as JPEG straight to a file.
pub fn write_rgb_jpeg(output: &Path, buffer: &PixelBuffer) -> Result<()> {
    let file = File::create(output)?;
    let mut writer = BufWriter::new(file);
    let encoder = Encoder::new(&mut writer, JPEG_QUALITY);
    encoder
        .encode(
            buffer.data(),
            buffer.width() as u16,
            buffer.height() as u16,
            ColorType::Rgb,
        )
        .map_err(|e| Error::Encode(e.to_string()))?;
    Ok(())
}
