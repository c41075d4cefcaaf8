use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{Error, Result};
use crate::io::writers;
use crate::types::{Channels, OutputFormat, PixelBuffer};

/// Decode an encoded image held in memory. Sources carrying an alpha
/// channel decode to 4-channel buffers; everything else lands as RGB.
pub fn decode_bytes(bytes: &[u8]) -> Result<PixelBuffer> {
    let decoded = image::load_from_memory(bytes).map_err(|e| Error::Decode(e.to_string()))?;
    if decoded.color().has_alpha() {
        let rgba = decoded.to_rgba8();
        PixelBuffer::from_raw(
            rgba.width() as usize,
            rgba.height() as usize,
            Channels::Rgba,
            rgba.into_raw(),
        )
    } else {
        let rgb = decoded.to_rgb8();
        PixelBuffer::from_raw(
            rgb.width() as usize,
            rgb.height() as usize,
            Channels::Rgb,
            rgb.into_raw(),
        )
    }
}

/// Read and decode an image file.
pub fn load_buffer(path: &Path) -> Result<PixelBuffer> {
    let bytes = fs::read(path)?;
    let buffer = decode_bytes(&bytes)?;
    info!(
        "Loaded {} ({}x{}, {} channels)",
        path.display(),
        buffer.width(),
        buffer.height(),
        buffer.channels().count()
    );
    Ok(buffer)
}

/// Output format implied by a path's extension (case-insensitive).
pub fn format_for_path(path: &Path) -> Result<OutputFormat> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match extension.as_deref() {
        Some("png") => Ok(OutputFormat::PNG),
        Some("jpg") | Some("jpeg") => Ok(OutputFormat::JPEG),
        _ => Err(Error::InvalidArgument {
            arg: "output path",
            value: path.display().to_string(),
        }),
    }
}

/// Whether the path looks like an image this crate can process.
pub fn is_supported_image(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref(),
        Some("png") | Some("jpg") | Some("jpeg")
    )
}

/// Encode a buffer into the given container. JPEG takes 3-channel input
/// only; flatten the alpha away before encoding.
pub fn encode_buffer(buffer: &PixelBuffer, format: OutputFormat) -> Result<Vec<u8>> {
    match format {
        OutputFormat::PNG => writers::png::encode_png(buffer),
        OutputFormat::JPEG => {
            if buffer.has_alpha() {
                return Err(Error::Encode(
                    "JPEG cannot carry an alpha channel; flatten first".to_string(),
                ));
            }
            writers::jpeg::encode_rgb_jpeg(buffer)
        }
    }
}

/// Encode and write a buffer to `path`, choosing the format from the
/// extension.
pub fn save_buffer(buffer: &PixelBuffer, path: &Path) -> Result<()> {
    let format = format_for_path(path)?;
    match format {
        OutputFormat::PNG => writers::png::write_png(path, buffer)?,
        OutputFormat::JPEG => {
            if buffer.has_alpha() {
                return Err(Error::Encode(
                    "JPEG cannot carry an alpha channel; flatten first".to_string(),
                ));
            }
            writers::jpeg::write_rgb_jpeg(path, buffer)?
        }
    }
    info!(
        "Saved {} ({}, {}x{})",
        path.display(),
        format,
        buffer.width(),
        buffer.height()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_bytes_decode_with_alpha_intact() {
        let buf = PixelBuffer::filled(3, 2, Channels::Rgba, &[10, 20, 30, 128]).unwrap();
        let encoded = encode_buffer(&buf, OutputFormat::PNG).unwrap();
        let decoded = decode_bytes(&encoded).unwrap();
        assert_eq!(decoded, buf);
    }

    #[test]
    fn jpeg_bytes_decode_as_three_channels() {
        let buf = PixelBuffer::filled(8, 8, Channels::Rgb, &[200, 100, 50]).unwrap();
        let encoded = encode_buffer(&buf, OutputFormat::JPEG).unwrap();
        let decoded = decode_bytes(&encoded).unwrap();
        assert_eq!(decoded.width(), 8);
        assert_eq!(decoded.height(), 8);
        assert_eq!(decoded.channels(), Channels::Rgb);
    }

    #[test]
    fn extensions_map_to_formats_case_insensitively() {
        assert_eq!(
            format_for_path(Path::new("out.png")).unwrap(),
            OutputFormat::PNG
        );
        assert_eq!(
            format_for_path(Path::new("out.JPG")).unwrap(),
            OutputFormat::JPEG
        );
        assert_eq!(
            format_for_path(Path::new("out.jpeg")).unwrap(),
            OutputFormat::JPEG
        );
        assert!(format_for_path(Path::new("out.gif")).is_err());
        assert!(format_for_path(Path::new("out")).is_err());
    }

    #[test]
    fn supported_extensions_are_recognized() {
        assert!(is_supported_image(Path::new("a.png")));
        assert!(is_supported_image(Path::new("b.JPEG")));
        assert!(!is_supported_image(Path::new("c.txt")));
        assert!(!is_supported_image(Path::new("d")));
    }

    #[test]
    fn jpeg_encoding_rejects_alpha_buffers() {
        let buf = PixelBuffer::filled(2, 2, Channels::Rgba, &[0, 0, 0, 255]).unwrap();
        assert!(matches!(
            encode_buffer(&buf, OutputFormat::JPEG).unwrap_err(),
            Error::Encode(_)
        ));
    }

    #[test]
    fn save_and_load_round_trip_a_png_exactly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let buf = PixelBuffer::filled(5, 4, Channels::Rgba, &[9, 8, 7, 200]).unwrap();
        save_buffer(&buf, &path).unwrap();
        assert_eq!(load_buffer(&path).unwrap(), buf);
    }

    #[test]
    fn saving_alpha_to_a_jpeg_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jpg");
        let buf = PixelBuffer::filled(2, 2, Channels::Rgba, &[0, 0, 0, 255]).unwrap();
        assert!(save_buffer(&buf, &path).is_err());
        assert!(!path.exists());
    }
}
