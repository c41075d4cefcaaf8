//! Shared types used across photoprep.
//! Includes the `PixelBuffer` data model, `BoundingBox`, channel layout
//! (`Channels`), `OutputFormat`, and the validated `WatermarkSpec`.
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(
    Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, ValueEnum, Serialize, Deserialize,
)]
pub enum OutputFormat {
    PNG,
    JPEG, // No alpha; flattened onto white by the pipeline
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::PNG => "png",
            OutputFormat::JPEG => "jpg",
        }
    }

    pub fn supports_alpha(&self) -> bool {
        matches!(self, OutputFormat::PNG)
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::PNG => write!(f, "PNG"),
            OutputFormat::JPEG => write!(f, "JPEG"),
        }
    }
}

/// Channel layout of a pixel buffer: three color channels, optionally
/// followed by one alpha channel (0 = transparent, 255 = opaque).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum Channels {
    Rgb,
    Rgba,
}

impl Channels {
    pub fn count(&self) -> usize {
        match self {
            Channels::Rgb => 3,
            Channels::Rgba => 4,
        }
    }

    pub fn has_alpha(&self) -> bool {
        matches!(self, Channels::Rgba)
    }
}

impl std::fmt::Display for Channels {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Channels::Rgb => write!(f, "rgb"),
            Channels::Rgba => write!(f, "rgba"),
        }
    }
}

/// Axis-aligned integer rectangle in buffer coordinates.
/// Always fully inside the buffer that produced it; width and height >= 1.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct BoundingBox {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl BoundingBox {
    pub fn right(&self) -> usize {
        self.x + self.width
    }

    pub fn bottom(&self) -> usize {
        self.y + self.height
    }
}

/// In-memory rectangular grid of 3- or 4-channel pixels, row-major u8 data.
///
/// Invariants held by construction: `data.len() == width * height * channels`,
/// `width >= 1`, `height >= 1`. Pipeline stages consume a buffer and produce
/// a new one; a stage may mutate its own buffer internally.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    channels: Channels,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw interleaved pixel data, validating the geometry.
    pub fn from_raw(
        width: usize,
        height: usize,
        channels: Channels,
        data: Vec<u8>,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::ZeroSize {
                size: width.min(height),
            });
        }
        let expected = width * height * channels.count();
        if data.len() != expected {
            return Err(Error::BufferLength {
                width,
                height,
                channels: channels.count(),
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Allocate a buffer filled with a single pixel value.
    /// `fill` must hold exactly one channel value per channel.
    pub fn filled(width: usize, height: usize, channels: Channels, fill: &[u8]) -> Result<Self> {
        if fill.len() != channels.count() {
            return Err(Error::InvalidArgument {
                arg: "fill",
                value: format!("{} values for {} channels", fill.len(), channels.count()),
            });
        }
        let mut data = Vec::with_capacity(width * height * channels.count());
        for _ in 0..width * height {
            data.extend_from_slice(fill);
        }
        Self::from_raw(width, height, channels, data)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> Channels {
        self.channels
    }

    pub fn has_alpha(&self) -> bool {
        self.channels.has_alpha()
    }

    /// Bytes per pixel.
    pub fn pixel_stride(&self) -> usize {
        self.channels.count()
    }

    /// Bytes per row.
    pub fn row_stride(&self) -> usize {
        self.width * self.channels.count()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// Channel values of the pixel at (x, y).
    pub fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let c = self.channels.count();
        let offset = (y * self.width + x) * c;
        &self.data[offset..offset + c]
    }

    pub fn pixel_mut(&mut self, x: usize, y: usize) -> &mut [u8] {
        let c = self.channels.count();
        let offset = (y * self.width + x) * c;
        &mut self.data[offset..offset + c]
    }

    /// Copy the rectangle out into a new buffer of the same channel count.
    pub fn crop(&self, bounds: &BoundingBox) -> Result<Self> {
        if bounds.width == 0 || bounds.height == 0 {
            return Err(Error::ZeroSize {
                size: bounds.width.min(bounds.height),
            });
        }
        if bounds.right() > self.width || bounds.bottom() > self.height {
            return Err(Error::InvalidArgument {
                arg: "bounds",
                value: format!(
                    "({},{}) {}x{} outside {}x{} buffer",
                    bounds.x, bounds.y, bounds.width, bounds.height, self.width, self.height
                ),
            });
        }

        let c = self.channels.count();
        let mut data = Vec::with_capacity(bounds.width * bounds.height * c);
        // Copy per row using slice copies to minimize per-pixel indexing
        for row in bounds.y..bounds.bottom() {
            let offset = (row * self.width + bounds.x) * c;
            data.extend_from_slice(&self.data[offset..offset + bounds.width * c]);
        }
        Self::from_raw(bounds.width, bounds.height, self.channels, data)
    }
}

/// A 4-channel overlay plus the global opacity it is blended at.
/// Construction validates the alpha channel and the opacity range,
/// so a spec in hand is always usable.
#[derive(Clone, Debug)]
pub struct WatermarkSpec {
    buffer: PixelBuffer,
    opacity: f32,
}

impl WatermarkSpec {
    pub fn new(buffer: PixelBuffer, opacity: f32) -> Result<Self> {
        if !buffer.has_alpha() {
            return Err(Error::MissingAlphaChannel {
                context: "watermark overlay",
            });
        }
        if !(0.0..=1.0).contains(&opacity) {
            return Err(Error::InvalidArgument {
                arg: "opacity",
                value: opacity.to_string(),
            });
        }
        Ok(Self { buffer, opacity })
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_rejects_mismatched_length() {
        let err = PixelBuffer::from_raw(2, 2, Channels::Rgb, vec![0u8; 11]).unwrap_err();
        assert!(matches!(err, Error::BufferLength { actual: 11, .. }));
    }

    #[test]
    fn from_raw_rejects_zero_dimensions() {
        let err = PixelBuffer::from_raw(0, 4, Channels::Rgb, vec![]).unwrap_err();
        assert!(matches!(err, Error::ZeroSize { .. }));
    }

    #[test]
    fn filled_repeats_the_fill_pixel() {
        let buf = PixelBuffer::filled(3, 2, Channels::Rgba, &[1, 2, 3, 4]).unwrap();
        assert_eq!(buf.pixel(0, 0), &[1, 2, 3, 4]);
        assert_eq!(buf.pixel(2, 1), &[1, 2, 3, 4]);
        assert_eq!(buf.data().len(), 3 * 2 * 4);
    }

    #[test]
    fn crop_copies_the_exact_rectangle() {
        let mut buf = PixelBuffer::filled(4, 4, Channels::Rgb, &[0, 0, 0]).unwrap();
        buf.pixel_mut(1, 2).copy_from_slice(&[9, 8, 7]);

        let cropped = buf
            .crop(&BoundingBox {
                x: 1,
                y: 2,
                width: 2,
                height: 2,
            })
            .unwrap();
        assert_eq!(cropped.width(), 2);
        assert_eq!(cropped.height(), 2);
        assert_eq!(cropped.pixel(0, 0), &[9, 8, 7]);
        assert_eq!(cropped.pixel(1, 1), &[0, 0, 0]);
    }

    #[test]
    fn crop_rejects_out_of_range_bounds() {
        let buf = PixelBuffer::filled(4, 4, Channels::Rgb, &[0, 0, 0]).unwrap();
        let err = buf
            .crop(&BoundingBox {
                x: 3,
                y: 0,
                width: 2,
                height: 1,
            })
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { arg: "bounds", .. }));
    }

    #[test]
    fn watermark_spec_requires_alpha() {
        let rgb = PixelBuffer::filled(2, 2, Channels::Rgb, &[0, 0, 0]).unwrap();
        let err = WatermarkSpec::new(rgb, 0.3).unwrap_err();
        assert!(matches!(err, Error::MissingAlphaChannel { .. }));
    }

    #[test]
    fn watermark_spec_rejects_out_of_range_opacity() {
        let rgba = PixelBuffer::filled(2, 2, Channels::Rgba, &[0, 0, 0, 255]).unwrap();
        let err = WatermarkSpec::new(rgba, 1.5).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { arg: "opacity", .. }));
    }
}
