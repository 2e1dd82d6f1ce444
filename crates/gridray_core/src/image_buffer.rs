//! Dual-precision RGB image storage.
//!
//! Every pixel exists twice: as `f32` radiance (unclamped, may exceed 1.0
//! while samples accumulate) and as a clamped 8-bit display value. The two
//! sides are only brought back in agreement by [`ImageBuffer::sync_float_to_int`]
//! and [`ImageBuffer::sync_int_to_float`].
//!
//! Pixel (0, 0) is the lower-left corner; scanline 0 is the bottom row.

use gridray_math::{Color, Interval};
use image::{Rgb, RgbImage};
use log::debug;
use thiserror::Error;

use crate::pattern::TestPattern;

/// Channels per pixel (RGB).
pub const CHANNELS: usize = 3;

/// Errors raised by pixel access.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("Pixel ({x}, {y}) is outside the {width}x{height} image")]
    PixelOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
}

pub type ImageResult<T> = Result<T, ImageError>;

/// Quantize one float channel for display: clamp to [0, 1], then `floor(v * 256)`
/// capped at 255 so that 1.0 lands in the top code instead of overflowing.
#[inline]
pub fn quantize(value: f32) -> u8 {
    let clamped = Interval::UNIT.clamp(value);
    ((clamped * 256.0).floor() as u32).min(255) as u8
}

/// Expand one display channel back to float; 0 and 255 map exactly to 0.0 and 1.0.
#[inline]
pub fn dequantize(value: u8) -> f32 {
    value as f32 / 255.0
}

/// Fixed-size image with float and 8-bit RGB channels.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    width: u32,
    height: u32,
    float_channels: Vec<f32>,
    int_channels: Vec<u8>,
}

impl ImageBuffer {
    /// Create a new image buffer with both sides zeroed (black).
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize * CHANNELS;
        Self {
            width,
            height,
            float_channels: vec![0.0; len],
            int_channels: vec![0; len],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> usize {
        CHANNELS
    }

    /// Set the float color at (x, y). Values are stored as given, without clamping.
    pub fn write_float_pixel(&mut self, x: u32, y: u32, color: Color) -> ImageResult<()> {
        let idx = self.index(x, y)?;
        self.float_channels[idx..idx + CHANNELS].copy_from_slice(&color.to_array());
        Ok(())
    }

    /// Get the float color at (x, y).
    pub fn read_float_pixel(&self, x: u32, y: u32) -> ImageResult<Color> {
        let idx = self.index(x, y)?;
        Ok(Color::from_slice(&self.float_channels[idx..idx + CHANNELS]))
    }

    /// Get the display color at (x, y).
    pub fn read_int_pixel(&self, x: u32, y: u32) -> ImageResult<[u8; CHANNELS]> {
        let idx = self.index(x, y)?;
        let mut rgb = [0u8; CHANNELS];
        rgb.copy_from_slice(&self.int_channels[idx..idx + CHANNELS]);
        Ok(rgb)
    }

    /// Log both sides of pixel (x, y) at debug level.
    pub fn log_pixel(&self, x: u32, y: u32) -> ImageResult<()> {
        let rgb = self.read_int_pixel(x, y)?;
        let color = self.read_float_pixel(x, y)?;
        debug!(
            "Pixel ({}, {}): int=({}, {}, {}) float=({:.4}, {:.4}, {:.4})",
            x, y, rgb[0], rgb[1], rgb[2], color.x, color.y, color.z
        );
        Ok(())
    }

    /// Rebuild the display channels from the float channels.
    pub fn sync_float_to_int(&mut self) {
        for (dst, &src) in self.int_channels.iter_mut().zip(&self.float_channels) {
            *dst = quantize(src);
        }
    }

    /// Rebuild the float channels from the display channels.
    pub fn sync_int_to_float(&mut self) {
        for (dst, &src) in self.float_channels.iter_mut().zip(&self.int_channels) {
            *dst = dequantize(src);
        }
    }

    /// Draw a test pattern into the display channels and mirror it into the
    /// float channels. Any index is accepted; it wraps around the pattern count.
    pub fn fill_test_pattern(&mut self, index: i32) -> TestPattern {
        let pattern = TestPattern::from_index(index);
        pattern.fill(self.width, self.height, &mut self.int_channels);
        self.sync_int_to_float();
        pattern
    }

    /// Interleaved RGB display bytes, scanline 0 first.
    pub fn int_channels(&self) -> &[u8] {
        &self.int_channels
    }

    /// Interleaved RGB float values, scanline 0 first.
    pub fn float_channels(&self) -> &[f32] {
        &self.float_channels
    }

    /// Copy the display channels into an [`RgbImage`] with row 0 at the top,
    /// as image files expect.
    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| {
            let idx = self.offset(x, self.height - 1 - y);
            Rgb([
                self.int_channels[idx],
                self.int_channels[idx + 1],
                self.int_channels[idx + 2],
            ])
        })
    }

    /// Array index of the first channel at (x, y).
    fn index(&self, x: u32, y: u32) -> ImageResult<usize> {
        if x >= self.width || y >= self.height {
            return Err(ImageError::PixelOutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(self.offset(x, y))
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }
}
