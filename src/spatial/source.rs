//! Decoded source image storage and row strip extraction

use crate::color::PixelSample;
use crate::io::error::{Result, invalid_input};
use ndarray::{Array3, s};

/// Number of interleaved channels per pixel
pub const CHANNELS: usize = 4;

/// Decoded RGBA pixel buffer indexed as (`y`, `x`, `channel`)
///
/// Immutable once built. A run takes ownership of its source image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    pixels: Array3<u8>,
}

impl SourceImage {
    /// Wrap interleaved RGBA bytes in row-major order
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the buffer length does not equal
    /// `width * height * 4`
    pub fn from_rgba(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        let len = data.len();
        let pixels = Array3::from_shape_vec((height, width, CHANNELS), data).map_err(|e| {
            invalid_input(
                "pixels",
                &len,
                &format!("does not describe a {width}x{height} RGBA image: {e}"),
            )
        })?;
        Ok(Self { pixels })
    }

    /// Image filled with a single pixel value
    pub fn filled(width: usize, height: usize, pixel: PixelSample) -> Self {
        let rgba = [pixel.r, pixel.g, pixel.b, pixel.a];
        let pixels = Array3::from_shape_fn((height, width, CHANNELS), |(_, _, c)| {
            rgba.get(c).copied().unwrap_or(0)
        });
        Self { pixels }
    }

    /// Width in pixels
    pub fn width(&self) -> usize {
        self.pixels.dim().1
    }

    /// Height in pixels
    pub fn height(&self) -> usize {
        self.pixels.dim().0
    }

    /// Pixel at (`x`, `y`), if inside the image
    pub fn pixel(&self, x: usize, y: usize) -> Option<PixelSample> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let channel = |c: usize| self.pixels.get((y, x, c)).copied().unwrap_or(0);
        Some(PixelSample::new(channel(0), channel(1), channel(2), channel(3)))
    }

    /// Overwrite the pixel at (`x`, `y`); out-of-bounds writes are ignored
    pub fn set_pixel(&mut self, x: usize, y: usize, pixel: PixelSample) {
        for (c, value) in [pixel.r, pixel.g, pixel.b, pixel.a].into_iter().enumerate() {
            if let Some(slot) = self.pixels.get_mut((y, x, c)) {
                *slot = value;
            }
        }
    }

    /// Copy one horizontal strip of tiles into a flat RGBA buffer
    ///
    /// The strip always holds `tile_height` full-width pixel rows. Rows past
    /// the bottom edge read as transparent black, which averaging treats as
    /// background.
    pub fn row_strip(&self, row: usize, tile_height: usize) -> Vec<u8> {
        let width = self.width();
        let mut strip = vec![0; tile_height * width * CHANNELS];

        let top = row.saturating_mul(tile_height).min(self.height());
        let bottom = top.saturating_add(tile_height).min(self.height());
        let view = self.pixels.slice(s![top..bottom, .., ..]);

        for (dst, src) in strip.iter_mut().zip(view.iter()) {
            *dst = *src;
        }
        strip
    }
}

impl From<image::RgbaImage> for SourceImage {
    fn from(image: image::RgbaImage) -> Self {
        let (width, height) = (image.width() as usize, image.height() as usize);
        let pixels = Array3::from_shape_vec((height, width, CHANNELS), image.into_raw())
            .unwrap_or_else(|_| Array3::zeros((height, width, CHANNELS)));
        Self { pixels }
    }
}
