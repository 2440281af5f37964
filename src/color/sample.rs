use crate::io::error::{Result, invalid_input};
use std::fmt;

/// One RGBA pixel as read from the source image
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PixelSample {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel, carried but never used for averaging
    pub a: u8,
}

impl PixelSample {
    /// Create a pixel sample from its four channels
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Build a sample from a 4-byte RGBA chunk, missing channels read as zero
    pub fn from_rgba(chunk: &[u8]) -> Self {
        let channel = |index: usize| chunk.get(index).copied().unwrap_or(0);
        Self::new(channel(0), channel(1), channel(2), channel(3))
    }

    /// Background samples have all three color channels at zero
    pub const fn is_background(&self) -> bool {
        self.r == 0 && self.g == 0 && self.b == 0
    }
}

/// Averaged representative color of one tile
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TileColor {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl TileColor {
    /// Color returned for tiles without a single foreground sample
    pub const SENTINEL: Self = Self::new(0, 0, 0);

    /// Create a tile color from its channels
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Canonical lookup key for this color
    pub fn key(&self) -> ColorKey {
        ColorKey(format!("{:02x}{:02x}{:02x}", self.r, self.g, self.b))
    }
}

impl From<[u8; 3]> for TileColor {
    fn from(rgb: [u8; 3]) -> Self {
        let [r, g, b] = rgb;
        Self::new(r, g, b)
    }
}

/// Canonical six-digit lowercase hex encoding of a color
///
/// The same key addresses the tile service (`/color/<key>`) and the color
/// cache, so two requests for one color always share a cache entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColorKey(String);

impl ColorKey {
    /// Normalize a textual color into its canonical key
    ///
    /// Accepts an optional leading `#` and either letter case.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` unless the text holds exactly six hex digits
    pub fn parse(text: &str) -> Result<Self> {
        let digits = text.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid_input(
                "color",
                &text,
                &"expected six hexadecimal digits",
            ));
        }
        Ok(Self(digits.to_ascii_lowercase()))
    }

    /// Decode the key back into the color it encodes
    pub fn color(&self) -> TileColor {
        let channel = |range: std::ops::Range<usize>| {
            self.0
                .get(range)
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
                .unwrap_or(0)
        };
        TileColor::new(channel(0..2), channel(2..4), channel(4..6))
    }

    /// Hex digits without any prefix
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
