//! Fill colours and the colour-sampling boundary.
//!
//! Generators never load images themselves. They ask a [`ColorSampler`] for the
//! colour at a canvas coordinate:
//! - Implement [`ColorSampler`] for custom sources, or pass a closure.
//! - [`RasterImage`] wraps an in-memory pixel buffer and clamps lookups to its bounds.
//! - [`SolidColor`] returns one colour everywhere (neutral gray by default).
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An 8-bit RGB colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    /// Fill used when no image is available.
    pub const GRAY: Color = Color::rgb(128, 128, 128);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn gray(v: u8) -> Self {
        Self::rgb(v, v, v)
    }

    /// CSS functional notation, e.g. `rgb(12,34,56)`.
    pub fn to_css(&self) -> String {
        self.to_string()
    }

    pub fn to_array(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::GRAY
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

impl From<[u8; 3]> for Color {
    fn from(value: [u8; 3]) -> Self {
        Color::rgb(value[0], value[1], value[2])
    }
}

/// Maps a canvas coordinate to a fill colour.
///
/// Implementors own their image; out-of-range coordinates must be clamped to
/// the image bounds rather than rejected.
pub trait ColorSampler: Send + Sync {
    fn sample(&self, x: f32, y: f32, canvas_width: f32, canvas_height: f32) -> Color;
}

impl<F> ColorSampler for F
where
    F: Fn(f32, f32, f32, f32) -> Color + Send + Sync,
{
    #[inline]
    fn sample(&self, x: f32, y: f32, canvas_width: f32, canvas_height: f32) -> Color {
        self(x, y, canvas_width, canvas_height)
    }
}

/// A sampler returning the same colour everywhere.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SolidColor(pub Color);

impl ColorSampler for SolidColor {
    #[inline]
    fn sample(&self, _x: f32, _y: f32, _canvas_width: f32, _canvas_height: f32) -> Color {
        self.0
    }
}

/// Channel layout of a [`RasterImage`] buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelLayout {
    Gray,
    Rgb,
    Rgba,
}

impl PixelLayout {
    pub fn channels(self) -> usize {
        match self {
            PixelLayout::Gray => 1,
            PixelLayout::Rgb => 3,
            PixelLayout::Rgba => 4,
        }
    }
}

/// Row-major 8-bit image buffer used as a colour source.
#[derive(Clone)]
pub struct RasterImage {
    width: u32,
    height: u32,
    layout: PixelLayout,
    data: Vec<u8>,
}

impl RasterImage {
    /// Wrap a pixel buffer. Fails if the buffer length does not match the dimensions.
    pub fn new(width: u32, height: u32, layout: PixelLayout, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidConfig(
                "image dimensions must be > 0".into(),
            ));
        }
        let expected = width as usize * height as usize * layout.channels();
        if data.len() != expected {
            return Err(Error::InvalidConfig(format!(
                "image buffer has {} bytes, expected {expected}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            layout,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Colour of the pixel at `(x, y)`, clamped into the image.
    pub fn pixel(&self, x: i64, y: i64) -> Color {
        let x = x.clamp(0, self.width as i64 - 1) as usize;
        let y = y.clamp(0, self.height as i64 - 1) as usize;
        let channels = self.layout.channels();
        let idx = (y * self.width as usize + x) * channels;
        match self.data.get(idx..idx + channels) {
            Some([v]) => Color::gray(*v),
            Some([r, g, b, ..]) => Color::rgb(*r, *g, *b),
            _ => Color::GRAY,
        }
    }
}

impl ColorSampler for RasterImage {
    fn sample(&self, x: f32, y: f32, canvas_width: f32, canvas_height: f32) -> Color {
        if canvas_width <= 0.0 || canvas_height <= 0.0 {
            return Color::GRAY;
        }
        let img_x = ((x / canvas_width) * self.width as f32).floor() as i64;
        let img_y = ((y / canvas_height) * self.height as f32).floor() as i64;
        self.pixel(img_x, img_y)
    }
}

impl fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}
