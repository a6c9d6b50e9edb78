//! RGBA drawing surfaces.
//!
//! This module provides:
//!
//! - The [`Image`] type, an owned RGBA image used for the 2D overlay and the 3D render surface.
//! - [`Color`], an 8-bit sRGB color with alpha, parseable from `#rrggbb` strings.
//! - [`Resolution`], the size of a surface, window or video stream.
//! - A handful of [`draw`] functions used to visualize landmarks and wireframes.

pub mod draw;
mod resolution;

use std::{fmt, path::Path, str::FromStr};

use embedded_graphics::{pixelcolor::raw::RawU32, prelude::PixelColor};
use image::{ImageBuffer, Rgba, RgbaImage};
use serde::Deserialize;
use thiserror::Error;

pub use resolution::*;

/// An 8-bit sRGB image with alpha channel.
#[derive(Clone)]
pub struct Image {
    pub(crate) buf: RgbaImage,
}

impl Image {
    /// Creates an empty image of a specified size.
    ///
    /// The image will start out black and fully transparent.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            buf: ImageBuffer::new(width, height),
        }
    }

    /// Creates an empty, fully transparent image of the given [`Resolution`].
    pub fn with_resolution(res: Resolution) -> Self {
        Self::new(res.width(), res.height())
    }

    /// Saves the image to the file system as a PNG.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        self.save_impl(path.as_ref())
    }

    fn save_impl(&self, path: &Path) -> anyhow::Result<()> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("png") => Ok(self.buf.save_with_format(path, image::ImageFormat::Png)?),
            _ => anyhow::bail!(
                "invalid image path '{}' (only `.png` output is supported)",
                path.display()
            ),
        }
    }

    /// Returns the width of this image, in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.buf.width()
    }

    /// Returns the height of this image, in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.buf.height()
    }

    /// Returns the size of this image.
    #[inline]
    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.width(), self.height())
    }

    /// Gets the image color at the given pixel coordinates.
    ///
    /// # Panics
    ///
    /// This will panic if `(x, y)` is outside the bounds of this image.
    pub fn get(&self, x: u32, y: u32) -> Color {
        Color(self.buf[(x, y)].0)
    }

    /// Sets the image color at the given pixel coordinates.
    ///
    /// # Panics
    ///
    /// This will panic if `(x, y)` is outside the bounds of this image.
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.buf[(x, y)] = Rgba(color.0);
    }

    /// Overwrites every pixel with `color`.
    pub fn clear(&mut self, color: Color) {
        for pixel in self.buf.pixels_mut() {
            *pixel = Rgba(color.0);
        }
    }

    /// Returns an iterator over all pixel colors, row by row.
    pub fn pixels(&self) -> impl Iterator<Item = Color> + '_ {
        self.buf.pixels().map(|p| Color(p.0))
    }

    /// Alpha-blends `src` on top of `self`, stretching or shrinking `src` as necessary.
    pub fn blend_from(&mut self, src: &Image) {
        if src.width() == 0 || src.height() == 0 {
            return;
        }

        for dest_y in 0..self.height() {
            for dest_x in 0..self.width() {
                let src_x = ((dest_x as f32 + 0.5) / self.width() as f32 * src.width() as f32)
                    as u32;
                let src_y = ((dest_y as f32 + 0.5) / self.height() as f32 * src.height() as f32)
                    as u32;

                let src_pix = src.get(src_x.min(src.width() - 1), src_y.min(src.height() - 1));
                let dest_pix = self.get(dest_x, dest_y);
                self.set(dest_x, dest_y, blend_alpha(dest_pix, src_pix));
            }
        }
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} Image", self.width(), self.height())
    }
}

fn blend_alpha(dest: Color, src: Color) -> Color {
    fn channel(dest: u8, src: u8, dest_alpha: f32, src_alpha: f32, result_alpha: f32) -> u8 {
        let v = (f32::from(src) * src_alpha + f32::from(dest) * dest_alpha * (1.0 - src_alpha))
            / result_alpha;
        v.round().clamp(0.0, 255.0) as u8
    }

    let src_alpha = f32::from(src.a()) / 255.0;
    let dest_alpha = f32::from(dest.a()) / 255.0;
    let result_alpha = src_alpha + dest_alpha * (1.0 - src_alpha);
    if result_alpha <= 0.0 {
        return Color::NULL;
    }

    Color([
        channel(dest.r(), src.r(), dest_alpha, src_alpha, result_alpha),
        channel(dest.g(), src.g(), dest_alpha, src_alpha, result_alpha),
        channel(dest.b(), src.b(), dest_alpha, src_alpha, result_alpha),
        (result_alpha * 255.0).round() as u8,
    ])
}

/// An 8-bit RGBA color.
///
/// Colors are always in the sRGB color space and use non-premultiplied alpha.
///
/// In configuration files, colors are written as `#rrggbb` or `#rrggbbaa` hex strings.
#[derive(PartialEq, Eq, Clone, Copy, Deserialize)]
#[serde(try_from = "String")]
pub struct Color(pub(crate) [u8; 4]);

impl Color {
    /// Fully transparent black (all components are 0).
    pub const NULL: Self = Self([0, 0, 0, 0]);
    pub const BLACK: Self = Self([0, 0, 0, 255]);
    pub const WHITE: Self = Self([255, 255, 255, 255]);
    pub const RED: Self = Self([255, 0, 0, 255]);
    pub const GREEN: Self = Self([0, 255, 0, 255]);
    pub const BLUE: Self = Self([0, 0, 255, 255]);

    #[inline]
    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 255])
    }

    #[inline]
    pub fn r(&self) -> u8 {
        self.0[0]
    }

    #[inline]
    pub fn g(&self) -> u8 {
        self.0[1]
    }

    #[inline]
    pub fn b(&self) -> u8 {
        self.0[2]
    }

    #[inline]
    pub fn a(&self) -> u8 {
        self.0[3]
    }

    pub fn with_alpha(mut self, a: u8) -> Color {
        self.0[3] = a;
        self
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02x}{:02x}{:02x}{:02x}",
            self.r(),
            self.g(),
            self.b(),
            self.a(),
        )
    }
}

/// Error returned when parsing a [`Color`] from a malformed hex string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color '{0}' (expected `#rrggbb` or `#rrggbbaa`)")]
pub struct ParseColorError(String);

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseColorError(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(err)?;
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(err());
        }

        let mut rgba = [255; 4];
        for (i, out) in rgba.iter_mut().enumerate().take(hex.len() / 2) {
            *out = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).map_err(|_| err())?;
        }
        Ok(Self(rgba))
    }
}

impl TryFrom<String> for Color {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// FIXME leaks `embedded-graphics` dependency
impl PixelColor for Color {
    type Raw = RawU32;
}
