//! Decoded, device-independent pixel data.

use std::io::{Cursor, Read};

use cgmath::Vector2;

use crate::errors::*;
use crate::utils::rect::Rect;

use super::decoder::{ImageDecoder, StandardDecoder};
use super::image::CopyMode;

/// A snapshot of decoded pixels in RGBA8 layout, row by row. `ImageData` is a plain value,
/// nothing done to one copy is visible through another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    dimensions: Vector2<u32>,
    pixels: Vec<u8>,
}

impl ImageData {
    /// Creates image data from raw RGBA8 pixels.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidArgument(format!(
                "image dimensions {}x{} must not be empty",
                width, height
            )));
        }

        let len = width as usize * height as usize * 4;
        if pixels.len() != len {
            return Err(Error::InvalidArgument(format!(
                "{}x{} image needs {} bytes of pixels, but got {}",
                width,
                height,
                len,
                pixels.len()
            )));
        }

        Ok(ImageData {
            dimensions: Vector2::new(width, height),
            pixels,
        })
    }

    /// Creates image data filled with a single color.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self> {
        let len = width as usize * height as usize;
        let pixels = rgba.iter().cloned().cycle().take(len * 4).collect();
        ImageData::new(width, height, pixels)
    }

    /// Decodes image data from an encoded stream, e.g. the content of a PNG file.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).map_err(|err| {
            Error::InvalidArgument(format!("image stream is unreadable: {}", err))
        })?;

        StandardDecoder::default().decode(&bytes)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.dimensions.x
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.dimensions.y
    }

    #[inline]
    pub fn dimensions(&self) -> Vector2<u32> {
        self.dimensions
    }

    /// Returns the bounds of this image, always located at origin.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::with_size(self.dimensions.x, self.dimensions.y)
    }

    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Returns the RGBA value of pixel at (`x`, `y`).
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.dimensions.x || y >= self.dimensions.y {
            return None;
        }

        let i = (y as usize * self.dimensions.x as usize + x as usize) * 4;
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }

    /// Produces the data of a copy made with `mode`.
    pub fn transform(&self, mode: CopyMode) -> ImageData {
        let mut pixels = self.pixels.clone();
        match mode {
            CopyMode::Copy => {}
            CopyMode::Gray => {
                for v in pixels.chunks_mut(4) {
                    let l = luminance(v);
                    v[0] = l;
                    v[1] = l;
                    v[2] = l;
                }
            }
            CopyMode::Disable => {
                for v in pixels.chunks_mut(4) {
                    // Halves the contrast and lifts it towards white.
                    let l = luminance(v) / 2 + 127;
                    v[0] = l;
                    v[1] = l;
                    v[2] = l;
                }
            }
        }

        ImageData {
            dimensions: self.dimensions,
            pixels,
        }
    }

    /// Encodes this image data as PNG.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let buffer = image::RgbaImage::from_raw(
            self.dimensions.x,
            self.dimensions.y,
            self.pixels.clone(),
        )
        .ok_or_else(|| Error::InvalidArgument("pixel buffer is truncated".into()))?;

        let mut cursor = Cursor::new(Vec::new());
        buffer
            .write_to(&mut cursor, image::ImageFormat::Png)
            .map_err(|err| {
                Error::IO(::std::io::Error::new(
                    ::std::io::ErrorKind::Other,
                    err.to_string(),
                ))
            })?;

        Ok(cursor.into_inner())
    }
}

#[inline]
fn luminance(rgba: &[u8]) -> u8 {
    let l = 299 * u32::from(rgba[0]) + 587 * u32::from(rgba[1]) + 114 * u32::from(rgba[2]);
    (l / 1000) as u8
}
