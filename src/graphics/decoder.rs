use crate::errors::*;

use super::image_data::ImageData;

/// Turns encoded bytes into pixels.
pub trait ImageDecoder: Send + Sync + 'static {
    /// Decodes `bytes`, failing with `Error::UnsupportedFormat` if they are not an image
    /// of any known encoding.
    fn decode(&self, bytes: &[u8]) -> Result<ImageData>;
}

/// The default decoder, which understands PNG, GIF, BMP and JPEG.
#[derive(Debug, Clone, Copy)]
pub struct StandardDecoder {
    max_dimension: u32,
}

impl Default for StandardDecoder {
    fn default() -> Self {
        StandardDecoder {
            max_dimension: 16384,
        }
    }
}

impl StandardDecoder {
    /// Creates a decoder rejecting images wider or taller than `max_dimension`.
    pub fn new(max_dimension: u32) -> Self {
        StandardDecoder { max_dimension }
    }
}

impl ImageDecoder for StandardDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<ImageData> {
        let format = image::guess_format(bytes)
            .map_err(|_| Error::UnsupportedFormat("unknown image encoding".into()))?;

        let dynamic = image::load_from_memory_with_format(bytes, format)
            .map_err(|err| Error::UnsupportedFormat(format!("{:?}: {}", format, err)))?;

        let rgba = dynamic.to_rgba8();
        let (width, height) = rgba.dimensions();
        if width > self.max_dimension || height > self.max_dimension {
            return Err(Error::UnsupportedFormat(format!(
                "{}x{} exceeds the maximum dimension {}",
                width, height, self.max_dimension
            )));
        }

        trace!("Decodes {:?} image ({}x{}).", format, width, height);
        ImageData::new(width, height, rgba.into_raw())
    }
}
