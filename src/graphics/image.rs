//! Image handles and the sources images are constructed from.

use std::fmt;
use std::io::Read;
use std::path::Path;

use crate::errors::*;
use crate::utils::handle::Handle;
use crate::utils::rect::Rect;

use super::device::{Device, RGB};
use super::image_data::ImageData;

/// A managed image. A handle only refers to images of the `ImageSystem` that issued it.
/// The default value is nil and refers to no image.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ImageHandle {
    system: usize,
    handle: Handle,
}

impl ImageHandle {
    #[inline]
    pub(crate) fn new(system: usize, handle: Handle) -> Self {
        ImageHandle { system, handle }
    }

    #[inline]
    pub fn nil() -> Self {
        ImageHandle::default()
    }

    /// Returns true if this handle is not nil.
    #[inline]
    pub fn is_valid(self) -> bool {
        self.handle.is_valid()
    }

    /// Returns the id of the `ImageSystem` that issued this handle.
    #[inline]
    pub fn system(self) -> usize {
        self.system
    }

    #[inline]
    pub(crate) fn handle(self) -> Handle {
        self.handle
    }
}

impl fmt::Display for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "ImageHandle ({}, {}, {})",
            self.system,
            self.handle.index(),
            self.handle.version()
        )
    }
}

/// Who owns an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Origin {
    /// Created by the `ImageSystem` for a logical key, and shared by everyone asking for
    /// that key. It can never be disposed by its users.
    Factory,
    /// Constructed directly from a source. It is owned by its creator, who is responsible
    /// for disposing it.
    User,
}

/// How an image is derived from another image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CopyMode {
    /// An identical copy.
    Copy,
    /// A grayed out copy, usually used for disabled widgets.
    Disable,
    /// A grayscale copy.
    Gray,
}

impl CopyMode {
    pub const COPY: u32 = 0;
    pub const DISABLE: u32 = 1;
    pub const GRAY: u32 = 2;

    /// Parses a copy mode from its numeric flag.
    pub fn from_bits(bits: u32) -> Result<Self> {
        match bits {
            CopyMode::COPY => Ok(CopyMode::Copy),
            CopyMode::DISABLE => Ok(CopyMode::Disable),
            CopyMode::GRAY => Ok(CopyMode::Gray),
            v => Err(Error::InvalidArgument(format!(
                "unsupported copy mode {}",
                v
            ))),
        }
    }
}

/// The sources a user image can be constructed from.
pub enum ImageSource<'a> {
    /// An encoded byte stream. It is read to the end, but not closed.
    Stream(&'a mut dyn Read),
    /// An encoded image file on the local host.
    File(&'a Path),
    /// Decoded pixels, which are copied.
    Data(&'a ImageData),
    /// Another live image.
    Image(ImageHandle, CopyMode),
}

pub(crate) struct ImageEntry {
    pub origin: Origin,
    pub device: Device,
    pub data: ImageData,
    pub bounds: Rect,
    pub resource: String,
    pub location: String,
    pub background: Option<RGB>,
}

impl ImageEntry {
    pub fn new(
        origin: Origin,
        device: Device,
        data: ImageData,
        resource: String,
        location: String,
    ) -> Self {
        ImageEntry {
            origin,
            device,
            bounds: data.bounds(),
            data,
            resource,
            location,
            background: None,
        }
    }
}
