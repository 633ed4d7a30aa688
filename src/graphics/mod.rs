//! Images, colors and fonts.

pub mod decoder;
pub mod device;
pub mod font;
pub mod image;
pub mod image_data;
pub mod system;

mod guard;

pub mod prelude {
    pub use super::decoder::{ImageDecoder, StandardDecoder};
    pub use super::device::{ColorHandle, Device, RGB};
    pub use super::font::{FontData, FontDataFactory, FontStyle};
    pub use super::image::{CopyMode, ImageHandle, ImageSource, Origin};
    pub use super::image_data::ImageData;
    pub use super::system::ImageSystem;
    pub use super::Graphics;
}

use std::sync::Arc;

use crate::errors::*;
use crate::res::registry::ResourceRegistry;
use crate::res::storage::{DiskStorage, MemoryStorage};
use crate::res::vfs::{Directory, SearchPath};
use crate::settings::Settings;

use self::decoder::StandardDecoder;
use self::font::{FontData, FontDataFactory};
use self::image::ImageHandle;
use self::system::ImageSystem;

/// Bundles the registry, the image cache and the font factory of an application. All the
/// parts are shared, so `Graphics` is cheap to clone and hand to other threads.
#[derive(Clone)]
pub struct Graphics {
    registry: Arc<ResourceRegistry>,
    images: Arc<ImageSystem>,
    fonts: Arc<FontDataFactory>,
}

impl Graphics {
    /// Creates the resource layer described by `settings`.
    pub fn new(settings: &Settings) -> Result<Self> {
        let params = &settings.resource;
        let registry = match params.context_dir {
            Some(ref dir) => ResourceRegistry::new(DiskStorage::new(dir, &*params.resources)?),
            None => ResourceRegistry::new(MemoryStorage::new(&*params.resources)),
        };

        let mut search_path = SearchPath::new();
        for (i, dir) in settings.image.search_path.iter().enumerate() {
            search_path.mount(format!("search-path-{}", i), Directory::new(dir)?)?;
        }

        let registry = Arc::new(registry);
        let decoder = StandardDecoder::new(settings.image.max_dimension);
        let images = ImageSystem::with_decoder(registry.clone(), search_path, decoder);

        Ok(Graphics {
            registry,
            images: Arc::new(images),
            fonts: Arc::new(FontDataFactory::new()),
        })
    }

    #[inline]
    pub fn registry(&self) -> &Arc<ResourceRegistry> {
        &self.registry
    }

    #[inline]
    pub fn images(&self) -> &Arc<ImageSystem> {
        &self.images
    }

    #[inline]
    pub fn fonts(&self) -> &Arc<FontDataFactory> {
        &self.fonts
    }

    /// Shortcut of `ImageSystem::get_image`.
    #[inline]
    pub fn image<T: AsRef<str>>(&self, name: T) -> Result<ImageHandle> {
        self.images.get_image(name)
    }

    /// Shortcut of `FontDataFactory::find_font_data`.
    #[inline]
    pub fn font_data(&self, data: &FontData) -> Result<Arc<FontData>> {
        self.fonts.find_font_data(data)
    }
}
