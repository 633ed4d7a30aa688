//! # ImageSystem
//!
//! The `ImageSystem` turns image sources into managed images, which are represented by
//! `ImageHandle`s. There are two ways to get an image:
//!
//! 1. `get_image` and its variants return a _factory_ image for a logical name. The name is
//! resolved into a fully-qualified key first, and there is at most one image per key. Asking
//! for the same key again returns the very same handle, without decoding anything.
//! 2. `construct` decodes a source directly into a new _user_ image. It bypasses the sharing
//! completely, so two images constructed from identical bytes are still two images.
//!
//! ## Registration
//!
//! The bytes of a factory image are published in the `ResourceRegistry` under the normalized
//! logical name it was requested with, e.g. `icons/close.gif`. If that name is already taken
//! by content of another key, the name is prefixed with a digest of the key. User images are
//! published under random names.
//!
//! ## Ownership & Lifetime
//!
//! Factory images are owned by the `ImageSystem` and live as long as it does. Trying to
//! dispose one fails and leaves it untouched. User images are disposed explicitly by their
//! creator, after which their handle is permanently unusable, even if the slot of the
//! arena is reused by another image.
//!
//! ## Concurrency
//!
//! The `ImageSystem` is meant to be shared between request threads with an `Arc`. Lookups of
//! already cached keys only take a read lock. The first request of a key takes the write lock
//! for the whole "check, decode, register and store" sequence, so a key is decoded exactly
//! once, no matter how many threads ask for it at the same time.

use std::fs;
use std::io::Read;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use uuid::Uuid;

use crate::errors::*;
use crate::res::location;
use crate::res::registry::ResourceRegistry;
use crate::res::vfs::{SearchPath, VFS};
use crate::utils::handle::Handle;
use crate::utils::hash::FastHashMap;
use crate::utils::object_pool::ObjectPool;
use crate::utils::rect::Rect;

use super::decoder::{ImageDecoder, StandardDecoder};
use super::device::{ColorHandle, Device, RGB};
use super::guard;
use super::image::{ImageEntry, ImageHandle, ImageSource, Origin};
use super::image_data::ImageData;

static SYSTEM_IDS: AtomicUsize = AtomicUsize::new(1);

struct Payload {
    images: ObjectPool<Handle, ImageEntry>,
    redirects: FastHashMap<String, ImageHandle>,
}

pub struct ImageSystem {
    id: usize,
    device: Device,
    registry: Arc<ResourceRegistry>,
    search_path: RwLock<SearchPath>,
    decoder: Box<dyn ImageDecoder>,
    payload: RwLock<Payload>,
}

impl ImageSystem {
    /// Creates a new `ImageSystem` with the default decoder.
    pub fn new(registry: Arc<ResourceRegistry>, search_path: SearchPath) -> Self {
        ImageSystem::with_decoder(registry, search_path, StandardDecoder::default())
    }

    /// Creates a new `ImageSystem` decoding with `decoder`.
    pub fn with_decoder<T: ImageDecoder>(
        registry: Arc<ResourceRegistry>,
        search_path: SearchPath,
        decoder: T,
    ) -> Self {
        let payload = Payload {
            images: ObjectPool::new(),
            redirects: FastHashMap::default(),
        };

        ImageSystem {
            id: SYSTEM_IDS.fetch_add(1, Ordering::Relaxed),
            device: Device::new(),
            registry,
            search_path: RwLock::new(search_path),
            decoder: Box::new(decoder),
            payload: RwLock::new(payload),
        }
    }

    /// Returns the id stamped into every handle issued by this system.
    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }

    /// Returns the device which owns all the factory images.
    #[inline]
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Returns the registry images are published to.
    #[inline]
    pub fn registry(&self) -> &Arc<ResourceRegistry> {
        &self.registry
    }

    /// Mounts a filesystem at the end of the default search path.
    pub fn mount<T, F>(&self, name: T, vfs: F) -> Result<()>
    where
        T: Into<String>,
        F: VFS,
    {
        recover(self.search_path.write()).mount(name, vfs)
    }

    /// Returns the factory image of `name`, which is looked up in the default search path.
    ///
    /// Fails with `Error::InvalidArgument` if `name` is empty, and with `Error::NotFound`
    /// if no filesystem of the search path contains it.
    pub fn get_image<T: AsRef<str>>(&self, name: T) -> Result<ImageHandle> {
        let name = location::normalize(name.as_ref())?;
        let (key, vfs) = recover(self.search_path.read())
            .locate(&name)
            .ok_or_else(|| Error::NotFound(name.clone()))?;

        self.shared(key, &name, || read_from(&*vfs, &name))
    }

    /// Returns the factory image of `name`, which is looked up in `vfs` only.
    pub fn get_image_with<T, F>(&self, name: T, vfs: &F) -> Result<ImageHandle>
    where
        T: AsRef<str>,
        F: VFS + ?Sized,
    {
        let name = location::normalize(name.as_ref())?;
        match vfs.locate(&name) {
            Some(key) => self.shared(key, &name, || read_from(vfs, &name)),
            None => Err(Error::UnsupportedFormat(format!(
                "{} yields no image content",
                name
            ))),
        }
    }

    /// Returns the factory image of `name`, decoding `stream` if `name` has not been
    /// requested before. Otherwise, `stream` is left untouched.
    pub fn get_image_from<T: AsRef<str>>(
        &self,
        name: T,
        stream: &mut dyn Read,
    ) -> Result<ImageHandle> {
        let name = location::normalize(name.as_ref())?;
        let key = format!("stream:{}", name);

        self.shared(key, &name, || {
            let mut bytes = Vec::new();
            stream.read_to_end(&mut bytes).map_err(|err| {
                Error::InvalidArgument(format!("stream of {} is unreadable: {}", name, err))
            })?;
            Ok(bytes)
        })
    }

    fn shared<F>(&self, key: String, name: &str, read: F) -> Result<ImageHandle>
    where
        F: FnOnce() -> Result<Vec<u8>>,
    {
        if let Some(&handle) = recover(self.payload.read()).redirects.get(&key) {
            trace!("Reuses {} for {}.", handle, key);
            return Ok(handle);
        }

        let mut payload = recover(self.payload.write());
        if let Some(&handle) = payload.redirects.get(&key) {
            return Ok(handle);
        }

        let bytes = read()?;
        let data = self.decoder.decode(&bytes)?;
        let resource = if self.registry.is_registered(name) {
            disambiguate(&key, name)
        } else {
            name.to_owned()
        };

        let location = self.registry.register_bytes(&resource, bytes)?;

        info!(
            "Creates factory image {} ({}x{}) at {}.",
            key,
            data.width(),
            data.height(),
            location
        );

        let entry = ImageEntry::new(
            Origin::Factory,
            self.device.clone(),
            data,
            resource,
            location,
        );

        let handle = ImageHandle::new(self.id, payload.images.create(entry));
        payload.redirects.insert(key, handle);
        Ok(handle)
    }

    /// Constructs a new user image owned by `device`, or by the current device of this
    /// thread if `device` is `None`.
    pub fn construct(&self, device: Option<&Device>, source: ImageSource) -> Result<ImageHandle> {
        let device = device.cloned().or_else(Device::current).ok_or_else(|| {
            Error::InvalidArgument("no device given, and no current device".into())
        })?;

        let (data, bytes) = match source {
            ImageSource::Stream(stream) => {
                let mut bytes = Vec::new();
                stream.read_to_end(&mut bytes).map_err(|err| {
                    Error::InvalidArgument(format!("image stream is unreadable: {}", err))
                })?;

                (self.decoder.decode(&bytes)?, bytes)
            }
            ImageSource::File(path) => {
                let bytes = fs::read(path).map_err(|err| {
                    Error::InvalidArgument(format!("{:?} is unreadable: {}", path, err))
                })?;

                (self.decoder.decode(&bytes)?, bytes)
            }
            ImageSource::Data(data) => (data.clone(), data.to_png()?),
            ImageSource::Image(handle, mode) => {
                let payload = recover(self.payload.read());
                let data = guard::alive(self.id, &payload.images, handle)?
                    .data
                    .transform(mode);
                drop(payload);

                let bytes = data.to_png()?;
                (data, bytes)
            }
        };

        let resource = Uuid::new_v4().to_simple().to_string();
        let location = self.registry.register_bytes(&resource, bytes)?;
        let entry = ImageEntry::new(Origin::User, device, data, resource, location);

        let handle = recover(self.payload.write()).images.create(entry);
        let handle = ImageHandle::new(self.id, handle);
        debug!("Constructs user image {}.", handle);
        Ok(handle)
    }

    /// Disposes a user image and releases its pixels.
    ///
    /// The registration of the image is kept, since clients might still fetch its content
    /// from the location. Registered content is never removed, so every constructed image
    /// adds a record to the `ResourceRegistry` for the lifetime of the registry.
    ///
    /// Fails with `Error::IllegalState` if `handle` is a factory image, or has been
    /// disposed already.
    pub fn dispose(&self, handle: ImageHandle) -> Result<()> {
        let mut payload = recover(self.payload.write());

        let entry = guard::alive(self.id, &payload.images, handle)?;
        if let Err(err) = guard::disposable(entry, handle) {
            warn!("Rejects disposal of {}.", handle);
            return Err(err);
        }

        payload.images.free(handle.handle());
        debug!("Disposes user image {}.", handle);
        Ok(())
    }

    /// Returns true if `handle` does not refer to a live image of this system.
    pub fn is_disposed(&self, handle: ImageHandle) -> bool {
        handle.system() != self.id
            || !recover(self.payload.read())
                .images
                .contains(handle.handle())
    }

    /// Returns a snapshot of the pixels of `handle`.
    pub fn image_data(&self, handle: ImageHandle) -> Result<ImageData> {
        self.with(handle, |v| v.data.clone())
    }

    /// Returns the bounds of `handle`, which are fixed when the image is created.
    pub fn bounds(&self, handle: ImageHandle) -> Result<Rect> {
        self.with(handle, |v| v.bounds)
    }

    pub fn origin(&self, handle: ImageHandle) -> Result<Origin> {
        self.with(handle, |v| v.origin)
    }

    pub fn image_device(&self, handle: ImageHandle) -> Result<Device> {
        self.with(handle, |v| v.device.clone())
    }

    /// Returns the name `handle` is registered under in the `ResourceRegistry`.
    pub fn resource_name(&self, handle: ImageHandle) -> Result<String> {
        self.with(handle, |v| v.resource.clone())
    }

    /// Returns the location clients retrieve the content of `handle` from.
    pub fn location(&self, handle: ImageHandle) -> Result<String> {
        self.with(handle, |v| v.location.clone())
    }

    /// Sets the color transparent pixels of `handle` are drawn with.
    ///
    /// Fails with `Error::IllegalState` if `handle` has been disposed, and with
    /// `Error::InvalidArgument` if `color` is nil, disposed, or belongs to another device.
    pub fn set_background(&self, handle: ImageHandle, color: ColorHandle) -> Result<()> {
        let mut payload = recover(self.payload.write());
        let entry = guard::alive_mut(self.id, &mut payload.images, handle)?;

        if !color.is_valid() {
            return Err(Error::InvalidArgument("color must not be nil".into()));
        }

        let rgb = entry.device.color(color).ok_or_else(|| {
            Error::InvalidArgument(format!("{} is disposed or of another device", color))
        })?;

        entry.background = Some(rgb);
        Ok(())
    }

    /// Returns the background color of `handle` if one has been set.
    pub fn background(&self, handle: ImageHandle) -> Result<Option<RGB>> {
        self.with(handle, |v| v.background)
    }

    /// Returns the number of live images.
    pub fn len(&self) -> usize {
        recover(self.payload.read()).images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn with<F, T>(&self, handle: ImageHandle, map: F) -> Result<T>
    where
        F: FnOnce(&ImageEntry) -> T,
    {
        let payload = recover(self.payload.read());
        let entry = guard::alive(self.id, &payload.images, handle)?;
        Ok(map(entry))
    }
}

fn read_from<F: VFS + ?Sized>(vfs: &F, name: &str) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    vfs.read_to_end(name, &mut bytes)?;
    Ok(bytes)
}

/// Prefixes `name` with a digest of `key`. Equal keys always produce equal names.
fn disambiguate(key: &str, name: &str) -> String {
    let uuid = Uuid::new_v5(&Uuid::NAMESPACE_URL, key.as_bytes());
    format!("{}/{}", uuid.to_simple(), name)
}
