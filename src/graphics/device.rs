//! The owning rendering context of images and colors.
//!
//! A `Device` usually stands for the display of one UI session. Each thread can have a
//! current device, which is used whenever an image is constructed without an explicit one.

use std::cell::RefCell;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::errors::*;
use crate::utils::handle::Handle;
use crate::utils::object_pool::ObjectPool;

/// A color allocated on a `Device`. The default value is nil and refers to no color.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorHandle {
    device: usize,
    handle: Handle,
}

impl ColorHandle {
    #[inline]
    pub fn nil() -> Self {
        ColorHandle::default()
    }

    /// Returns true if this handle is not nil.
    #[inline]
    pub fn is_valid(self) -> bool {
        self.handle.is_valid()
    }
}

impl fmt::Display for ColorHandle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "ColorHandle ({}, {}, {})",
            self.device,
            self.handle.index(),
            self.handle.version()
        )
    }
}

/// A 24-bit color.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RGB {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl RGB {
    #[inline]
    pub fn new(red: u8, green: u8, blue: u8) -> Self {
        RGB { red, green, blue }
    }
}

impl From<[u8; 3]> for RGB {
    fn from(v: [u8; 3]) -> Self {
        RGB::new(v[0], v[1], v[2])
    }
}

static DEVICE_IDS: AtomicUsize = AtomicUsize::new(1);

thread_local! {
    static CURRENT: RefCell<Option<Device>> = RefCell::new(None);
}

struct DeviceShared {
    id: usize,
    colors: RwLock<ObjectPool<Handle, RGB>>,
}

/// A cheap, clonable reference to a rendering context. Clones refer to the same device.
#[derive(Clone)]
pub struct Device {
    shared: Arc<DeviceShared>,
}

impl Default for Device {
    fn default() -> Self {
        Device::new()
    }
}

impl Device {
    /// Creates a new device. The device does not become the current device of this thread
    /// until `make_current` is called.
    pub fn new() -> Self {
        let shared = DeviceShared {
            id: DEVICE_IDS.fetch_add(1, Ordering::Relaxed),
            colors: RwLock::new(ObjectPool::new()),
        };

        Device {
            shared: Arc::new(shared),
        }
    }

    /// Returns the current device of this thread.
    pub fn current() -> Option<Device> {
        CURRENT.with(|v| v.borrow().clone())
    }

    /// Makes this device the current device of this thread.
    pub fn make_current(&self) {
        CURRENT.with(|v| *v.borrow_mut() = Some(self.clone()));
    }

    /// Resets the current device of this thread.
    pub fn clear_current() {
        CURRENT.with(|v| *v.borrow_mut() = None);
    }

    #[inline]
    pub fn id(&self) -> usize {
        self.shared.id
    }

    /// Allocates a color on this device.
    pub fn create_color<T: Into<RGB>>(&self, rgb: T) -> ColorHandle {
        let handle = recover(self.shared.colors.write()).create(rgb.into());
        ColorHandle {
            device: self.shared.id,
            handle,
        }
    }

    /// Returns the value of a color, or `None` if it was disposed or belongs to another
    /// device.
    pub fn color(&self, handle: ColorHandle) -> Option<RGB> {
        if handle.device != self.shared.id {
            return None;
        }

        recover(self.shared.colors.read())
            .get(handle.handle)
            .cloned()
    }

    /// Releases a color. The handle becomes permanently unusable.
    pub fn dispose_color(&self, handle: ColorHandle) -> Result<()> {
        if handle.device != self.shared.id {
            return Err(Error::InvalidArgument(format!(
                "{} belongs to another device",
                handle
            )));
        }

        match recover(self.shared.colors.write()).free(handle.handle) {
            Some(_) => Ok(()),
            None => Err(Error::IllegalState(format!("{} is disposed", handle))),
        }
    }

    #[inline]
    pub fn is_color_disposed(&self, handle: ColorHandle) -> bool {
        self.color(handle).is_none()
    }
}

impl PartialEq for Device {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }
}

impl Eq for Device {}

impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Device ({})", self.shared.id)
    }
}
