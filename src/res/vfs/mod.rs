//! Pluggable byte-source providers.
//!
//! A `VFS` resolves normalized logical names into bytes. Besides reading, it also tells the
//! fully-qualified key of a name, which is what the image cache shares images by. Two
//! different names that end up at the same underlying file therefore produce the same key.

pub mod directory;
pub use self::directory::Directory;

pub mod memory;
pub use self::memory::Memory;

use std::sync::Arc;

use smallvec::SmallVec;

use crate::errors::*;

pub trait VFS: Send + Sync + 'static {
    /// Returns the fully-qualified key of `name`, or `None` if this filesystem does not
    /// contain it.
    fn locate(&self, name: &str) -> Option<String>;

    /// Reads the whole content of `name` into `buf`.
    fn read_to_end(&self, name: &str, buf: &mut Vec<u8>) -> Result<usize>;

    /// Checks if the file exists.
    fn exists(&self, name: &str) -> bool {
        self.locate(name).is_some()
    }
}

impl<T: VFS + ?Sized> VFS for Arc<T> {
    #[inline]
    fn locate(&self, name: &str) -> Option<String> {
        (**self).locate(name)
    }

    #[inline]
    fn read_to_end(&self, name: &str, buf: &mut Vec<u8>) -> Result<usize> {
        (**self).read_to_end(name, buf)
    }
}

/// An ordered list of mounted filesystems. Lookups try the mounts in the order they were
/// added and stop at the first one which contains the name.
#[derive(Default)]
pub struct SearchPath {
    mounts: SmallVec<[(String, Arc<dyn VFS>); 4]>,
}

impl SearchPath {
    /// Creates an empty search path.
    pub fn new() -> Self {
        SearchPath {
            mounts: SmallVec::new(),
        }
    }

    /// Mounts a filesystem at the end of the search path.
    pub fn mount<T, F>(&mut self, name: T, vfs: F) -> Result<()>
    where
        T: Into<String>,
        F: VFS,
    {
        let name = name.into();
        if self.mounts.iter().any(|(v, _)| *v == name) {
            return Err(Error::InvalidArgument(format!(
                "virtual file system {} has been mounted already",
                name
            )));
        }

        info!("Mounts virtual file system {}.", name);
        self.mounts.push((name, Arc::new(vfs)));
        Ok(())
    }

    /// Checks if a filesystem with identifier `name` is mounted.
    #[inline]
    pub fn is_mounted(&self, name: &str) -> bool {
        self.mounts.iter().any(|(v, _)| v == name)
    }

    /// Finds the first filesystem containing `name`, and the key of `name` in it.
    pub fn locate(&self, name: &str) -> Option<(String, Arc<dyn VFS>)> {
        self.mounts
            .iter()
            .filter_map(|(_, vfs)| vfs.locate(name).map(|key| (key, vfs.clone())))
            .next()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.mounts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mounts.is_empty()
    }
}
