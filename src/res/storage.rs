//! Backing stores for registered resources.

use std::fs;
use std::path::PathBuf;

use crate::errors::*;

pub trait Storage: Send + Sync + 'static {
    /// Persists `bytes` under the normalized `name`, and returns the location clients
    /// retrieve the content from.
    fn store(&self, name: &str, bytes: &[u8]) -> Result<String>;
}

/// Writes registered resources into `<root>/<prefix>/<name>` on the local host.
pub struct DiskStorage {
    root: PathBuf,
    prefix: String,
}

impl DiskStorage {
    pub fn new<T1, T2>(root: T1, prefix: T2) -> Result<Self>
    where
        T1: Into<PathBuf>,
        T2: Into<String>,
    {
        let root = root.into();
        let prefix = prefix.into();
        info!("Creates disk storage at {:?}/{}.", root, prefix);

        fs::create_dir_all(root.join(&prefix))?;
        Ok(DiskStorage { root, prefix })
    }

    /// Returns the path `name` is persisted at.
    #[inline]
    pub fn path(&self, name: &str) -> PathBuf {
        self.root.join(&self.prefix).join(name)
    }
}

impl Storage for DiskStorage {
    fn store(&self, name: &str, bytes: &[u8]) -> Result<String> {
        let path = self.path(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&path, bytes)?;
        Ok(format!("{}/{}", self.prefix, name))
    }
}

/// Keeps nothing but the location, the registry already holds the bytes in memory.
pub struct MemoryStorage {
    prefix: String,
}

impl MemoryStorage {
    pub fn new<T: Into<String>>(prefix: T) -> Self {
        MemoryStorage {
            prefix: prefix.into(),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        MemoryStorage::new("resources")
    }
}

impl Storage for MemoryStorage {
    fn store(&self, name: &str, _: &[u8]) -> Result<String> {
        Ok(format!("{}/{}", self.prefix, name))
    }
}
