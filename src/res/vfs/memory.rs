use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::errors::*;
use crate::res::location;
use crate::utils::hash::FastHashMap;

use super::VFS;

static MEMORY_IDS: AtomicUsize = AtomicUsize::new(1);

/// A filesystem which keeps its files in memory. Each instance has its own key space, so the
/// same name in two `Memory`s never shares an image.
pub struct Memory {
    id: usize,
    files: RwLock<FastHashMap<String, Arc<Vec<u8>>>>,
}

impl Default for Memory {
    fn default() -> Self {
        Memory::new()
    }
}

impl Memory {
    pub fn new() -> Self {
        Memory {
            id: MEMORY_IDS.fetch_add(1, Ordering::Relaxed),
            files: RwLock::new(FastHashMap::default()),
        }
    }

    /// Adds or replaces the file `name`.
    pub fn insert<T: Into<Vec<u8>>>(&self, name: &str, bytes: T) -> Result<()> {
        let name = location::normalize(name)?;
        recover(self.files.write()).insert(name, Arc::new(bytes.into()));
        Ok(())
    }
}

impl VFS for Memory {
    fn locate(&self, name: &str) -> Option<String> {
        if recover(self.files.read()).contains_key(name) {
            Some(format!("mem://{}/{}", self.id, name))
        } else {
            None
        }
    }

    fn read_to_end(&self, name: &str, buf: &mut Vec<u8>) -> Result<usize> {
        let bytes = recover(self.files.read())
            .get(name)
            .cloned()
            .ok_or_else(|| Error::NotFound(name.into()))?;

        buf.extend_from_slice(&bytes);
        Ok(bytes.len())
    }
}
