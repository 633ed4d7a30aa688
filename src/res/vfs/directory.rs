use std::fs;
use std::io::Read;
use std::path::PathBuf;

use crate::errors::*;

use super::VFS;

/// A filesystem backed by a directory of the local host.
pub struct Directory {
    root: PathBuf,
}

impl Directory {
    pub fn new<T: Into<PathBuf>>(root: T) -> Result<Self> {
        let root = root.into();
        info!("Creates directory based virtual file system at {:?}.", root);

        let metadata = fs::metadata(&root)?;
        if metadata.is_dir() {
            Ok(Directory {
                root: fs::canonicalize(&root)?,
            })
        } else {
            Err(Error::InvalidArgument(format!(
                "{:?} is not a readable directory",
                root
            )))
        }
    }

    #[inline]
    pub fn root(&self) -> &PathBuf {
        &self.root
    }
}

impl VFS for Directory {
    fn locate(&self, name: &str) -> Option<String> {
        let path = self.root.join(name);
        if !path.is_file() {
            return None;
        }

        // Symlinks are followed, so aliases of one file share a key.
        fs::canonicalize(&path)
            .ok()
            .map(|v| format!("file://{}", v.display()))
    }

    fn read_to_end(&self, name: &str, buf: &mut Vec<u8>) -> Result<usize> {
        let location = self.root.join(name);
        let mut file = fs::File::open(&location)?;
        let len = file.read_to_end(buf)?;
        Ok(len)
    }
}
