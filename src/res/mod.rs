//! The resource layer resolves logical names into bytes, and publishes bytes under logical
//! names.
//!
//! # Logical Name
//!
//! Resources are addressed with relative, slash separated names, e.g. `icons/close.gif`.
//! Names are normalized before use, see [`location`](location/index.html).
//!
//! # Virtual Filesystem (VFS)
//!
//! Bytes are read through pluggable `VFS`s. A trivial `Directory` is provided to support
//! the local host filesystem, and `Memory` for content compiled into or generated by the
//! application. A `SearchPath` chains several of them, much like a class path.
//!
//! Every `VFS` also tells the fully-qualified key of a name. For example, with a `Directory`
//! mounted at `/srv/app/images`, both of these names
//!
//! ```sh
//! "icons/close.gif"
//! "icons/../icons/./close.gif"
//! ```
//!
//! resolve into the key
//!
//! ```sh
//! "file:///srv/app/images/icons/close.gif"
//! ```
//!
//! # Registry
//!
//! The `ResourceRegistry` records what content has been published under which name, and
//! hands it to a `Storage` to make it retrievable by clients.

pub mod location;
pub mod registry;
pub mod storage;
pub mod vfs;

pub mod prelude {
    pub use super::registry::{Record, ResourceRegistry};
    pub use super::storage::{DiskStorage, MemoryStorage, Storage};
    pub use super::vfs::{Directory, Memory, SearchPath, VFS};
}
