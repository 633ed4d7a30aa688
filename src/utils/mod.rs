//! Commonly used utilities like handles, pools and so on.

pub mod handle;
pub mod handle_pool;
pub mod hash;
pub mod object_pool;
pub mod rect;

pub mod prelude {
    pub use super::handle::{Handle, HandleIndex, HandleLike};
    pub use super::handle_pool::HandlePool;
    pub use super::hash::{FastHashMap, FastHashSet};
    pub use super::object_pool::ObjectPool;
    pub use super::rect::Rect;
}
