//! # What is This?
//!
//! _pigment_ is the resource layer of a server-side widget toolkit. It turns external image
//! sources, byte streams, files, in-memory pixel data or other images, into uniquely identified
//! and shared graphic resources, and keeps small descriptor values like fonts deduplicated.
//!
//! The central pieces are:
//!
//! 1. The [`ResourceRegistry`](res/registry/struct.ResourceRegistry.html), which tracks what
//! byte content has been published under which logical name.
//! 2. The [`ImageSystem`](graphics/system/struct.ImageSystem.html), which hands out factory
//! images shared by logical key, and user images which are owned by their creator.
//! 3. The [`FontDataFactory`](graphics/font/struct.FontDataFactory.html), which interns font
//! descriptors.
//!
//! Everything is explicitly constructed, usually through the [`Graphics`](graphics/struct.Graphics.html)
//! facade, and shared between request threads with `Arc`.

#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde;

pub mod utils;
pub mod errors;
pub mod graphics;
pub mod res;
pub mod settings;

pub mod prelude {
    pub use crate::errors::{Error, Result};
    pub use crate::graphics::prelude::*;
    pub use crate::res::prelude::*;
    pub use crate::settings::{ImageParams, ResourceParams, Settings};
    pub use crate::utils::prelude::*;
}
