//! Lifecycle preconditions of image handles.
//!
//! Every operation on an image starts with one of these checks, so the rules live in a
//! single place:
//!
//! 1. A handle is only accepted by the image system that issued it.
//! 2. A disposed image can not be read or modified.
//! 3. A factory image can not be disposed.

use crate::errors::*;
use crate::utils::handle::Handle;
use crate::utils::object_pool::ObjectPool;

use super::image::{ImageEntry, ImageHandle, Origin};

/// Fails with `Error::InvalidArgument` if `handle` is nil or was issued by another system,
/// and with `Error::IllegalState` if it has been disposed.
pub(crate) fn alive(
    system: usize,
    images: &ObjectPool<Handle, ImageEntry>,
    handle: ImageHandle,
) -> Result<&ImageEntry> {
    owned(system, handle)?;
    images
        .get(handle.handle())
        .ok_or_else(|| Error::IllegalState(format!("{} is disposed", handle)))
}

/// Mutable counterpart of `alive`.
pub(crate) fn alive_mut(
    system: usize,
    images: &mut ObjectPool<Handle, ImageEntry>,
    handle: ImageHandle,
) -> Result<&mut ImageEntry> {
    owned(system, handle)?;
    images
        .get_mut(handle.handle())
        .ok_or_else(|| Error::IllegalState(format!("{} is disposed", handle)))
}

/// Fails with `Error::IllegalState` if `entry` is owned by the factory.
pub(crate) fn disposable(entry: &ImageEntry, handle: ImageHandle) -> Result<()> {
    if entry.origin == Origin::Factory {
        return Err(Error::IllegalState(format!(
            "{} is factory-created and can not be disposed",
            handle
        )));
    }

    Ok(())
}

fn owned(system: usize, handle: ImageHandle) -> Result<()> {
    if !handle.is_valid() {
        return Err(Error::InvalidArgument("image must not be nil".into()));
    }

    if handle.system() != system {
        return Err(Error::InvalidArgument(format!(
            "{} belongs to another image system",
            handle
        )));
    }

    Ok(())
}
