//! Validation and normalization of logical resource names.
//!
//! A logical name is a relative, slash separated path like `icons/close.gif`. Before it is
//! used to look anything up, it is normalized lexically: backslashes become slashes, empty
//! and `.` segments are dropped and `..` pops the previous segment. Names that would
//! escape their root are rejected.

use crate::errors::*;

/// Checks that `name` is usable as a logical name at all.
pub fn validate(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::InvalidArgument(
            "resource name must not be empty".into(),
        ));
    }

    Ok(())
}

/// Returns the normalized form of `name`.
pub fn normalize(name: &str) -> Result<String> {
    validate(name)?;

    let name = name.replace('\\', "/");
    let mut segments: Vec<&str> = Vec::new();
    for segment in name.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.pop().is_none() {
                    return Err(Error::InvalidArgument(format!(
                        "resource name {:?} escapes its root",
                        name
                    )));
                }
            }
            v => segments.push(v),
        }
    }

    if segments.is_empty() {
        return Err(Error::InvalidArgument(format!(
            "resource name {:?} does not name a file",
            name
        )));
    }

    Ok(segments.join("/"))
}
