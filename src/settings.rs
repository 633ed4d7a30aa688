//! Functions for loading settings.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::errors::*;

/// A structure containing configuration data for the resource layer, usually loaded once
/// when the application starts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub resource: ResourceParams,
    pub image: ImageParams,
}

impl Settings {
    /// Parses settings from JSON. Missing fields keep their defaults.
    pub fn from_json<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Loads settings from a JSON file.
    pub fn load<T: AsRef<Path>>(path: T) -> Result<Self> {
        let file = fs::File::open(path.as_ref())?;
        info!("Loads settings from {:?}.", path.as_ref());
        Settings::from_json(file)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceParams {
    /// Sets the directory registered resources are persisted into. Resources are kept in
    /// memory only if this is `None`.
    pub context_dir: Option<PathBuf>,
    /// Sets the name of the sub-directory below `context_dir`, which is also the prefix
    /// of resource locations.
    pub resources: String,
}

impl Default for ResourceParams {
    fn default() -> Self {
        ResourceParams {
            context_dir: None,
            resources: "resources".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageParams {
    /// Sets the directories images are looked up in, in order.
    pub search_path: Vec<PathBuf>,
    /// Sets the largest width or height of a decodable image.
    pub max_dimension: u32,
}

impl Default for ImageParams {
    fn default() -> Self {
        ImageParams {
            search_path: Vec::new(),
            max_dimension: 16384,
        }
    }
}
