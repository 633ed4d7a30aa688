//! # Registry
//!
//! The `ResourceRegistry` keeps track of the byte content that has been published under
//! logical names. A client which renders a widget does not receive the bytes of an image
//! inline, it receives a location instead, and fetches the content from there.
//!
//! ## Immutability
//!
//! A name is registered at most once. Registering a name again is a no-op that returns the
//! location of the first registration, and does not even read the new source, since content
//! under a name never changes once it is published.
//!
//! ## Persistence
//!
//! The first registration of a name hands the bytes to a `Storage`, which might perform
//! I/O. Registration records live as long as the registry itself.

use std::io::Read;
use std::sync::{Arc, RwLock};

use crate::errors::*;
use crate::utils::hash::FastHashMap;

use super::location;
use super::storage::Storage;

/// A registration of byte content under a logical name.
#[derive(Debug, Clone)]
pub struct Record {
    name: String,
    location: String,
    bytes: Arc<Vec<u8>>,
    order: usize,
}

impl Record {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn location(&self) -> &str {
        &self.location
    }

    #[inline]
    pub fn bytes(&self) -> &Arc<Vec<u8>> {
        &self.bytes
    }

    /// Returns the position of this record in registration order.
    #[inline]
    pub fn order(&self) -> usize {
        self.order
    }
}

pub struct ResourceRegistry {
    storage: Box<dyn Storage>,
    records: RwLock<FastHashMap<String, Record>>,
}

impl ResourceRegistry {
    /// Creates a new and empty `ResourceRegistry` persisting into `storage`.
    pub fn new<T: Storage>(storage: T) -> Self {
        ResourceRegistry {
            storage: Box::new(storage),
            records: RwLock::new(FastHashMap::default()),
        }
    }

    /// Returns true if byte content has been stored under `name`.
    pub fn is_registered<T: AsRef<str>>(&self, name: T) -> bool {
        match location::normalize(name.as_ref()) {
            Ok(name) => recover(self.records.read()).contains_key(&name),
            Err(_) => false,
        }
    }

    /// Stores the content of `source` under `name` if it is not registered yet, and returns
    /// the location of the content.
    pub fn register<T, R>(&self, name: T, mut source: R) -> Result<String>
    where
        T: AsRef<str>,
        R: Read,
    {
        let name = location::normalize(name.as_ref())?;
        if let Some(record) = recover(self.records.read()).get(&name) {
            return Ok(record.location.clone());
        }

        let mut bytes = Vec::new();
        source.read_to_end(&mut bytes).map_err(|err| {
            Error::InvalidArgument(format!("source of {} is unreadable: {}", name, err))
        })?;

        self.insert(name, bytes)
    }

    /// Stores `bytes` under `name` if it is not registered yet, and returns the location of
    /// the content.
    pub fn register_bytes<T: AsRef<str>>(&self, name: T, bytes: Vec<u8>) -> Result<String> {
        let name = location::normalize(name.as_ref())?;
        self.insert(name, bytes)
    }

    fn insert(&self, name: String, bytes: Vec<u8>) -> Result<String> {
        let mut records = recover(self.records.write());
        if let Some(record) = records.get(&name) {
            if record.bytes.as_slice() != bytes.as_slice() {
                warn!(
                    "Ignores new content of {}, it has been registered already.",
                    name
                );
            }

            return Ok(record.location.clone());
        }

        let location = self.storage.store(&name, &bytes)?;
        info!("Registers {} ({} bytes) at {}.", name, bytes.len(), location);

        let record = Record {
            name: name.clone(),
            location: location.clone(),
            bytes: Arc::new(bytes),
            order: records.len(),
        };

        records.insert(name, record);
        Ok(location)
    }

    /// Resolves a registered name to the location of its content.
    pub fn content_path<T: AsRef<str>>(&self, name: T) -> Result<String> {
        self.record(name).map(|v| v.location)
    }

    /// Returns the content registered under `name`.
    pub fn read<T: AsRef<str>>(&self, name: T) -> Result<Arc<Vec<u8>>> {
        self.record(name).map(|v| v.bytes)
    }

    /// Returns the registration record of `name`.
    pub fn record<T: AsRef<str>>(&self, name: T) -> Result<Record> {
        let name = location::normalize(name.as_ref())?;
        recover(self.records.read())
            .get(&name)
            .cloned()
            .ok_or_else(|| Error::NotFound(name))
    }

    /// Returns all registered names in registration order.
    pub fn names(&self) -> Vec<String> {
        let guard = recover(self.records.read());
        let mut records: Vec<_> = guard.values().collect();
        records.sort_by_key(|v| v.order);
        records.into_iter().map(|v| v.name.clone()).collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        recover(self.records.read()).len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
