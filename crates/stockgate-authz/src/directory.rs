//! Bidirectional stock location directory.
//!
//! # Purpose
//! Maps dashboard location keys (`renaissance`) to the numeric ids stored in
//! session payloads (`2`) and back.
//!
//! # Key invariants
//! - Keys and ids are unique; construction rejects duplicates, so reverse
//!   lookup is deterministic.
//! - Unknown lookups fail with [`UnknownLocation`]; nothing is defaulted here.
//!
//! # Examples
//! ```rust
//! use stockgate_authz::{LocationDirectory, LocationEntry, LocationId, LocationKey};
//!
//! let directory = LocationDirectory::new(vec![
//!     LocationEntry::new("al-ouloum", 1),
//!     LocationEntry::new("renaissance", 2),
//! ])
//! .expect("directory");
//! assert_eq!(directory.key_to_id("renaissance"), Ok(LocationId::new(2)));
//! assert_eq!(directory.id_to_key(LocationId::new(1)), Ok(&LocationKey::new("al-ouloum")));
//! ```
use crate::{ConfigError, ConfigResult, LocationId, LocationKey, LocationResult, UnknownLocation};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One configured `(key, id)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationEntry {
    pub key: LocationKey,
    pub id: LocationId,
}

impl LocationEntry {
    pub fn new(key: impl Into<String>, id: u64) -> Self {
        Self {
            key: LocationKey::new(key),
            id: LocationId::new(id),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LocationDirectory {
    entries: Vec<LocationEntry>,
    by_key: HashMap<LocationKey, LocationId>,
    by_id: HashMap<LocationId, LocationKey>,
}

impl LocationDirectory {
    /// Build the directory from configured entries.
    ///
    /// # Errors
    /// - [`ConfigError::EmptyLocationKey`] for blank keys.
    /// - [`ConfigError::DuplicateLocationKey`] / [`ConfigError::DuplicateLocationId`]
    ///   when the mapping would not be injective.
    pub fn new(entries: Vec<LocationEntry>) -> ConfigResult<Self> {
        let mut by_key = HashMap::with_capacity(entries.len());
        let mut by_id: HashMap<LocationId, LocationKey> = HashMap::with_capacity(entries.len());
        for entry in &entries {
            if entry.key.as_str().trim().is_empty() {
                return Err(ConfigError::EmptyLocationKey(entry.id));
            }
            if by_key.insert(entry.key.clone(), entry.id).is_some() {
                return Err(ConfigError::DuplicateLocationKey(entry.key.clone()));
            }
            if let Some(first) = by_id.insert(entry.id, entry.key.clone()) {
                return Err(ConfigError::DuplicateLocationId {
                    id: entry.id,
                    first,
                    second: entry.key.clone(),
                });
            }
        }
        Ok(Self {
            entries,
            by_key,
            by_id,
        })
    }

    pub fn key_to_id(&self, key: &str) -> LocationResult<LocationId> {
        self.by_key
            .get(key)
            .copied()
            .ok_or_else(|| UnknownLocation::Key(LocationKey::new(key)))
    }

    pub fn id_to_key(&self, id: LocationId) -> LocationResult<&LocationKey> {
        self.by_id.get(&id).ok_or(UnknownLocation::Id(id))
    }

    pub fn contains_key(&self, key: &LocationKey) -> bool {
        self.by_key.contains_key(key)
    }

    pub fn contains_id(&self, id: LocationId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> &[LocationEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
