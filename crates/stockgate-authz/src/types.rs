//! Strongly typed identifiers for identities and stock locations.
//!
//! # Purpose
//! Wraps raw strings and integers so location keys, location ids and identity
//! ids cannot be mixed up when they flow between the resolver, the directory
//! and the policy evaluator.
//!
//! # Key invariants
//! - Display and `as_str`/`get` return the original value unchanged.
//! - Location keys are compared exactly; normalization is the caller's job.
//!
//! # Examples
//! ```rust
//! use stockgate_authz::{LocationId, LocationKey};
//!
//! let key = LocationKey::new("renaissance");
//! let id = LocationId::new(2);
//! assert_eq!(format!("{key}#{id}"), "renaissance#2");
//! ```
use serde::{Deserialize, Serialize};

/// Identifier of the authenticated user carried by a session payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdentityId(String);

impl IdentityId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IdentityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Human-readable stock location key, as it appears in dashboard routes.
///
/// # Example
/// ```rust
/// use stockgate_authz::LocationKey;
///
/// let key = LocationKey::new("al-ouloum");
/// assert_eq!(key.as_str(), "al-ouloum");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationKey(String);

impl LocationKey {
    /// Construct a new location key wrapper.
    ///
    /// # Parameters
    /// - `value`: raw key string, e.g. `gros`.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the inner key string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for LocationKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LocationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Internal numeric stock location identifier.
///
/// # Summary
/// Newtype around the integer id stored in session payloads.
///
/// # Example
/// ```rust
/// use stockgate_authz::LocationId;
///
/// let id = LocationId::new(3);
/// assert_eq!(id.get(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(u64);

impl LocationId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for LocationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
