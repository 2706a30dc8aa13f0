use crate::{LocationId, LocationKey};
use thiserror::Error;

/// Why a raw session payload could not become an [`Identity`](crate::Identity).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("no session payload")]
    Absent,
    #[error("session payload is corrupt: {0}")]
    Corrupt(String),
    #[error("session payload is missing {0}")]
    Incomplete(&'static str),
}

impl IdentityError {
    /// Corrupt payloads are treated as tampering; the stored copy must go.
    pub fn requires_purge(&self) -> bool {
        matches!(self, IdentityError::Corrupt(_))
    }
}

/// A location directory lookup that matched no entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnknownLocation {
    #[error("unknown location key: {0}")]
    Key(LocationKey),
    #[error("unknown location id: {0}")]
    Id(LocationId),
}

/// Invalid access configuration. Only raised while building a guard.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("duplicate location key: {0}")]
    DuplicateLocationKey(LocationKey),
    #[error("duplicate location id {id} (keys {first} and {second})")]
    DuplicateLocationId {
        id: LocationId,
        first: LocationKey,
        second: LocationKey,
    },
    #[error("empty location key for id {0}")]
    EmptyLocationKey(LocationId),
    #[error("default location is not in the directory: {0}")]
    UnknownDefaultLocation(LocationKey),
    #[error("invalid route pattern {pattern}: {reason}")]
    InvalidPattern { pattern: String, reason: String },
    #[error("invalid path template {template}: {reason}")]
    InvalidTemplate { template: String, reason: String },
    #[error("fallback {path} is not reachable for {role} at {location}")]
    UnreachableFallback {
        path: String,
        role: &'static str,
        location: LocationKey,
    },
    #[error("read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parse config yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type IdentityResult<T> = Result<T, IdentityError>;
pub type LocationResult<T> = Result<T, UnknownLocation>;
pub type ConfigResult<T> = Result<T, ConfigError>;
