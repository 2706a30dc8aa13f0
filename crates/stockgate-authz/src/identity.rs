//! Session payload parsing into a structured identity.
//!
//! # Purpose
//! Turns the opaque session text stored by the web client into an immutable
//! [`Identity`] and classifies every failure so the guard can pick the right
//! fallback and purge behavior.
//!
//! # Key invariants
//! - Operators and managers always carry an assigned location id.
//! - Parsing has no side effects; purging a corrupt payload is the caller's job.
//!
//! # Examples
//! ```rust
//! use stockgate_authz::{RoleKind, resolve};
//!
//! let identity = resolve(r#"{"id":"u-1","role":"operator","assignedLocationId":2}"#)
//!     .expect("identity");
//! assert_eq!(identity.role(), RoleKind::Operator);
//! assert_eq!(identity.assigned_location_id().map(|id| id.get()), Some(2));
//! ```
//!
//! # Common pitfalls
//! - Treating `Corrupt` like `Absent` without purging leaves a tampered
//!   payload in storage to be replayed on every request.
use crate::{IdentityError, IdentityId, IdentityResult, LocationId, RoleKind};
use serde::Serialize;
use serde_json::{Map, Value};

const FIELD_ID: &str = "id";
const FIELD_ROLE: &str = "role";
const FIELD_LOCATION: &str = "assignedLocationId";
const FIELD_LOCATION_ALIAS: &str = "stockId";

/// Authenticated identity for the duration of one access check.
///
/// # Invariants
/// - `assigned_location_id` is present whenever `role.requires_location()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    id: IdentityId,
    role: RoleKind,
    assigned_location_id: Option<LocationId>,
}

impl Identity {
    /// Build an identity, enforcing the role/location invariant.
    ///
    /// # Errors
    /// - [`IdentityError::Incomplete`] when a scoped role has no location.
    pub fn new(
        id: IdentityId,
        role: RoleKind,
        assigned_location_id: Option<LocationId>,
    ) -> IdentityResult<Self> {
        if role.requires_location() && assigned_location_id.is_none() {
            return Err(IdentityError::Incomplete(FIELD_LOCATION));
        }
        Ok(Self {
            id,
            role,
            assigned_location_id,
        })
    }

    pub fn id(&self) -> &IdentityId {
        &self.id
    }

    pub fn role(&self) -> RoleKind {
        self.role
    }

    pub fn assigned_location_id(&self) -> Option<LocationId> {
        self.assigned_location_id
    }
}

/// Parse a raw session payload.
///
/// # Errors
/// - [`IdentityError::Absent`] for empty or whitespace-only input.
/// - [`IdentityError::Corrupt`] when the text is not a JSON object or a field
///   has the wrong shape (including unknown role names).
/// - [`IdentityError::Incomplete`] when a required field is missing.
pub fn resolve(raw_payload: &str) -> IdentityResult<Identity> {
    let trimmed = raw_payload.trim();
    if trimmed.is_empty() {
        return Err(IdentityError::Absent);
    }

    let value: Value =
        serde_json::from_str(trimmed).map_err(|err| IdentityError::Corrupt(err.to_string()))?;
    let Value::Object(fields) = value else {
        return Err(IdentityError::Corrupt("payload is not an object".to_string()));
    };

    let id = parse_id(&fields)?;
    let role = parse_role(&fields)?;
    let assigned_location_id = parse_location(&fields)?;
    Identity::new(id, role, assigned_location_id)
}

fn parse_id(fields: &Map<String, Value>) -> IdentityResult<IdentityId> {
    match fields.get(FIELD_ID) {
        None | Some(Value::Null) => Err(IdentityError::Incomplete(FIELD_ID)),
        Some(Value::String(id)) if id.trim().is_empty() => {
            Err(IdentityError::Incomplete(FIELD_ID))
        }
        Some(Value::String(id)) => Ok(IdentityId::new(id.clone())),
        // Numeric ids come from older sessions written before ids were strings.
        Some(Value::Number(id)) if id.is_u64() || id.is_i64() => {
            Ok(IdentityId::new(id.to_string()))
        }
        Some(other) => Err(IdentityError::Corrupt(format!(
            "{FIELD_ID} has unexpected type: {other}"
        ))),
    }
}

fn parse_role(fields: &Map<String, Value>) -> IdentityResult<RoleKind> {
    match fields.get(FIELD_ROLE) {
        None | Some(Value::Null) => Err(IdentityError::Incomplete(FIELD_ROLE)),
        Some(Value::String(role)) => role
            .parse()
            .map_err(|_| IdentityError::Corrupt(format!("unknown role: {role}"))),
        Some(other) => Err(IdentityError::Corrupt(format!(
            "{FIELD_ROLE} has unexpected type: {other}"
        ))),
    }
}

fn parse_location(fields: &Map<String, Value>) -> IdentityResult<Option<LocationId>> {
    let raw = fields
        .get(FIELD_LOCATION)
        .filter(|value| !value.is_null())
        .or_else(|| fields.get(FIELD_LOCATION_ALIAS));
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(id)) => id.as_u64().map(|id| Some(LocationId::new(id))).ok_or_else(
            || IdentityError::Corrupt(format!("{FIELD_LOCATION} is not a location id: {id}")),
        ),
        Some(other) => Err(IdentityError::Corrupt(format!(
            "{FIELD_LOCATION} has unexpected type: {other}"
        ))),
    }
}
