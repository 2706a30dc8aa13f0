//! The single authoritative access decision.
//!
//! # Purpose
//! Decides whether an [`Identity`] may reach a [`ResourceDescriptor`] and,
//! when it may not, which path to send it to instead.
//!
//! # How it fits
//! The guard classifies the route and calls [`PolicyEvaluator::evaluate`];
//! hosts that already hold an identity may call it directly.
//!
//! # Key invariants
//! - Global admins are always allowed.
//! - A deny always carries a fallback, and the fallback is allowed for the
//!   identity it was computed for (the guard checks this at startup).
//! - Unknown locations never cascade: the fallback uses the configured
//!   default location key.
//!
//! # Examples
//! ```rust
//! use stockgate_authz::{
//!     AccessConfig, Identity, IdentityId, LocationDirectory, LocationId, PolicyDecision,
//!     PolicyEvaluator, RoleKind, RouteClassifier,
//! };
//!
//! let config = AccessConfig::default();
//! let directory = LocationDirectory::new(config.locations.clone()).expect("directory");
//! let evaluator = PolicyEvaluator::new(directory, &config.fallbacks).expect("evaluator");
//! let classifier = RouteClassifier::new(&config.routes).expect("classifier");
//! let operator = Identity::new(IdentityId::new("u"), RoleKind::Operator, Some(LocationId::new(2)))
//!     .expect("identity");
//!
//! let decision = evaluator.evaluate(&operator, &classifier.classify("/products/42"));
//! assert_eq!(decision, PolicyDecision::deny("/dashboard/stock/renaissance/cashier"));
//! ```
use crate::{
    ConfigError, ConfigResult, FallbackRules, Identity, LocationDirectory, LocationKey,
    ResourceDescriptor, RoleKind, RouteClass, matcher::LOCATION_PLACEHOLDER,
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum PolicyDecision {
    Allow,
    Deny { fallback_path: String },
}

impl PolicyDecision {
    pub fn deny(fallback_path: impl Into<String>) -> Self {
        PolicyDecision::Deny {
            fallback_path: fallback_path.into(),
        }
    }

    pub fn is_allow(&self) -> bool {
        matches!(self, PolicyDecision::Allow)
    }

    pub fn fallback_path(&self) -> Option<&str> {
        match self {
            PolicyDecision::Allow => None,
            PolicyDecision::Deny { fallback_path } => Some(fallback_path),
        }
    }
}

/// Why a check ended in a deny. Carried for logs and diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    IdentityAbsent,
    IdentityCorrupt,
    IdentityIncomplete,
    UnknownLocation,
    LocationMismatch,
    OperatorRestricted,
    Unclassified,
}

impl DenyReason {
    pub fn as_str(self) -> &'static str {
        match self {
            DenyReason::IdentityAbsent => "identity_absent",
            DenyReason::IdentityCorrupt => "identity_corrupt",
            DenyReason::IdentityIncomplete => "identity_incomplete",
            DenyReason::UnknownLocation => "unknown_location",
            DenyReason::LocationMismatch => "location_mismatch",
            DenyReason::OperatorRestricted => "operator_restricted",
            DenyReason::Unclassified => "unclassified",
        }
    }
}

impl std::fmt::Display for DenyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A path with one `{location}` placeholder, e.g. `/dashboard/stock/{location}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate(String);

impl PathTemplate {
    pub fn parse(raw: &str) -> ConfigResult<Self> {
        let invalid = |reason: &str| ConfigError::InvalidTemplate {
            template: raw.to_string(),
            reason: reason.to_string(),
        };
        if !raw.starts_with('/') {
            return Err(invalid("template must start with '/'"));
        }
        match raw.matches(LOCATION_PLACEHOLDER).count() {
            1 => Ok(Self(raw.to_string())),
            0 => Err(invalid("missing {location} placeholder")),
            _ => Err(invalid("more than one {location} placeholder")),
        }
    }

    pub fn render(&self, key: &LocationKey) -> String {
        self.0.replace(LOCATION_PLACEHOLDER, key.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct PolicyEvaluator {
    directory: LocationDirectory,
    default_location: LocationKey,
    home: PathTemplate,
    cashier: PathTemplate,
}

impl PolicyEvaluator {
    /// Build an evaluator over a directory and the fallback rules.
    ///
    /// # Errors
    /// - [`ConfigError::UnknownDefaultLocation`] if the default key is not in
    ///   the directory.
    /// - [`ConfigError::InvalidTemplate`] for malformed home/cashier templates.
    pub fn new(directory: LocationDirectory, fallbacks: &FallbackRules) -> ConfigResult<Self> {
        if !directory.contains_key(&fallbacks.default_location) {
            return Err(ConfigError::UnknownDefaultLocation(
                fallbacks.default_location.clone(),
            ));
        }
        Ok(Self {
            directory,
            default_location: fallbacks.default_location.clone(),
            home: PathTemplate::parse(&fallbacks.home_template)?,
            cashier: PathTemplate::parse(&fallbacks.cashier_template)?,
        })
    }

    pub fn directory(&self) -> &LocationDirectory {
        &self.directory
    }

    pub fn evaluate(&self, identity: &Identity, resource: &ResourceDescriptor) -> PolicyDecision {
        self.evaluate_with_reason(identity, resource).0
    }

    /// Same as [`evaluate`](Self::evaluate) but keeps the deny reason.
    pub fn evaluate_with_reason(
        &self,
        identity: &Identity,
        resource: &ResourceDescriptor,
    ) -> (PolicyDecision, Option<DenyReason>) {
        match self.check(identity, resource) {
            Ok(()) => {
                tracing::debug!(
                    path = %resource.requested_path,
                    role = %identity.role(),
                    class = resource.class.as_str(),
                    "access allowed"
                );
                (PolicyDecision::Allow, None)
            }
            Err(reason) => {
                let fallback_path = self.home_path(identity);
                tracing::debug!(
                    path = %resource.requested_path,
                    role = %identity.role(),
                    class = resource.class.as_str(),
                    %reason,
                    fallback = %fallback_path,
                    "access denied"
                );
                (PolicyDecision::Deny { fallback_path }, Some(reason))
            }
        }
    }

    /// The path an identity is sent to when denied.
    ///
    /// Operators land on their cashier; everyone else on the location home.
    pub fn home_path(&self, identity: &Identity) -> String {
        let key = self.home_location(identity);
        match identity.role() {
            RoleKind::Operator => self.cashier.render(key),
            RoleKind::Manager | RoleKind::GlobalAdmin => self.home.render(key),
        }
    }

    fn home_location(&self, identity: &Identity) -> &LocationKey {
        identity
            .assigned_location_id()
            .and_then(|id| self.directory.id_to_key(id).ok())
            .unwrap_or(&self.default_location)
    }

    fn check(&self, identity: &Identity, resource: &ResourceDescriptor) -> Result<(), DenyReason> {
        let role = identity.role();
        if role == RoleKind::GlobalAdmin {
            return Ok(());
        }

        if let Some(key) = &resource.requested_location_key {
            let required = self
                .directory
                .key_to_id(key.as_str())
                .map_err(|_| DenyReason::UnknownLocation)?;
            if identity.assigned_location_id() != Some(required) {
                return Err(DenyReason::LocationMismatch);
            }
        }

        match (role, resource.class) {
            (RoleKind::Operator, RouteClass::OperatorSafe) => Ok(()),
            (RoleKind::Operator, _) => Err(DenyReason::OperatorRestricted),
            (_, RouteClass::Unclassified) => Err(DenyReason::Unclassified),
            _ => Ok(()),
        }
    }
}
