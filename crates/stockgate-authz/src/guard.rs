//! Guard façade used by every entry point of the dashboard.
//!
//! # Purpose
//! Runs one access check end to end: identity resolution, public-path
//! shortcut, route classification and policy evaluation. Every failure is
//! turned into a [`GuardDecision`]; no error reaches the caller.
//!
//! # How it fits
//! Hosts fetch the session payload themselves, call [`Guard::authorize`], then
//! render on allow or redirect to the fallback on deny. When
//! `purge_session` is set they must clear the stored payload first.
//!
//! # Key invariants
//! - Construction fails unless every location's home path is allowed for the
//!   operator and manager who own it, so denies cannot loop.
//! - A corrupt payload is always purged, even on public paths.
//! - A `Guard` is immutable and can be shared across threads.
//!
//! # Examples
//! ```rust
//! use stockgate_authz::{AccessConfig, Guard, PolicyDecision};
//!
//! let guard = Guard::new(&AccessConfig::default()).expect("guard");
//! let outcome = guard.authorize("", "/products");
//! assert_eq!(outcome.decision, PolicyDecision::deny("/login"));
//! assert!(!outcome.purge_session);
//!
//! let outcome = guard.authorize("{broken", "/products");
//! assert!(outcome.purge_session);
//! ```
use crate::matcher::{normalize_path, prefix_matches};
use crate::{
    AccessConfig, ConfigError, ConfigResult, DenyReason, Identity, IdentityError, IdentityId,
    LocationDirectory, LocationKey, PolicyDecision, PolicyEvaluator, ResourceDescriptor,
    RoleKind, RouteClassifier, resolve,
};
use serde::Serialize;

/// Outcome of one access check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuardDecision {
    #[serde(flatten)]
    pub decision: PolicyDecision,
    pub purge_session: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<DenyReason>,
}

impl GuardDecision {
    fn allow() -> Self {
        Self {
            decision: PolicyDecision::Allow,
            purge_session: false,
            reason: None,
        }
    }

    pub fn is_allow(&self) -> bool {
        self.decision.is_allow()
    }
}

#[derive(Debug, Clone)]
pub struct Guard {
    classifier: RouteClassifier,
    evaluator: PolicyEvaluator,
    public_prefixes: Vec<String>,
    top_level_fallback: String,
}

impl Guard {
    /// Build a guard and verify the configuration as a whole.
    ///
    /// # Errors
    /// - Any [`ConfigError`] raised by the directory, classifier or evaluator.
    /// - [`ConfigError::UnreachableFallback`] when a home path would itself be
    ///   denied for its owner.
    pub fn new(config: &AccessConfig) -> ConfigResult<Self> {
        let directory = LocationDirectory::new(config.locations.clone())?;
        let evaluator = PolicyEvaluator::new(directory, &config.fallbacks)?;
        let classifier = RouteClassifier::new(&config.routes)?;

        let top_level_fallback = absolute_path(&config.fallbacks.top_level)?;
        let public_prefixes = config
            .public_prefixes
            .iter()
            .map(|prefix| absolute_path(prefix))
            .collect::<ConfigResult<Vec<_>>>()?;

        let guard = Self {
            classifier,
            evaluator,
            public_prefixes,
            top_level_fallback,
        };
        guard.verify_home_paths()?;
        if !guard.is_public(&guard.top_level_fallback) {
            tracing::warn!(
                fallback = %guard.top_level_fallback,
                "top-level fallback is not a public path; the host must serve it unguarded"
            );
        }
        Ok(guard)
    }

    pub fn directory(&self) -> &LocationDirectory {
        self.evaluator.directory()
    }

    pub fn top_level_fallback(&self) -> &str {
        &self.top_level_fallback
    }

    /// Decide whether the session in `raw_payload` may open `requested_path`.
    pub fn authorize(&self, raw_payload: &str, requested_path: &str) -> GuardDecision {
        let path = normalize_path(requested_path);
        let identity = resolve(raw_payload);
        if self.is_public(&path) {
            tracing::debug!(%path, "public path");
            return self.allow_public(&path, identity.err());
        }

        match identity {
            Ok(identity) => self.evaluate(&identity, &path),
            Err(err) => self.reject_session(&path, &err),
        }
    }

    /// Evaluate a route for an identity the host has already resolved.
    pub fn evaluate(&self, identity: &Identity, requested_path: &str) -> GuardDecision {
        let resource = self.classifier.classify(requested_path);
        self.evaluate_resource(identity, &resource)
    }

    /// Evaluate a location-bound resource with no route, such as a stock
    /// selector or a dashboard section.
    pub fn check_location(&self, identity: &Identity, location_key: &str) -> GuardDecision {
        let resource = ResourceDescriptor::for_location(
            format!("location:{location_key}"),
            LocationKey::new(location_key),
        );
        self.evaluate_resource(identity, &resource)
    }

    /// Where to send an identity after login or on deny.
    pub fn home_path(&self, identity: &Identity) -> String {
        self.evaluator.home_path(identity)
    }

    fn evaluate_resource(
        &self,
        identity: &Identity,
        resource: &ResourceDescriptor,
    ) -> GuardDecision {
        if identity.role().requires_location()
            && let Some(id) = identity.assigned_location_id()
            && !self.directory().contains_id(id)
        {
            tracing::warn!(
                identity = %identity.id(),
                location_id = %id,
                "session references a location outside the directory"
            );
            return self.deny_top_level(DenyReason::UnknownLocation, false);
        }

        let (decision, reason) = self.evaluator.evaluate_with_reason(identity, resource);
        GuardDecision {
            decision,
            purge_session: false,
            reason,
        }
    }

    fn allow_public(&self, path: &str, err: Option<IdentityError>) -> GuardDecision {
        let mut outcome = GuardDecision::allow();
        if let Some(err) = err.filter(IdentityError::requires_purge) {
            tracing::warn!(%path, error = %err, "purging corrupt session payload on public path");
            outcome.purge_session = true;
        }
        outcome
    }

    fn reject_session(&self, path: &str, err: &IdentityError) -> GuardDecision {
        let reason = match err {
            IdentityError::Absent => DenyReason::IdentityAbsent,
            IdentityError::Corrupt(_) => DenyReason::IdentityCorrupt,
            IdentityError::Incomplete(_) => DenyReason::IdentityIncomplete,
        };
        if err.requires_purge() {
            tracing::warn!(%path, error = %err, "rejecting corrupt session payload");
        } else {
            tracing::debug!(%path, error = %err, "no usable session");
        }
        self.deny_top_level(reason, err.requires_purge())
    }

    fn deny_top_level(&self, reason: DenyReason, purge_session: bool) -> GuardDecision {
        GuardDecision {
            decision: PolicyDecision::deny(self.top_level_fallback.clone()),
            purge_session,
            reason: Some(reason),
        }
    }

    fn is_public(&self, path: &str) -> bool {
        self.public_prefixes
            .iter()
            .any(|prefix| prefix_matches(prefix, path))
    }

    fn verify_home_paths(&self) -> ConfigResult<()> {
        for entry in self.directory().entries() {
            for role in [RoleKind::Operator, RoleKind::Manager] {
                let Ok(owner) = Identity::new(IdentityId::new("config-check"), role, Some(entry.id))
                else {
                    continue;
                };
                let path = self.home_path(&owner);
                let resource = self.classifier.classify(&path);
                if !self.evaluator.evaluate(&owner, &resource).is_allow() {
                    return Err(ConfigError::UnreachableFallback {
                        path,
                        role: role.as_str(),
                        location: entry.key.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

fn absolute_path(raw: &str) -> ConfigResult<String> {
    if !raw.starts_with('/') {
        return Err(ConfigError::InvalidPattern {
            pattern: raw.to_string(),
            reason: "path must start with '/'".to_string(),
        });
    }
    Ok(normalize_path(raw))
}
