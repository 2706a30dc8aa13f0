//! Route classification.
//!
//! # Purpose
//! Maps a request path to a [`ResourceDescriptor`] the policy evaluator can
//! reason about, using the configured pattern sets.
//!
//! # Key invariants
//! - Priority is fixed: forbidden > scoped dashboard > location scope >
//!   allowed > unclassified.
//! - Only the scoped dashboard (cashier) pattern yields operator-safe
//!   resources.
//!
//! # Examples
//! ```rust
//! use stockgate_authz::{RouteClass, RouteClassifier, RouteRules};
//!
//! let classifier = RouteClassifier::new(&RouteRules::default()).expect("classifier");
//! let resource = classifier.classify("/dashboard/stock/gros/cashier/sell");
//! assert_eq!(resource.class, RouteClass::OperatorSafe);
//! assert_eq!(resource.requested_location_key.unwrap().as_str(), "gros");
//! ```
use crate::matcher::{normalize_path, prefix_matches};
use crate::{ConfigError, ConfigResult, LocationKey, RoutePattern, RouteRules};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteClass {
    /// Matched a forbidden prefix.
    Forbidden,
    /// The cashier section of one location.
    OperatorSafe,
    /// Any other section of one location's dashboard.
    LocationScoped,
    /// Matched an allowed prefix.
    Allowed,
    Unclassified,
}

impl RouteClass {
    pub fn as_str(self) -> &'static str {
        match self {
            RouteClass::Forbidden => "forbidden",
            RouteClass::OperatorSafe => "operator_safe",
            RouteClass::LocationScoped => "location_scoped",
            RouteClass::Allowed => "allowed",
            RouteClass::Unclassified => "unclassified",
        }
    }
}

/// What a single access check is asking for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceDescriptor {
    pub requested_path: String,
    pub requested_location_key: Option<LocationKey>,
    pub class: RouteClass,
}

impl ResourceDescriptor {
    /// Descriptor for a location-bound resource that has no route of its own,
    /// such as a stock selector or a UI section.
    pub fn for_location(requested_path: impl Into<String>, key: LocationKey) -> Self {
        Self {
            requested_path: requested_path.into(),
            requested_location_key: Some(key),
            class: RouteClass::LocationScoped,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RouteClassifier {
    forbidden_prefixes: Vec<String>,
    scoped_dashboard: RoutePattern,
    location_scope: Option<RoutePattern>,
    allowed_prefixes: Vec<String>,
}

impl RouteClassifier {
    pub fn new(rules: &RouteRules) -> ConfigResult<Self> {
        Ok(Self {
            forbidden_prefixes: parse_prefixes(&rules.forbidden_prefixes)?,
            scoped_dashboard: RoutePattern::parse(&rules.scoped_dashboard)?,
            location_scope: rules
                .location_scope
                .as_deref()
                .map(RoutePattern::parse)
                .transpose()?,
            allowed_prefixes: parse_prefixes(&rules.allowed_prefixes)?,
        })
    }

    pub fn classify(&self, path: &str) -> ResourceDescriptor {
        let requested_path = normalize_path(path);
        let (class, requested_location_key) = self.classify_normalized(&requested_path);
        ResourceDescriptor {
            requested_path,
            requested_location_key,
            class,
        }
    }

    fn classify_normalized(&self, path: &str) -> (RouteClass, Option<LocationKey>) {
        if self.forbidden_prefixes.iter().any(|p| prefix_matches(p, path)) {
            return (RouteClass::Forbidden, None);
        }
        if let Some(key) = self.scoped_dashboard.match_path(path) {
            return (RouteClass::OperatorSafe, Some(key));
        }
        if let Some(key) = self
            .location_scope
            .as_ref()
            .and_then(|pattern| pattern.match_path(path))
        {
            return (RouteClass::LocationScoped, Some(key));
        }
        if self.allowed_prefixes.iter().any(|p| prefix_matches(p, path)) {
            return (RouteClass::Allowed, None);
        }
        (RouteClass::Unclassified, None)
    }
}

fn parse_prefixes(raw: &[String]) -> ConfigResult<Vec<String>> {
    raw.iter()
        .map(|prefix| {
            if !prefix.starts_with('/') {
                return Err(ConfigError::InvalidPattern {
                    pattern: prefix.clone(),
                    reason: "prefix must start with '/'".to_string(),
                });
            }
            Ok(normalize_path(prefix))
        })
        .collect()
}
