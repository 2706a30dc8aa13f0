//! Access configuration: locations, route pattern sets and fallback paths.
//!
//! # Purpose
//! Keeps every deployment-specific literal out of the decision logic. The
//! defaults describe the three-store POS deployment; YAML files replace any
//! section without code changes.
//!
//! # Examples
//! ```rust
//! use stockgate_authz::AccessConfig;
//!
//! let config = AccessConfig::from_yaml_str(
//!     r#"
//! locations:
//!   - { key: north, id: 10 }
//!   - { key: south, id: 11 }
//! fallbacks:
//!   default_location: north
//! "#,
//! )
//! .expect("config");
//! assert_eq!(config.locations.len(), 2);
//! assert_eq!(config.routes.scoped_dashboard, "/dashboard/stock/{location}/cashier");
//! ```
//!
//! # Common pitfalls
//! - A `default_location` missing from `locations` is rejected when the guard
//!   is built, not when the YAML is parsed.
use crate::{ConfigError, ConfigResult, LocationEntry, LocationKey};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_TOP_LEVEL_FALLBACK: &str = "/login";
pub const DEFAULT_LOCATION_KEY: &str = "al-ouloum";
pub const DEFAULT_HOME_TEMPLATE: &str = "/dashboard/stock/{location}";
pub const DEFAULT_CASHIER_TEMPLATE: &str = "/dashboard/stock/{location}/cashier";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AccessConfig {
    pub locations: Vec<LocationEntry>,
    pub routes: RouteRules,
    pub fallbacks: FallbackRules,
    /// Reachable without any session, checked before identity resolution.
    pub public_prefixes: Vec<String>,
}

/// The pattern sets consumed by the route classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RouteRules {
    pub forbidden_prefixes: Vec<String>,
    pub scoped_dashboard: String,
    pub location_scope: Option<String>,
    pub allowed_prefixes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FallbackRules {
    pub top_level: String,
    pub default_location: LocationKey,
    pub home_template: String,
    pub cashier_template: String,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            locations: vec![
                LocationEntry::new("al-ouloum", 1),
                LocationEntry::new("renaissance", 2),
                LocationEntry::new("gros", 3),
            ],
            routes: RouteRules::default(),
            fallbacks: FallbackRules::default(),
            public_prefixes: vec![DEFAULT_TOP_LEVEL_FALLBACK.to_string()],
        }
    }
}

impl Default for RouteRules {
    fn default() -> Self {
        Self {
            forbidden_prefixes: vec![
                "/dashboard/users".to_string(),
                "/dashboard/settings".to_string(),
            ],
            scoped_dashboard: DEFAULT_CASHIER_TEMPLATE.to_string(),
            location_scope: Some(DEFAULT_HOME_TEMPLATE.to_string()),
            allowed_prefixes: vec![
                "/".to_string(),
                "/products".to_string(),
                "/invoices".to_string(),
                "/sales".to_string(),
            ],
        }
    }
}

impl Default for FallbackRules {
    fn default() -> Self {
        Self {
            top_level: DEFAULT_TOP_LEVEL_FALLBACK.to_string(),
            default_location: LocationKey::new(DEFAULT_LOCATION_KEY),
            home_template: DEFAULT_HOME_TEMPLATE.to_string(),
            cashier_template: DEFAULT_CASHIER_TEMPLATE.to_string(),
        }
    }
}

impl AccessConfig {
    pub fn from_yaml_str(contents: &str) -> ConfigResult<Self> {
        Ok(serde_yaml::from_str(contents)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&contents)
    }
}
