//! Stockgate access control for the point-of-sale dashboard.
//!
//! # Purpose
//! Decides, for a session payload and a requested path, whether the page may
//! be rendered and, if not, where the client must be redirected instead.
//!
//! # How it fits
//! Web handlers and client-side routers fetch the stored session payload and
//! call [`Guard::authorize`]. The guard resolves the identity, classifies the
//! route against configured pattern sets and asks the [`PolicyEvaluator`].
//! Enacting the decision (render, HTTP redirect, purge storage) stays with the
//! caller.
//!
//! # Key invariants
//! - Global admins are allowed everywhere; operators and managers are scoped
//!   to their assigned stock location.
//! - Operators only reach the cashier section of their own location.
//! - Every deny carries a fallback path its owner is allowed to open.
//!
//! # Important configuration
//! - [`AccessConfig`] holds the location directory, route pattern sets and
//!   fallback templates; none of them are hard-coded in the decision logic.
//!
//! # Examples
//! ```rust
//! use stockgate_authz::{AccessConfig, Guard, PolicyDecision};
//!
//! let guard = Guard::new(&AccessConfig::default()).expect("guard");
//! let session = r#"{"id":"u-7","role":"operator","assignedLocationId":2}"#;
//!
//! let outcome = guard.authorize(session, "/dashboard/stock/renaissance/cashier/sell");
//! assert_eq!(outcome.decision, PolicyDecision::Allow);
//!
//! let outcome = guard.authorize(session, "/dashboard/stock/al-ouloum/cashier/sell");
//! assert_eq!(
//!     outcome.decision,
//!     PolicyDecision::deny("/dashboard/stock/renaissance/cashier")
//! );
//! ```
//!
//! # Common pitfalls
//! - Ignoring `purge_session` keeps a tampered payload in storage.
//! - Serving the top-level fallback behind the guard without listing it in
//!   `public_prefixes` redirects anonymous users forever.

mod config;
mod directory;
mod errors;
mod guard;
mod identity;
mod matcher;
mod policy;
mod role;
mod route;
mod types;

pub use config::{
    AccessConfig, DEFAULT_CASHIER_TEMPLATE, DEFAULT_HOME_TEMPLATE, DEFAULT_LOCATION_KEY,
    DEFAULT_TOP_LEVEL_FALLBACK, FallbackRules, RouteRules,
};
pub use directory::{LocationDirectory, LocationEntry};
pub use errors::{
    ConfigError, ConfigResult, IdentityError, IdentityResult, LocationResult, UnknownLocation,
};
pub use guard::{Guard, GuardDecision};
pub use identity::{Identity, resolve};
pub use matcher::{RoutePattern, normalize_path, prefix_matches};
pub use policy::{DenyReason, PathTemplate, PolicyDecision, PolicyEvaluator};
pub use role::RoleKind;
pub use route::{ResourceDescriptor, RouteClass, RouteClassifier};
pub use types::{IdentityId, LocationId, LocationKey};
