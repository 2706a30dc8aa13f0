//! Path normalization and the matching primitives used by the route classifier.
//!
//! # Key invariants
//! - Every matcher operates on normalized paths (see [`normalize_path`]).
//! - Prefixes match whole segments only; `/` matches nothing but the root.
//! - A [`RoutePattern`] captures exactly one `{location}` segment.
use crate::{ConfigError, ConfigResult, LocationKey};
use std::borrow::Cow;

pub const LOCATION_PLACEHOLDER: &str = "{location}";

/// Canonical form of a request path.
///
/// Drops query string and fragment, percent-decodes once, treats backslashes
/// as separators, resolves `.` and `..` segments, collapses repeated slashes and
/// removes the trailing slash. An empty path becomes `/`; `..` never climbs
/// above the root.
pub fn normalize_path(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let decoded = urlencoding::decode(path).unwrap_or(Cow::Borrowed(path));

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }
    if segments.is_empty() {
        return "/".to_string();
    }
    let mut normalized = String::with_capacity(path.len());
    for segment in segments {
        normalized.push('/');
        normalized.push_str(segment);
    }
    normalized
}

/// Segment-aware prefix test on normalized paths.
pub fn prefix_matches(prefix: &str, path: &str) -> bool {
    if prefix == "/" {
        return path == "/";
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Exact(String),
    Location,
}

/// Structural route pattern such as `/dashboard/stock/{location}/cashier`.
///
/// Matches any path that starts with the pattern's segments; trailing
/// segments after the pattern are allowed.
///
/// # Example
/// ```rust
/// use stockgate_authz::RoutePattern;
///
/// let pattern = RoutePattern::parse("/dashboard/stock/{location}/cashier").expect("pattern");
/// let key = pattern.match_path("/dashboard/stock/gros/cashier/sell").expect("match");
/// assert_eq!(key.as_str(), "gros");
/// assert!(pattern.match_path("/dashboard/stock/gros/products").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    /// Parse a pattern.
    ///
    /// # Errors
    /// - [`ConfigError::InvalidPattern`] if the pattern is not absolute, has no
    ///   `{location}` segment, or has more than one.
    pub fn parse(raw: &str) -> ConfigResult<Self> {
        let invalid = |reason: &str| ConfigError::InvalidPattern {
            pattern: raw.to_string(),
            reason: reason.to_string(),
        };
        if !raw.starts_with('/') {
            return Err(invalid("pattern must start with '/'"));
        }

        let mut segments = Vec::new();
        for part in raw.split('/').filter(|s| !s.is_empty()) {
            let segment = if part == LOCATION_PLACEHOLDER {
                Segment::Location
            } else if part.contains(['{', '}', '*']) {
                return Err(invalid("only whole-segment {location} placeholders are supported"));
            } else {
                Segment::Exact(part.to_string())
            };
            segments.push(segment);
        }

        match segments.iter().filter(|s| **s == Segment::Location).count() {
            0 => Err(invalid("missing {location} segment")),
            1 => Ok(Self {
                raw: raw.to_string(),
                segments,
            }),
            _ => Err(invalid("more than one {location} segment")),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Match a normalized path and return the captured location key.
    pub fn match_path(&self, path: &str) -> Option<LocationKey> {
        let mut parts = path.split('/').filter(|s| !s.is_empty());
        let mut captured = None;
        for segment in &self.segments {
            let part = parts.next()?;
            match segment {
                Segment::Exact(expected) if expected == part => {}
                Segment::Location => captured = Some(LocationKey::new(part)),
                _ => return None,
            }
        }
        captured
    }
}

impl std::fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_noise() {
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path("//"), "/");
        assert_eq!(normalize_path("/products/"), "/products");
        assert_eq!(normalize_path("/products//42?tab=stock#top"), "/products/42");
        assert_eq!(normalize_path("dashboard/stock"), "/dashboard/stock");
        assert_eq!(normalize_path("/?next=/admin"), "/");
    }

    #[test]
    fn normalize_resolves_dot_segments() {
        assert_eq!(normalize_path("/products/./42"), "/products/42");
        assert_eq!(
            normalize_path("/dashboard/stock/renaissance/cashier/../../../users"),
            "/dashboard/users"
        );
        assert_eq!(
            normalize_path("/dashboard/stock/gros/../al-ouloum/invoices"),
            "/dashboard/stock/al-ouloum/invoices"
        );
        assert_eq!(normalize_path("/../../products"), "/products");
        assert_eq!(normalize_path("/products/.."), "/");
        assert_eq!(normalize_path("/products/..42"), "/products/..42");
    }

    #[test]
    fn normalize_decodes_before_resolving() {
        assert_eq!(
            normalize_path("/dashboard/stock/gros/cashier/%2e%2e/%2E%2E/%2e%2e/users"),
            "/dashboard/users"
        );
        assert_eq!(
            normalize_path("/dashboard/stock/gros/cashier%2f..%2f..%2fusers"),
            "/dashboard/stock/users"
        );
        assert_eq!(normalize_path("/dashboard\\users"), "/dashboard/users");
        assert_eq!(normalize_path("/dashboard/%5c..%5cusers"), "/users");
        assert_eq!(normalize_path("/products/%252e%252e"), "/products/%2e%2e");
    }

    #[test]
    fn prefix_matches_whole_segments() {
        assert!(prefix_matches("/products", "/products"));
        assert!(prefix_matches("/products", "/products/42"));
        assert!(!prefix_matches("/products", "/productsx"));
        assert!(!prefix_matches("/products", "/"));
    }

    #[test]
    fn root_prefix_matches_only_root() {
        assert!(prefix_matches("/", "/"));
        assert!(!prefix_matches("/", "/products"));
    }

    #[test]
    fn route_pattern_captures_location() {
        let pattern = RoutePattern::parse("/dashboard/stock/{location}/cashier").expect("pattern");
        assert_eq!(
            pattern.match_path("/dashboard/stock/renaissance/cashier"),
            Some(LocationKey::new("renaissance"))
        );
        assert_eq!(
            pattern.match_path("/dashboard/stock/renaissance/cashier/sell"),
            Some(LocationKey::new("renaissance"))
        );
        assert_eq!(pattern.match_path("/dashboard/stock/renaissance"), None);
        assert_eq!(pattern.match_path("/dashboard/stock/renaissance/cashiers"), None);
        assert_eq!(pattern.match_path("/dashboard/orders/renaissance/cashier"), None);
        assert_eq!(pattern.to_string(), "/dashboard/stock/{location}/cashier");
    }

    #[test]
    fn route_pattern_rejects_bad_shapes() {
        for raw in [
            "dashboard/{location}",
            "/dashboard/stock",
            "/dashboard/{location}/{location}",
            "/dashboard/stock-{location}",
            "/dashboard/*/{location}",
        ] {
            let err = RoutePattern::parse(raw).expect_err(raw);
            assert!(matches!(err, ConfigError::InvalidPattern { .. }));
        }
    }
}
