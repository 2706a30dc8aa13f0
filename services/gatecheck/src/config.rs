use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use stockgate_authz::{AccessConfig, LocationKey};

pub const CONFIG_ENV: &str = "STOCKGATE_CONFIG";
pub const DEFAULT_LOCATION_ENV: &str = "STOCKGATE_DEFAULT_LOCATION";
pub const TOP_LEVEL_FALLBACK_ENV: &str = "STOCKGATE_TOP_LEVEL_FALLBACK";

/// Load access configuration.
///
/// A YAML file named by `path` (or `STOCKGATE_CONFIG`) replaces the built-in
/// defaults; single-value environment variables are applied last.
pub fn from_env_or_yaml(path: Option<&Path>) -> Result<AccessConfig> {
    let path = path
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
    let config = match path {
        Some(path) => AccessConfig::from_yaml_file(&path)
            .with_context(|| format!("load access config {}", path.display()))?,
        None => AccessConfig::default(),
    };
    Ok(apply_env_overrides(config, |name| std::env::var(name).ok()))
}

fn apply_env_overrides(
    mut config: AccessConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> AccessConfig {
    if let Some(value) = lookup(DEFAULT_LOCATION_ENV).filter(|value| !value.trim().is_empty()) {
        config.fallbacks.default_location = LocationKey::new(value.trim());
    }
    if let Some(value) = lookup(TOP_LEVEL_FALLBACK_ENV).filter(|value| !value.trim().is_empty()) {
        config.fallbacks.top_level = value.trim().to_string();
    }
    config
}
