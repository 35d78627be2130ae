//! Configuration loading from `~/.kqlassist/config.toml` with defaults.

use kqlassist_types::{AssistConfig, AssistError, AssistResult};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable that overrides the tenant id.
pub const TENANT_ENV: &str = "KQLASSIST_TENANT";

/// Environment variable that overrides the config directory.
pub const HOME_ENV: &str = "KQLASSIST_HOME";

pub fn kqlassist_home() -> PathBuf {
    std::env::var(HOME_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".kqlassist")
        })
}

pub fn default_config_path() -> PathBuf {
    kqlassist_home().join("config.toml")
}

/// Load configuration, falling back to defaults when the file is missing or
/// cannot be read or parsed.
pub fn load_config(path: Option<&Path>) -> AssistConfig {
    let config_path = path
        .map(|p| p.to_path_buf())
        .unwrap_or_else(default_config_path);

    if !config_path.exists() {
        info!(path = %config_path.display(), "Config file not found, using defaults");
        return AssistConfig::default();
    }

    match read_config(&config_path) {
        Ok(config) => {
            info!(path = %config_path.display(), "Loaded configuration");
            config
        }
        Err(e) => {
            warn!(error = %e, path = %config_path.display(), "Failed to load config, using defaults");
            AssistConfig::default()
        }
    }
}

/// Strict variant of [`load_config`]: errors instead of falling back.
pub fn read_config(path: &Path) -> AssistResult<AssistConfig> {
    let contents = std::fs::read_to_string(path)?;
    toml::from_str(&contents).map_err(|e| AssistError::Config(format!("{}: {e}", path.display())))
}

/// Tenant id from [`TENANT_ENV`], if set and non-blank.
pub fn tenant_from_env() -> Option<String> {
    std::env::var(TENANT_ENV)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
