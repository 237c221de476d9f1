//! Configuration loader using Figment for layered config management.
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. TOML config file (optional)
//! 3. Environment variables (KEYUNLOCK_* prefix)

use crate::foundation::UnlockError;
use crate::infrastructure::config::types::UnlockConfig;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use log::{debug, info};
use std::path::Path;

/// Environment variable prefix for config overrides.
///
/// Example: `KEYUNLOCK_CACHE__DEFAULT_TTL_SECS` -> `cache.default_ttl_secs`
pub const ENV_PREFIX: &str = "KEYUNLOCK_";

/// Load configuration from compiled defaults and the environment only.
pub fn load_config() -> Result<UnlockConfig, UnlockError> {
    info!("loading configuration from defaults and environment");
    extract(Figment::new().merge(Serialized::defaults(UnlockConfig::default())).merge(env_provider()))
}

/// Load configuration from a specific file path; a missing file falls back to defaults and env.
pub fn load_config_from_file(path: &Path) -> Result<UnlockConfig, UnlockError> {
    info!("loading configuration path={}", path.display());
    let mut figment = Figment::new().merge(Serialized::defaults(UnlockConfig::default()));
    if path.exists() {
        figment = figment.merge(Toml::file(path));
    } else {
        debug!("configuration file missing path={}; using defaults and env only", path.display());
    }
    extract(figment.merge(env_provider()))
}

fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX).split("__")
}

fn extract(figment: Figment) -> Result<UnlockConfig, UnlockError> {
    let config: UnlockConfig = figment.extract().map_err(|e| UnlockError::ConfigError(format!("config extraction failed: {e}")))?;
    config.validate().map_err(|errors| UnlockError::ConfigError(format!("validation failed: {}", errors.join("; "))))?;
    debug!(
        "configuration loaded cache_ttl_secs={} sweeper_enabled={} audit_log={}",
        config.cache.default_ttl_secs,
        config.cache.sweeper_enabled,
        config.audit.log_path.is_some()
    );
    Ok(config)
}
