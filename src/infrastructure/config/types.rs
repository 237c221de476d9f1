use crate::foundation::{DEFAULT_CACHE_TTL_SECS, DEFAULT_SWEEP_INTERVAL_SECS};
use crate::infrastructure::keys::Argon2Params;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Key derivation settings used when sealing sub-key material.
pub type KdfConfig = Argon2Params;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UnlockConfig {
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub kdf: KdfConfig,
    #[serde(default)]
    pub audit: AuditConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Lifetime of a cached passphrase. Zero disables caching.
    #[serde(default = "default_ttl_secs")]
    pub default_ttl_secs: u64,
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
    #[serde(default = "default_true")]
    pub sweeper_enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
            sweeper_enabled: true,
        }
    }
}

impl CacheConfig {
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AuditConfig {
    /// JSON-lines audit file. Audit events are discarded when unset.
    #[serde(default)]
    pub log_path: Option<PathBuf>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub log_dir: Option<String>,
    /// Filter expression passed to `init_logger` (e.g. `"debug"`, `"keyunlock_core=trace,root=warn"`).
    #[serde(default = "default_filters")]
    pub filters: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { log_dir: None, filters: default_filters() }
    }
}

fn default_ttl_secs() -> u64 {
    DEFAULT_CACHE_TTL_SECS
}

fn default_sweep_interval_secs() -> u64 {
    DEFAULT_SWEEP_INTERVAL_SECS
}

fn default_true() -> bool {
    true
}

fn default_filters() -> String {
    "info".to_string()
}
