use keyunlock_core::foundation::ErrorCode;
use keyunlock_core::infrastructure::config::{load_config, load_config_from_file};
use std::env;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

fn lock_env() -> std::sync::MutexGuard<'static, ()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(())).lock().unwrap_or_else(|err| err.into_inner())
}

#[test]
fn config_loading_when_no_sources_then_defaults() {
    let _guard = lock_env();
    let config = load_config().expect("load defaults");

    assert_eq!(config.cache.default_ttl(), Duration::from_secs(180));
    assert_eq!(config.cache.sweep_interval(), Duration::from_secs(60));
    assert!(config.cache.sweeper_enabled);
    assert!(config.audit.log_path.is_none());
    assert_eq!(config.logging.filters, "info");
}

#[test]
fn config_loading_when_toml_and_env_then_env_wins() {
    let _guard = lock_env();
    let temp_dir = tempfile::tempdir().expect("test setup: temp dir");
    let path = temp_dir.path().join("keyunlock.toml");
    std::fs::write(
        &path,
        r#"
[cache]
default_ttl_secs = 600
sweeper_enabled = false

[kdf]
m_cost = 4096
t_cost = 2
p_cost = 1

[audit]
log_path = "/var/log/keyunlock-audit.log"
"#,
    )
    .expect("write config");

    env::set_var("KEYUNLOCK_CACHE__DEFAULT_TTL_SECS", "30");
    let config = load_config_from_file(&path);
    env::remove_var("KEYUNLOCK_CACHE__DEFAULT_TTL_SECS");
    let config = config.expect("load config");

    assert_eq!(config.cache.default_ttl_secs, 30);
    assert!(!config.cache.sweeper_enabled);
    assert_eq!(config.kdf.m_cost, 4096);
    assert_eq!(config.kdf.t_cost, 2);
    assert_eq!(config.audit.log_path.as_deref(), Some(std::path::Path::new("/var/log/keyunlock-audit.log")));
}

#[test]
fn config_loading_when_file_missing_then_defaults_apply() {
    let _guard = lock_env();
    let temp_dir = tempfile::tempdir().expect("test setup: temp dir");
    let config = load_config_from_file(&temp_dir.path().join("absent.toml")).expect("load config");
    assert_eq!(config.cache.default_ttl_secs, 180);
}

#[test]
fn config_loading_rejects_zero_sweep_interval() {
    let _guard = lock_env();
    env::set_var("KEYUNLOCK_CACHE__SWEEP_INTERVAL_SECS", "0");
    let result = load_config();
    env::remove_var("KEYUNLOCK_CACHE__SWEEP_INTERVAL_SECS");

    let err = result.unwrap_err();
    assert_eq!(err.code(), ErrorCode::ConfigError);
    assert!(err.to_string().contains("sweep_interval_secs"));
}
