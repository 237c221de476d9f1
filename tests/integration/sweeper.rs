use crate::fixtures::*;
use keyunlock_core::application::UnlockOrchestrator;
use keyunlock_core::domain::{KeyId, Passphrase};
use keyunlock_core::foundation::ErrorCode;
use keyunlock_core::infrastructure::config::UnlockConfig;
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn from_config_starts_sweeper_that_purges_expired_entries() {
    let mut config = UnlockConfig::default();
    config.cache.default_ttl_secs = 1;
    config.cache.sweep_interval_secs = 1;

    let orchestrator = UnlockOrchestrator::from_config(&config, provider_with(no_rings())).expect("orchestrator");
    orchestrator.cache().put(KeyId::Symmetric, &Passphrase::from("pw"), Duration::from_millis(1));
    assert_eq!(orchestrator.cache().len(), 1);

    // The cache uses wall-clock time; give the millisecond ttl time to lapse before the next tick.
    std::thread::sleep(Duration::from_millis(5));
    tokio::time::sleep(Duration::from_secs(3)).await;

    assert_eq!(orchestrator.cache().len(), 0);
}

#[test]
fn from_config_outside_runtime_fails_when_sweeper_enabled() {
    let err = UnlockOrchestrator::from_config(&UnlockConfig::default(), provider_with(no_rings())).err().expect("needs runtime");
    assert!(err.to_string().contains("tokio runtime"));

    let mut config = UnlockConfig::default();
    config.cache.sweeper_enabled = false;
    assert!(UnlockOrchestrator::from_config(&config, provider_with(no_rings())).is_ok());
}

#[tokio::test]
async fn from_config_rejects_invalid_config() {
    let mut config = UnlockConfig::default();
    config.cache.sweep_interval_secs = 0;

    let err = UnlockOrchestrator::from_config(&config, provider_with(no_rings())).err().expect("invalid config");
    assert_eq!(err.code(), ErrorCode::ConfigError);
    assert!(err.to_string().contains("sweep_interval_secs"));
}

#[tokio::test(start_paused = true)]
async fn zero_sweep_interval_still_purges() {
    let (mut orchestrator, clock) = orchestrator_with(no_rings());
    orchestrator.start_sweeper(Duration::ZERO);
    orchestrator.cache().put(KeyId::Symmetric, &Passphrase::from("pw"), Duration::from_secs(5));

    clock.advance(Duration::from_secs(6));
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert_eq!(orchestrator.cache().len(), 0);
}
