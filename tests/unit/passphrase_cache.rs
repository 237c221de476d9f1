use keyunlock_core::domain::{KeyId, Passphrase};
use keyunlock_core::foundation::ManualClock;
use keyunlock_core::infrastructure::cache::PassphraseCache;
use std::sync::Arc;
use std::time::Duration;

fn cache() -> (PassphraseCache, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(5_000_000_000));
    (PassphraseCache::with_clock(Duration::from_secs(180), clock.clone()), clock)
}

#[test]
fn passphrase_cache_when_within_ttl_then_retrievable_and_after_ttl_absent() {
    let (cache, clock) = cache();
    let ttl = Duration::from_secs(60);
    cache.put(KeyId::Key(10), &Passphrase::from("pw"), ttl);

    clock.advance(ttl - Duration::from_secs(1));
    assert_eq!(cache.get(KeyId::Key(10)).map(|p| p.expose_secret().to_string()), Some("pw".to_string()));

    clock.advance(Duration::from_secs(2));
    assert!(cache.get(KeyId::Key(10)).is_none());
}

#[test]
fn passphrase_cache_when_read_twice_then_same_value() {
    let (cache, _clock) = cache();
    cache.put_default(KeyId::Symmetric, &Passphrase::from("sym"));
    let first = cache.get(KeyId::Symmetric);
    let second = cache.get(KeyId::Symmetric);
    assert!(first.is_some());
    assert_eq!(first, second);
}

#[test]
fn passphrase_cache_default_ttl_applies_to_put_default() {
    let (cache, clock) = cache();
    cache.put_default(KeyId::Key(1), &Passphrase::from("pw"));
    assert_eq!(cache.remaining_ttl(KeyId::Key(1)), Some(Duration::from_secs(180)));

    clock.advance(Duration::from_secs(180));
    assert!(!cache.contains(KeyId::Key(1)));
}

#[test]
fn passphrase_cache_debug_output_hides_passphrase() {
    let (cache, _clock) = cache();
    cache.put_default(KeyId::Key(1), &Passphrase::from("hunter2"));
    let passphrase = cache.get(KeyId::Key(1)).expect("cached");
    assert!(!format!("{passphrase:?}").contains("hunter2"));
}

#[test]
fn passphrase_cache_invalidate_all_reports_count() {
    let (cache, _clock) = cache();
    for raw in 1..=4u64 {
        cache.put_default(KeyId::Key(raw), &Passphrase::from("pw"));
    }
    assert_eq!(cache.len(), 4);
    assert_eq!(cache.invalidate_all(), 4);
    assert!(cache.is_empty());
}
