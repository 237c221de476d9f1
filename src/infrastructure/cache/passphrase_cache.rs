//! Process-wide passphrase cache with per-entry expiry.

use crate::domain::{KeyId, Passphrase};
use crate::foundation::{Clock, SystemClock, DEFAULT_CACHE_TTL_SECS};
use crate::infrastructure::keys::protected_memory::ProtectedSecret;
use log::debug;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// A cached passphrase. The secret is zeroized when the entry is dropped.
#[derive(Debug)]
pub struct CacheEntry {
    key_id: KeyId,
    secret: ProtectedSecret,
    inserted_at_nanos: u64,
    ttl: Duration,
}

impl CacheEntry {
    pub fn key_id(&self) -> KeyId {
        self.key_id
    }

    pub fn inserted_at_nanos(&self) -> u64 {
        self.inserted_at_nanos
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn expires_at_nanos(&self) -> u64 {
        let ttl_nanos = u64::try_from(self.ttl.as_nanos()).unwrap_or(u64::MAX);
        self.inserted_at_nanos.saturating_add(ttl_nanos)
    }

    pub fn is_expired(&self, now_nanos: u64) -> bool {
        now_nanos >= self.expires_at_nanos()
    }

    pub fn remaining(&self, now_nanos: u64) -> Duration {
        Duration::from_nanos(self.expires_at_nanos().saturating_sub(now_nanos))
    }
}

/// Maps key identifiers to validated passphrases.
///
/// All operations take the same mutex, never fail, and never log passphrases.
/// Expired entries are purged when read and by [`PassphraseCache::purge_expired`].
pub struct PassphraseCache {
    entries: Mutex<HashMap<KeyId, CacheEntry>>,
    clock: Arc<dyn Clock>,
    default_ttl: Duration,
}

impl Default for PassphraseCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_CACHE_TTL_SECS))
    }
}

impl PassphraseCache {
    pub fn new(default_ttl: Duration) -> Self {
        Self::with_clock(default_ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(default_ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self { entries: Mutex::new(HashMap::new()), clock, default_ttl }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<KeyId, CacheEntry>> {
        self.entries.lock().unwrap_or_else(|err| err.into_inner())
    }

    /// Insert or overwrite the passphrase for `key_id`, restarting its expiry.
    ///
    /// `KeyId::None` is never cached; a zero `ttl` only removes an existing entry.
    pub fn put(&self, key_id: KeyId, passphrase: &Passphrase, ttl: Duration) {
        if !key_id.is_cacheable() {
            debug!("ignoring passphrase cache put for key {}", key_id);
            return;
        }
        let mut entries = self.lock();
        if ttl.is_zero() {
            entries.remove(&key_id);
            return;
        }
        let entry =
            CacheEntry { key_id, secret: ProtectedSecret::from_passphrase(passphrase), inserted_at_nanos: self.clock.now_nanos(), ttl };
        entries.insert(key_id, entry);
        debug!("cached passphrase key={} ttl_secs={}", key_id, ttl.as_secs());
    }

    pub fn put_default(&self, key_id: KeyId, passphrase: &Passphrase) {
        self.put(key_id, passphrase, self.default_ttl);
    }

    /// Passphrase for `key_id` if present and not expired.
    pub fn get(&self, key_id: KeyId) -> Option<Passphrase> {
        let now = self.clock.now_nanos();
        let mut entries = self.lock();
        Self::live_entry(&mut entries, key_id, now).map(|entry| entry.secret.to_passphrase())
    }

    /// First live entry among `key_ids`, in iteration order.
    pub fn get_any(&self, key_ids: impl IntoIterator<Item = KeyId>) -> Option<(KeyId, Passphrase)> {
        let now = self.clock.now_nanos();
        let mut entries = self.lock();
        for key_id in key_ids {
            if let Some(entry) = Self::live_entry(&mut entries, key_id, now) {
                return Some((key_id, entry.secret.to_passphrase()));
            }
        }
        None
    }

    pub fn contains(&self, key_id: KeyId) -> bool {
        let now = self.clock.now_nanos();
        Self::live_entry(&mut self.lock(), key_id, now).is_some()
    }

    pub fn remaining_ttl(&self, key_id: KeyId) -> Option<Duration> {
        let now = self.clock.now_nanos();
        Self::live_entry(&mut self.lock(), key_id, now).map(|entry| entry.remaining(now))
    }

    /// Remove the entry for `key_id`; returns whether one existed.
    pub fn invalidate(&self, key_id: KeyId) -> bool {
        let removed = self.lock().remove(&key_id).is_some();
        if removed {
            debug!("invalidated cached passphrase key={}", key_id);
        }
        removed
    }

    /// Remove every entry; returns how many were dropped.
    pub fn invalidate_all(&self) -> usize {
        let mut entries = self.lock();
        let count = entries.len();
        entries.clear();
        debug!("invalidated all cached passphrases count={}", count);
        count
    }

    /// Drop all expired entries; returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now_nanos();
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        let purged = before - entries.len();
        if purged > 0 {
            debug!("purged expired cached passphrases count={}", purged);
        }
        purged
    }

    /// Number of stored entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn live_entry<'a>(entries: &'a mut HashMap<KeyId, CacheEntry>, key_id: KeyId, now: u64) -> Option<&'a CacheEntry> {
        if entries.get(&key_id)?.is_expired(now) {
            entries.remove(&key_id);
            debug!("cached passphrase expired key={}", key_id);
            return None;
        }
        entries.get(&key_id)
    }
}
