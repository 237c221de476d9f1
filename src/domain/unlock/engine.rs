//! Unlock engine: find the first sub-key of a ring that a passphrase opens.

use crate::domain::key_ring::KeyRing;
use crate::domain::secret::Passphrase;
use crate::domain::unlock::outcome::{UnlockAttemptResult, UnlockedKey};
use crate::domain::unlock::provider::{DecryptError, KeyMaterialProvider};
use crate::foundation::UnlockError;
use log::debug;
use std::sync::Arc;

/// Result of one engine run plus the number of decrypt calls it made.
#[derive(Debug)]
pub struct UnlockRun {
    pub result: UnlockAttemptResult,
    pub attempts: usize,
}

/// Stateless; clones share the same provider.
#[derive(Clone)]
pub struct UnlockEngine {
    provider: Arc<dyn KeyMaterialProvider>,
}

impl UnlockEngine {
    pub fn new(provider: Arc<dyn KeyMaterialProvider>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &Arc<dyn KeyMaterialProvider> {
        &self.provider
    }

    pub fn try_unlock(&self, ring: &KeyRing, passphrase: &Passphrase) -> Result<UnlockAttemptResult, UnlockError> {
        self.run(ring, passphrase).map(|run| run.result)
    }

    /// Walk the ring in position order; never makes more than `ring.len()` decrypt calls.
    ///
    /// - a wrong passphrase stops the walk immediately
    /// - a master key without usable material moves on to the next sub-key
    /// - any other sub-key without usable material ends the walk with `NoUsableKey`
    pub fn run(&self, ring: &KeyRing, passphrase: &Passphrase) -> Result<UnlockRun, UnlockError> {
        let mut attempts = 0usize;
        for sub_key in ring.sub_keys() {
            attempts += 1;
            match self.provider.decrypt(sub_key, passphrase) {
                Ok(Some(key)) => {
                    debug!(
                        "unlocked key ring master={} sub_key={} position={} attempts={}",
                        ring.master_key_id(),
                        sub_key.key_id(),
                        sub_key.position(),
                        attempts
                    );
                    let result = UnlockAttemptResult::Unlocked(UnlockedKey { sub_key: sub_key.info(), key });
                    return Ok(UnlockRun { result, attempts });
                }
                Ok(None) if sub_key.is_master() => {
                    debug!("master key {} holds no private material, trying next sub-key", sub_key.key_id());
                }
                Ok(None) => {
                    debug!("sub-key {} at position {} holds no private material", sub_key.key_id(), sub_key.position());
                    return Ok(UnlockRun { result: UnlockAttemptResult::NoUsableKey, attempts });
                }
                Err(DecryptError::WrongPassphrase) => {
                    debug!("wrong passphrase for key {} at position {}", sub_key.key_id(), sub_key.position());
                    return Ok(UnlockRun { result: UnlockAttemptResult::WrongPassphrase, attempts });
                }
                Err(DecryptError::Malformed(details)) => {
                    return Err(UnlockError::malformed_key_material(sub_key.key_id(), details));
                }
            }
        }

        debug!("key ring {} exhausted after {} attempts", ring.master_key_id(), attempts);
        Ok(UnlockRun { result: UnlockAttemptResult::NoUsableKey, attempts })
    }
}
