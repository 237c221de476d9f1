//! In-process key material provider backed by registered key rings.

use crate::domain::{DecryptError, KeyId, KeyMaterialProvider, KeyRing, Passphrase, PrivateKeyHandle, Protection, SubKey};
use crate::foundation::UnlockError;
use crate::infrastructure::keys::protected_blob::ProtectedKeyBlob;
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Default)]
struct Rings {
    by_master: HashMap<KeyId, KeyRing>,
    /// Any sub-key id -> its master id.
    index: HashMap<KeyId, KeyId>,
}

#[derive(Default)]
pub struct InMemoryKeyMaterialProvider {
    rings: RwLock<Rings>,
}

impl InMemoryKeyMaterialProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a ring, replacing any ring with the same master id.
    ///
    /// Fails if one of its sub-key ids already belongs to a different ring.
    pub fn insert(&self, ring: KeyRing) -> Result<(), UnlockError> {
        let master_id = ring.master_key_id();
        let mut rings = self.rings.write().unwrap_or_else(|err| err.into_inner());
        for key_id in ring.key_ids() {
            if let Some(owner) = rings.index.get(&key_id) {
                if *owner != master_id {
                    return Err(UnlockError::malformed_key_material(key_id, format!("already part of key ring {owner}")));
                }
            }
        }
        if let Some(previous) = rings.by_master.remove(&master_id) {
            for key_id in previous.key_ids() {
                rings.index.remove(&key_id);
            }
        }
        for key_id in ring.key_ids() {
            rings.index.insert(key_id, master_id);
        }
        log::info!("registered key ring master={} sub_keys={}", master_id, ring.len());
        rings.by_master.insert(master_id, ring);
        Ok(())
    }

    pub fn remove(&self, master_id: KeyId) -> Option<KeyRing> {
        let mut rings = self.rings.write().unwrap_or_else(|err| err.into_inner());
        let ring = rings.by_master.remove(&master_id)?;
        for key_id in ring.key_ids() {
            rings.index.remove(&key_id);
        }
        Some(ring)
    }

    pub fn len(&self) -> usize {
        self.rings.read().unwrap_or_else(|err| err.into_inner()).by_master.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyMaterialProvider for InMemoryKeyMaterialProvider {
    fn backend(&self) -> &'static str {
        "memory"
    }

    fn key_ring(&self, key_id: KeyId) -> Result<KeyRing, UnlockError> {
        if key_id.is_sentinel() {
            return Err(UnlockError::key_material_unavailable(format!("{key_id} does not name a key ring")));
        }
        let rings = self.rings.read().unwrap_or_else(|err| err.into_inner());
        rings
            .index
            .get(&key_id)
            .and_then(|master_id| rings.by_master.get(master_id))
            .cloned()
            .ok_or_else(|| UnlockError::key_ring_not_found(key_id))
    }

    fn decrypt(&self, sub_key: &SubKey, passphrase: &Passphrase) -> Result<Option<PrivateKeyHandle>, DecryptError> {
        let material = match sub_key.protection() {
            Protection::Unprotected(bytes) if bytes.is_empty() => None,
            Protection::Unprotected(bytes) => Some(bytes.clone()),
            Protection::Passphrase { sealed } => ProtectedKeyBlob::from_bytes(sealed)?.open(passphrase)?,
        };
        Ok(material.map(|material| PrivateKeyHandle::new(sub_key.key_id(), material)))
    }
}
