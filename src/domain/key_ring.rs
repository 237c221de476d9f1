//! Key rings: an ordered master key plus its sub-keys.

use crate::domain::key_id::KeyId;
use crate::domain::secret::SecretBytes;
use crate::foundation::{UnlockError, MASTER_KEY_POSITION};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyUsage {
    Certify,
    Sign,
    Encrypt,
}

/// How a sub-key's private material is stored.
#[derive(Debug, Clone)]
pub enum Protection {
    /// Sealed material that can only be opened with a passphrase.
    Passphrase { sealed: Vec<u8> },
    /// Plain material; no passphrase needed.
    Unprotected(SecretBytes),
}

impl Protection {
    pub fn requires_passphrase(&self) -> bool {
        matches!(self, Self::Passphrase { .. })
    }
}

#[derive(Debug, Clone)]
pub struct SubKey {
    key_id: KeyId,
    position: usize,
    usage: KeyUsage,
    protection: Protection,
}

impl SubKey {
    pub fn key_id(&self) -> KeyId {
        self.key_id
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn usage(&self) -> KeyUsage {
        self.usage
    }

    pub fn protection(&self) -> &Protection {
        &self.protection
    }

    pub fn is_master(&self) -> bool {
        self.position == MASTER_KEY_POSITION
    }

    pub fn info(&self) -> SubKeyInfo {
        SubKeyInfo { key_id: self.key_id, position: self.position, usage: self.usage }
    }
}

/// Public description of a sub-key, safe to log and to return to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubKeyInfo {
    pub key_id: KeyId,
    pub position: usize,
    pub usage: KeyUsage,
}

impl SubKeyInfo {
    pub fn is_master(&self) -> bool {
        self.position == MASTER_KEY_POSITION
    }
}

/// Ordered collection of a master key (position 0) and its sub-keys.
#[derive(Debug, Clone)]
pub struct KeyRing {
    sub_keys: Vec<SubKey>,
}

impl KeyRing {
    /// Start a ring with its master key.
    pub fn builder(master_id: KeyId, protection: Protection) -> KeyRingBuilder {
        KeyRingBuilder { entries: vec![(master_id, KeyUsage::Certify, protection)] }
    }

    pub fn master(&self) -> &SubKey {
        &self.sub_keys[MASTER_KEY_POSITION]
    }

    pub fn master_key_id(&self) -> KeyId {
        self.master().key_id
    }

    pub fn sub_keys(&self) -> &[SubKey] {
        &self.sub_keys
    }

    pub fn len(&self) -> usize {
        self.sub_keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sub_keys.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&SubKey> {
        self.sub_keys.get(position)
    }

    pub fn find(&self, key_id: KeyId) -> Option<&SubKey> {
        self.sub_keys.iter().find(|sub_key| sub_key.key_id == key_id)
    }

    pub fn contains(&self, key_id: KeyId) -> bool {
        self.find(key_id).is_some()
    }

    pub fn key_ids(&self) -> impl Iterator<Item = KeyId> + '_ {
        self.sub_keys.iter().map(|sub_key| sub_key.key_id)
    }

    /// True if at least one sub-key is passphrase protected.
    pub fn requires_passphrase(&self) -> bool {
        self.sub_keys.iter().any(|sub_key| sub_key.protection.requires_passphrase())
    }
}

pub struct KeyRingBuilder {
    entries: Vec<(KeyId, KeyUsage, Protection)>,
}

impl KeyRingBuilder {
    pub fn sub_key(mut self, key_id: KeyId, usage: KeyUsage, protection: Protection) -> Self {
        self.entries.push((key_id, usage, protection));
        self
    }

    /// Fails if any identifier is a sentinel or appears twice.
    pub fn build(self) -> Result<KeyRing, UnlockError> {
        let master_id = self.entries[MASTER_KEY_POSITION].0;
        let mut sub_keys = Vec::with_capacity(self.entries.len());
        for (position, (key_id, usage, protection)) in self.entries.into_iter().enumerate() {
            if key_id.is_sentinel() {
                return Err(UnlockError::malformed_key_material(master_id, format!("reserved key id {key_id} at position {position}")));
            }
            if sub_keys.iter().any(|existing: &SubKey| existing.key_id == key_id) {
                return Err(UnlockError::malformed_key_material(master_id, format!("duplicate key id {key_id}")));
            }
            sub_keys.push(SubKey { key_id, position, usage, protection });
        }
        Ok(KeyRing { sub_keys })
    }
}

/// Decrypted private key material; zeroed when dropped.
pub struct PrivateKeyHandle {
    key_id: KeyId,
    material: SecretBytes,
}

impl PrivateKeyHandle {
    pub fn new(key_id: KeyId, material: SecretBytes) -> Self {
        Self { key_id, material }
    }

    pub fn key_id(&self) -> KeyId {
        self.key_id
    }

    pub fn expose_secret(&self) -> &[u8] {
        self.material.expose_secret()
    }

    pub fn len(&self) -> usize {
        self.material.len()
    }

    pub fn is_empty(&self) -> bool {
        self.material.is_empty()
    }
}

impl fmt::Debug for PrivateKeyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKeyHandle").field("key_id", &self.key_id).field("len", &self.len()).finish()
    }
}
