//! KeyMaterialProvider trait - access to key rings and per-sub-key decryption.

use crate::domain::key_id::KeyId;
use crate::domain::key_ring::{KeyRing, PrivateKeyHandle, SubKey};
use crate::domain::secret::Passphrase;
use crate::foundation::UnlockError;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecryptError {
    /// Authentication of the sealed material failed.
    WrongPassphrase,
    /// The sealed material could not be parsed.
    Malformed(String),
}

impl fmt::Display for DecryptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongPassphrase => write!(f, "wrong passphrase"),
            Self::Malformed(details) => write!(f, "malformed key material: {details}"),
        }
    }
}

impl std::error::Error for DecryptError {}

pub trait KeyMaterialProvider: Send + Sync {
    /// A short backend name (e.g. `"memory"`).
    fn backend(&self) -> &'static str {
        "unknown"
    }

    /// Return the key ring that contains `key_id`, either as master or as a sub-key.
    fn key_ring(&self, key_id: KeyId) -> Result<KeyRing, UnlockError>;

    /// Decrypt a single sub-key.
    ///
    /// `Ok(None)` means the passphrase was accepted but the sub-key carries no usable
    /// private material (for example an offline master key stub).
    fn decrypt(&self, sub_key: &SubKey, passphrase: &Passphrase) -> Result<Option<PrivateKeyHandle>, DecryptError>;
}
