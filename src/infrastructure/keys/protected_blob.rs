//! Passphrase-sealed sub-key material (Argon2id + XChaCha20-Poly1305).
//!
//! Layout: `magic(4) | version(1) | m_cost(4) | t_cost(4) | p_cost(4) | salt(32) | nonce(24) | ciphertext+tag`.
//! Everything before the ciphertext is bound as AAD. An empty plaintext marks a stub key.

use crate::domain::{DecryptError, Passphrase, Protection, SecretBytes};
use crate::foundation::{
    UnlockError, DEFAULT_KDF_M_COST, DEFAULT_KDF_P_COST, DEFAULT_KDF_T_COST, MAX_KDF_M_COST, MAX_KDF_P_COST, MAX_KDF_T_COST,
};
use crate::infrastructure::keys::panic_guard::SecretPanicGuard;
use argon2::{Argon2, ParamsBuilder, Version};
use chacha20poly1305::aead::{Aead, KeyInit, Payload};
use chacha20poly1305::XChaCha20Poly1305;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

const MAGIC: [u8; 4] = *b"UKEY";
const VERSION: u8 = 1;
const HEADER_LEN: usize = 4 + 1 + 12 + 32 + 24;
const TAG_LEN: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argon2Params {
    pub m_cost: u32,
    pub t_cost: u32,
    pub p_cost: u32,
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self { m_cost: DEFAULT_KDF_M_COST, t_cost: DEFAULT_KDF_T_COST, p_cost: DEFAULT_KDF_P_COST }
    }
}

impl Argon2Params {
    pub fn validate(&self) -> Result<(), UnlockError> {
        self.check().map_err(|e| UnlockError::ConfigError(format!("invalid Argon2 parameters: {e}")))
    }

    /// Argon2's own limits plus the upper bounds this crate is willing to run.
    fn check(&self) -> Result<(), String> {
        if self.m_cost > MAX_KDF_M_COST {
            return Err(format!("m_cost {} exceeds {}", self.m_cost, MAX_KDF_M_COST));
        }
        if self.t_cost > MAX_KDF_T_COST {
            return Err(format!("t_cost {} exceeds {}", self.t_cost, MAX_KDF_T_COST));
        }
        if self.p_cost > MAX_KDF_P_COST {
            return Err(format!("p_cost {} exceeds {}", self.p_cost, MAX_KDF_P_COST));
        }
        self.build().map(|_| ()).map_err(|e| e.to_string())
    }

    fn build(&self) -> Result<argon2::Params, argon2::Error> {
        ParamsBuilder::new().m_cost(self.m_cost).t_cost(self.t_cost).p_cost(self.p_cost).build()
    }
}

#[derive(Debug, Clone)]
pub struct ProtectedKeyBlob {
    pub version: u8,
    pub kdf_params: Argon2Params,
    pub salt: [u8; 32],
    pub nonce: [u8; 24],
    pub ciphertext_and_tag: Vec<u8>,
}

impl ProtectedKeyBlob {
    /// Seal `material` under `passphrase`. Empty material produces a stub.
    pub fn seal(material: &[u8], passphrase: &Passphrase, kdf_params: Argon2Params) -> Result<Self, UnlockError> {
        kdf_params.validate()?;
        let mut salt = [0u8; 32];
        let mut nonce = [0u8; 24];
        let mut rng = OsRng;
        rng.fill_bytes(&mut salt);
        rng.fill_bytes(&mut nonce);

        let mut blob = Self { version: VERSION, kdf_params, salt, nonce, ciphertext_and_tag: Vec::new() };
        let mut key = derive_key(passphrase, &blob.salt, &blob.kdf_params).map_err(|e| UnlockError::crypto("derive_key", e))?;
        let cipher = XChaCha20Poly1305::new(&key.into());
        key.zeroize();

        let aad = blob.header_bytes();
        blob.ciphertext_and_tag = cipher
            .encrypt(&blob.nonce.into(), Payload { msg: material, aad: aad.as_ref() })
            .map_err(|e| UnlockError::crypto("seal", e.to_string()))?;
        Ok(blob)
    }

    /// Open the blob. `Ok(None)` for a stub (authenticated but empty).
    pub fn open(&self, passphrase: &Passphrase) -> Result<Option<SecretBytes>, DecryptError> {
        if self.version != VERSION {
            return Err(DecryptError::Malformed(format!("unsupported blob version: {}", self.version)));
        }
        self.kdf_params.check().map_err(|e| DecryptError::Malformed(format!("unacceptable kdf parameters: {e}")))?;
        let mut key = derive_key(passphrase, &self.salt, &self.kdf_params).map_err(DecryptError::Malformed)?;
        let cipher = XChaCha20Poly1305::new(&key.into());
        key.zeroize();

        let aad = self.header_bytes();
        let plaintext = cipher
            .decrypt(&self.nonce.into(), Payload { msg: self.ciphertext_and_tag.as_ref(), aad: aad.as_ref() })
            .map_err(|_| DecryptError::WrongPassphrase)?;
        let guard = SecretPanicGuard::new(plaintext);
        if guard.get().is_empty() {
            return Ok(None);
        }
        Ok(Some(SecretBytes::new(guard.take())))
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = self.header_bytes();
        buf.extend_from_slice(&self.ciphertext_and_tag);
        buf
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, DecryptError> {
        if data.len() < HEADER_LEN + TAG_LEN {
            return Err(DecryptError::Malformed("blob too short".to_string()));
        }
        if data[0..4] != MAGIC {
            return Err(DecryptError::Malformed("invalid magic bytes".to_string()));
        }
        let version = data[4];
        if version != VERSION {
            return Err(DecryptError::Malformed(format!("unsupported blob version: {version}")));
        }
        let kdf_params = Argon2Params { m_cost: read_u32(data, 5)?, t_cost: read_u32(data, 9)?, p_cost: read_u32(data, 13)? };
        kdf_params.check().map_err(|e| DecryptError::Malformed(format!("unacceptable kdf parameters: {e}")))?;
        let salt: [u8; 32] = data[17..49].try_into().map_err(|_| DecryptError::Malformed("invalid salt bytes".to_string()))?;
        let nonce: [u8; 24] = data[49..73].try_into().map_err(|_| DecryptError::Malformed("invalid nonce bytes".to_string()))?;
        Ok(Self { version, kdf_params, salt, nonce, ciphertext_and_tag: data[HEADER_LEN..].to_vec() })
    }

    fn header_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(HEADER_LEN + self.ciphertext_and_tag.len());
        buf.extend_from_slice(&MAGIC);
        buf.push(self.version);
        buf.extend_from_slice(&self.kdf_params.m_cost.to_le_bytes());
        buf.extend_from_slice(&self.kdf_params.t_cost.to_le_bytes());
        buf.extend_from_slice(&self.kdf_params.p_cost.to_le_bytes());
        buf.extend_from_slice(&self.salt);
        buf.extend_from_slice(&self.nonce);
        buf
    }
}

/// Seal `material` and wrap it as passphrase protection for a key ring entry.
pub fn seal_protection(material: &[u8], passphrase: &Passphrase, kdf_params: Argon2Params) -> Result<Protection, UnlockError> {
    let blob = ProtectedKeyBlob::seal(material, passphrase, kdf_params)?;
    Ok(Protection::Passphrase { sealed: blob.to_bytes() })
}

fn read_u32(data: &[u8], offset: usize) -> Result<u32, DecryptError> {
    let bytes: [u8; 4] =
        data[offset..offset + 4].try_into().map_err(|_| DecryptError::Malformed(format!("invalid u32 at offset {offset}")))?;
    Ok(u32::from_le_bytes(bytes))
}

fn derive_key(passphrase: &Passphrase, salt: &[u8; 32], params: &Argon2Params) -> Result<[u8; 32], String> {
    let mut key = [0u8; 32];
    let argon2_params = params.build().map_err(|e| format!("invalid Argon2 parameters: {e}"))?;
    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, argon2_params);
    argon2
        .hash_password_into(passphrase.expose_secret().as_bytes(), salt, &mut key)
        .map_err(|e| format!("key derivation failed: {e}"))?;
    Ok(key)
}
