use crate::domain::key_id::KeyId;
use crate::domain::key_ring::{PrivateKeyHandle, SubKeyInfo};
use crate::domain::secret::Passphrase;
use crate::foundation::{ErrorCode, UnlockError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The sub-key that accepted the passphrase together with its decrypted material.
#[derive(Debug)]
pub struct UnlockedKey {
    pub sub_key: SubKeyInfo,
    pub key: PrivateKeyHandle,
}

/// Terminal result of running the unlock algorithm over one key ring.
#[derive(Debug)]
pub enum UnlockAttemptResult {
    Unlocked(UnlockedKey),
    WrongPassphrase,
    NoUsableKey,
}

impl UnlockAttemptResult {
    pub fn is_unlocked(&self) -> bool {
        matches!(self, Self::Unlocked(_))
    }

    pub fn failure_reason(&self) -> Option<FailureReason> {
        match self {
            Self::Unlocked(_) => None,
            Self::WrongPassphrase => Some(FailureReason::WrongPassphrase),
            Self::NoUsableKey => Some(FailureReason::NoUsableKey),
        }
    }
}

/// Answer to "do I need to ask the user for a passphrase?".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnlockOutcome {
    AlreadyCached(Passphrase),
    NeedsPassphrase,
    NoPassphraseRequired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    WrongPassphrase,
    NoUsableKey,
    EmptyPassphrase,
    NoPassphraseRequired,
    /// The request ended with an error instead of a result.
    KeyRingNotFound,
    MalformedKeyMaterial,
    Error,
}

impl From<&UnlockError> for FailureReason {
    fn from(err: &UnlockError) -> Self {
        match err.code() {
            ErrorCode::KeyRingNotFound => Self::KeyRingNotFound,
            ErrorCode::MalformedKeyMaterial => Self::MalformedKeyMaterial,
            _ => Self::Error,
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongPassphrase => write!(f, "wrong passphrase"),
            Self::NoUsableKey => write!(f, "could not extract a private key"),
            Self::EmptyPassphrase => write!(f, "empty passphrase"),
            Self::NoPassphraseRequired => write!(f, "no passphrase required"),
            Self::KeyRingNotFound => write!(f, "key ring not found"),
            Self::MalformedKeyMaterial => write!(f, "malformed key material"),
            Self::Error => write!(f, "unlock error"),
        }
    }
}

/// Result of submitting a candidate passphrase.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Symmetric passphrase accepted and cached.
    Symmetric,
    Unlocked(UnlockedKey),
    Failed(FailureReason),
}

impl SubmitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Symmetric | Self::Unlocked(_))
    }

    /// Identifier of the sub-key that actually unlocked, if any.
    pub fn unlocked_key_id(&self) -> Option<KeyId> {
        match self {
            Self::Unlocked(unlocked) => Some(unlocked.sub_key.key_id),
            _ => None,
        }
    }
}
