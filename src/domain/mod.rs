//! Domain layer: key identifiers, key rings and the synchronous unlock algorithm.

pub mod key_id;
pub mod key_ring;
pub mod secret;
pub mod unlock;

pub use key_id::KeyId;
pub use key_ring::{KeyRing, KeyUsage, PrivateKeyHandle, Protection, SubKey, SubKeyInfo};
pub use secret::{Passphrase, SecretBytes};
pub use unlock::{
    DecryptError, FailureReason, KeyMaterialProvider, SubmitOutcome, UnlockAttemptResult, UnlockEngine, UnlockOutcome, UnlockedKey,
};
