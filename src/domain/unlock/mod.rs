//! Unlock algorithm and its result types.

pub mod engine;
pub mod outcome;
pub mod provider;

pub use engine::UnlockEngine;
pub use outcome::{FailureReason, SubmitOutcome, UnlockAttemptResult, UnlockOutcome, UnlockedKey};
pub use provider::{DecryptError, KeyMaterialProvider};
