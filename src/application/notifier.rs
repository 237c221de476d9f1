//! Outbound notifications about how an unlock request ended.

use crate::domain::{FailureReason, KeyId};
use crate::foundation::UnlockError;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

/// Published once per terminal outcome. Never carries a passphrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "notice", rename_all = "snake_case")]
pub enum UnlockNotice {
    AlreadyCached { key_id: KeyId },
    NeedsPassphrase { key_id: KeyId },
    NoPassphraseRequired { key_id: KeyId },
    /// `unlocked_key_id` is the sub-key that accepted the passphrase; `None` for symmetric passphrases.
    Unlocked { key_id: KeyId, unlocked_key_id: Option<KeyId> },
    Failed { key_id: KeyId, reason: FailureReason },
    Cancelled { key_id: KeyId },
}

impl UnlockNotice {
    pub fn key_id(&self) -> KeyId {
        match self {
            Self::AlreadyCached { key_id }
            | Self::NeedsPassphrase { key_id }
            | Self::NoPassphraseRequired { key_id }
            | Self::Unlocked { key_id, .. }
            | Self::Failed { key_id, .. }
            | Self::Cancelled { key_id } => *key_id,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::AlreadyCached { .. } | Self::NoPassphraseRequired { .. } | Self::Unlocked { .. })
    }
}

pub trait UnlockNotifier: Send + Sync {
    fn notify(&self, notice: UnlockNotice) -> Result<(), UnlockError>;
}

/// Forwards notices into a tokio channel.
pub struct ChannelNotifier {
    tx: UnboundedSender<UnlockNotice>,
}

impl ChannelNotifier {
    pub fn new(tx: UnboundedSender<UnlockNotice>) -> Self {
        Self { tx }
    }
}

impl UnlockNotifier for ChannelNotifier {
    fn notify(&self, notice: UnlockNotice) -> Result<(), UnlockError> {
        self.tx
            .send(notice)
            .map_err(|err| UnlockError::NotificationFailed { details: format!("receiver dropped notice for key {}", err.0.key_id()) })
    }
}
