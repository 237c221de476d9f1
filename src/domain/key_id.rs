//! Key identifiers, including the reserved `Symmetric` and `None` sentinels.

use crate::foundation::{NONE_KEY_ID_RAW, SYMMETRIC_KEY_ID_RAW};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier for a master key or sub-key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyId {
    /// No asymmetric key involved; the passphrase is used directly for symmetric encryption.
    Symmetric,
    /// No passphrase required at all.
    None,
    Key(u64),
}

impl KeyId {
    /// Maps a raw 64-bit identifier, translating the reserved values to their sentinels.
    pub fn from_raw(raw: u64) -> Self {
        match raw {
            SYMMETRIC_KEY_ID_RAW => Self::Symmetric,
            NONE_KEY_ID_RAW => Self::None,
            other => Self::Key(other),
        }
    }

    pub fn raw(&self) -> u64 {
        match self {
            Self::Symmetric => SYMMETRIC_KEY_ID_RAW,
            Self::None => NONE_KEY_ID_RAW,
            Self::Key(raw) => *raw,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        !matches!(self, Self::Key(_))
    }

    /// Whether a passphrase for this identifier may be stored in the cache.
    pub fn is_cacheable(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Symmetric => write!(f, "symmetric"),
            Self::None => write!(f, "none"),
            Self::Key(raw) => write!(f, "{:#018x}", raw),
        }
    }
}

impl From<u64> for KeyId {
    fn from(value: u64) -> Self {
        Self::from_raw(value)
    }
}
