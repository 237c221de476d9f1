//! In-memory passphrase cache and its background sweeper.

pub mod passphrase_cache;
pub mod sweeper;

pub use passphrase_cache::{CacheEntry, PassphraseCache};
pub use sweeper::CacheSweeper;
