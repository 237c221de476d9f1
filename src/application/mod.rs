//! Application layer: unlock orchestration across the domain engine, the cache and I/O adapters.

pub mod notifier;
pub mod orchestrator;

pub use notifier::{ChannelNotifier, UnlockNotice, UnlockNotifier};
pub use orchestrator::{PromptedUnlock, UnlockOrchestrator};
