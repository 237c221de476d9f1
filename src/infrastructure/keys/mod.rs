//! Key material infrastructure: sealed sub-key storage, backends, audit and prompting.

pub mod audit;
pub mod backends;
pub mod panic_guard;
pub mod passphrase;
pub mod protected_blob;
pub mod protected_memory;

pub use audit::{CacheEvent, CacheOperation, FileAuditLogger, NoopAuditLogger, UnlockAttemptEvent, UnlockAuditLogger};
pub use backends::InMemoryKeyMaterialProvider;
pub use passphrase::{PassphrasePrompter, PromptRequest, TerminalPrompter};
pub use protected_blob::{seal_protection, Argon2Params, ProtectedKeyBlob};
pub use protected_memory::ProtectedSecret;
