//! Key material backends.

pub mod memory_provider;

pub use memory_provider::InMemoryKeyMaterialProvider;
