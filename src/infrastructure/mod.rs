//! Infrastructure layer: caching, key material backends, audit, config and logging.

pub mod cache;
pub mod config;
pub mod keys;
pub mod logging;
