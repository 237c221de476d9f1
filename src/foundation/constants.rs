//! System-wide constants for key unlocking and passphrase caching.

/// Nanoseconds per second (10^9).
pub const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Default lifetime of a cached passphrase (3 minutes).
pub const DEFAULT_CACHE_TTL_SECS: u64 = 180;

/// Default interval between background sweeps of expired cache entries.
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

/// Position of the master key inside a key ring.
pub const MASTER_KEY_POSITION: usize = 0;

/// Reserved numeric value of the `Symmetric` key identifier.
pub const SYMMETRIC_KEY_ID_RAW: u64 = 0xFFFF_FFFF_FFFF_FFFF;

/// Reserved numeric value of the `None` key identifier.
pub const NONE_KEY_ID_RAW: u64 = 0;

/// Argon2id memory cost (KiB) used when protecting key material.
pub const DEFAULT_KDF_M_COST: u32 = 65536;

/// Argon2id iteration count used when protecting key material.
pub const DEFAULT_KDF_T_COST: u32 = 3;

/// Argon2id parallelism used when protecting key material.
pub const DEFAULT_KDF_P_COST: u32 = 4;

/// Upper bound on the Argon2id memory cost (KiB) accepted from a sealed blob header (1 GiB).
pub const MAX_KDF_M_COST: u32 = 1_048_576;

/// Upper bound on the Argon2id iteration count accepted from a sealed blob header.
pub const MAX_KDF_T_COST: u32 = 16;

/// Upper bound on the Argon2id parallelism accepted from a sealed blob header.
pub const MAX_KDF_P_COST: u32 = 16;

/// Shortest interval the background cache sweeper will tick at.
pub const MIN_SWEEP_INTERVAL_MILLIS: u64 = 100;
