//! Audit logging for unlock attempts and passphrase cache operations.
//!
//! Events carry key identifiers and outcomes only; passphrases never reach this module.

use crate::foundation::UnlockError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub type Timestamp = u64;

pub fn now_nanos() -> Timestamp {
    crate::foundation::now_nanos()
}

/// Request ID for correlating operations in audit logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(u64);

impl RequestId {
    pub fn new() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req-{:016x}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum UnlockResultKind {
    Unlocked,
    Symmetric,
    WrongPassphrase,
    NoUsableKey,
    Error { error: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnlockAttemptEvent {
    pub timestamp: Timestamp,
    pub request_id: RequestId,
    pub key_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub master_key_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unlocked_key_id: Option<String>,
    pub attempts: usize,
    pub result: UnlockResultKind,
    pub duration_micros: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheOperation {
    Put,
    Hit,
    Miss,
    Invalidate,
    InvalidateAll,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEvent {
    pub timestamp: Timestamp,
    pub key_id: String,
    pub operation: CacheOperation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl_secs: Option<u64>,
}

impl CacheEvent {
    pub fn new(key_id: impl ToString, operation: CacheOperation) -> Self {
        Self { timestamp: now_nanos(), key_id: key_id.to_string(), operation, ttl_secs: None }
    }

    pub fn with_ttl_secs(mut self, ttl_secs: u64) -> Self {
        self.ttl_secs = Some(ttl_secs);
        self
    }
}

pub trait UnlockAuditLogger: Send + Sync {
    fn log_unlock_attempt<'a>(&'a self, event: UnlockAttemptEvent) -> Pin<Box<dyn Future<Output = Result<(), UnlockError>> + Send + 'a>>;

    fn log_cache_event<'a>(&'a self, event: CacheEvent) -> Pin<Box<dyn Future<Output = Result<(), UnlockError>> + Send + 'a>>;
}

pub struct NoopAuditLogger;

impl UnlockAuditLogger for NoopAuditLogger {
    fn log_unlock_attempt<'a>(&'a self, _event: UnlockAttemptEvent) -> Pin<Box<dyn Future<Output = Result<(), UnlockError>> + Send + 'a>> {
        Box::pin(async { Ok(()) })
    }

    fn log_cache_event<'a>(&'a self, _event: CacheEvent) -> Pin<Box<dyn Future<Output = Result<(), UnlockError>> + Send + 'a>> {
        Box::pin(async { Ok(()) })
    }
}

/// Appends one JSON object per line.
pub struct FileAuditLogger {
    file: Arc<tokio::sync::Mutex<std::fs::File>>,
}

impl FileAuditLogger {
    pub fn new(path: impl AsRef<std::path::Path>) -> Result<Self, UnlockError> {
        use std::fs::OpenOptions;

        let file = OpenOptions::new().create(true).append(true).open(path.as_ref()).map_err(|e| UnlockError::AuditLogError {
            details: format!("failed to open audit log: {}", e),
            source: Some(Box::new(e)),
        })?;

        Ok(Self { file: Arc::new(tokio::sync::Mutex::new(file)) })
    }

    async fn write_event(&self, event: impl Serialize) -> Result<(), UnlockError> {
        use std::io::Write;

        let json = serde_json::to_string(&event).map_err(|e| UnlockError::AuditLogError {
            details: format!("failed to serialize audit event: {}", e),
            source: Some(Box::new(e)),
        })?;

        let mut file = self.file.lock().await;
        writeln!(file, "{}", json)
            .and_then(|_| file.flush())
            .map_err(|e| UnlockError::AuditLogError { details: format!("failed to write audit event: {}", e), source: Some(Box::new(e)) })
    }
}

impl UnlockAuditLogger for FileAuditLogger {
    fn log_unlock_attempt<'a>(&'a self, event: UnlockAttemptEvent) -> Pin<Box<dyn Future<Output = Result<(), UnlockError>> + Send + 'a>> {
        Box::pin(self.write_event(serde_json::json!({ "event_type": "unlock_attempt", "event": event })))
    }

    fn log_cache_event<'a>(&'a self, event: CacheEvent) -> Pin<Box<dyn Future<Output = Result<(), UnlockError>> + Send + 'a>> {
        Box::pin(self.write_event(serde_json::json!({ "event_type": "cache", "event": event })))
    }
}
