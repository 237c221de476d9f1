use std::io;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    KeyRingNotFound,
    MalformedKeyMaterial,
    KeyMaterialUnavailable,
    CryptoError,
    ConfigError,
    AuditLogError,
    NotificationFailed,
    PromptFailed,
    WorkerFailed,
    Message,
}

#[derive(Debug, Error)]
pub enum UnlockError {
    #[error("key ring not found for key {key_id}")]
    KeyRingNotFound { key_id: String },

    #[error("malformed key material for key {key_id}: {details}")]
    MalformedKeyMaterial { key_id: String, details: String },

    #[error("key material unavailable: {details}")]
    KeyMaterialUnavailable { details: String },

    #[error("crypto error during {operation}: {details}")]
    CryptoError { operation: String, details: String },

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("audit log error: {details}")]
    AuditLogError {
        details: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("notification failed: {details}")]
    NotificationFailed { details: String },

    #[error("passphrase prompt failed: {details}")]
    PromptFailed { details: String },

    #[error("unlock worker failed: {details}")]
    WorkerFailed { details: String },

    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, UnlockError>;

impl UnlockError {
    pub fn code(&self) -> ErrorCode {
        match self {
            UnlockError::KeyRingNotFound { .. } => ErrorCode::KeyRingNotFound,
            UnlockError::MalformedKeyMaterial { .. } => ErrorCode::MalformedKeyMaterial,
            UnlockError::KeyMaterialUnavailable { .. } => ErrorCode::KeyMaterialUnavailable,
            UnlockError::CryptoError { .. } => ErrorCode::CryptoError,
            UnlockError::ConfigError(_) => ErrorCode::ConfigError,
            UnlockError::AuditLogError { .. } => ErrorCode::AuditLogError,
            UnlockError::NotificationFailed { .. } => ErrorCode::NotificationFailed,
            UnlockError::PromptFailed { .. } => ErrorCode::PromptFailed,
            UnlockError::WorkerFailed { .. } => ErrorCode::WorkerFailed,
            UnlockError::Message(_) => ErrorCode::Message,
        }
    }

    pub fn key_ring_not_found(key_id: impl ToString) -> Self {
        UnlockError::KeyRingNotFound { key_id: key_id.to_string() }
    }

    pub fn malformed_key_material(key_id: impl ToString, details: impl Into<String>) -> Self {
        UnlockError::MalformedKeyMaterial { key_id: key_id.to_string(), details: details.into() }
    }

    pub fn key_material_unavailable(details: impl Into<String>) -> Self {
        UnlockError::KeyMaterialUnavailable { details: details.into() }
    }

    pub fn crypto(operation: impl Into<String>, details: impl Into<String>) -> Self {
        UnlockError::CryptoError { operation: operation.into(), details: details.into() }
    }

    pub fn prompt_failed(details: impl Into<String>) -> Self {
        UnlockError::PromptFailed { details: details.into() }
    }
}

impl From<io::Error> for UnlockError {
    fn from(err: io::Error) -> Self {
        UnlockError::Message(err.to_string())
    }
}

impl From<tokio::task::JoinError> for UnlockError {
    fn from(err: tokio::task::JoinError) -> Self {
        UnlockError::WorkerFailed { details: err.to_string() }
    }
}
