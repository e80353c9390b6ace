//! Error types for the notary engine

use axum::http::StatusCode;

/// Main error type for notary operations
#[derive(Debug, thiserror::Error)]
pub enum NotaryError {
    /// Malformed hex payload (odd length, non-hex digit, invalid UTF-8)
    #[error("Format error: {0}")]
    Format(String),

    /// Account balance below the configured funds floor
    #[error("Insufficient funds: balance {balance} below floor {floor}")]
    InsufficientFunds { balance: String, floor: String },

    /// Permanent node rejection (bad nonce, malformed signature, insufficient fee).
    /// Not retryable.
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),

    /// Transient connectivity failure. Retry policy is owned by the caller.
    #[error("Network error: {0}")]
    RetryableNetwork(String),

    /// Confirmation wait exceeded. The broadcast is NOT canceled; the
    /// transaction may still confirm. Re-check by hash before resubmitting.
    #[error("Confirmation timeout for transaction {hash} after {timeout_secs}s")]
    Timeout { hash: String, timeout_secs: u64 },

    /// Claimed identity key absent from the trusted record table
    #[error("No matching record for claimed identity")]
    NoMatchingRecord,

    /// Claimant failed the eligibility check; no transaction was submitted
    #[error("Not eligible (fraud score {fraud_score}): {reason}")]
    NotEligible { fraud_score: u8, reason: String },

    /// Missing or malformed key material / settings
    #[error("Configuration error: {0}")]
    Config(String),

    /// Claim ledger failure
    #[error("Ledger error: {0}")]
    Ledger(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl NotaryError {
    /// Convert error to HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Format(_) => StatusCode::BAD_REQUEST,
            Self::InsufficientFunds { .. } => StatusCode::PAYMENT_REQUIRED,
            Self::InvalidTransaction(_) => StatusCode::BAD_GATEWAY,
            Self::RetryableNetwork(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            Self::NoMatchingRecord => StatusCode::NOT_FOUND,
            Self::NotEligible { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Ledger(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the caller may safely retry the operation
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RetryableNetwork(_) | Self::Ledger(_))
    }
}

// From conversions for common error types

impl From<std::io::Error> for NotaryError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for NotaryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON error: {}", err))
    }
}

impl From<reqwest::Error> for NotaryError {
    fn from(err: reqwest::Error) -> Self {
        Self::RetryableNetwork(err.to_string())
    }
}

impl From<rusqlite::Error> for NotaryError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Ledger(err.to_string())
    }
}

/// Result type alias for notary operations
pub type Result<T> = std::result::Result<T, NotaryError>;
