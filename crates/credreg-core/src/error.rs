//! # Validation Errors
//!
//! Errors raised when constructing core value types from untrusted input.
//! Each variant carries the rejected value so operators can diagnose
//! misconfiguration without guesswork.

use thiserror::Error;

/// Format validation failure for a core value type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Identity string is not `0x` followed by 40 hex digits.
    #[error("invalid identity: \"{0}\" (expected 0x followed by 40 hex digits)")]
    InvalidIdentity(String),

    /// Credential id zero is reserved and never assigned.
    #[error("invalid credential id: 0 is reserved")]
    ReservedCredentialId,

    /// Credential id string is not an unsigned integer.
    #[error("invalid credential id: \"{0}\" (expected a positive integer)")]
    InvalidCredentialId(String),

    /// Timestamp string is not valid UTC ISO 8601.
    #[error("invalid timestamp: \"{value}\" ({reason})")]
    InvalidTimestamp {
        /// The string that failed to parse.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}
