//! # Registry Errors
//!
//! Every failure of a registry operation is one of three kinds:
//! the caller lacks a role or binding, the referenced credential does not
//! exist, or the ledger state forbids the operation (a final transition
//! re-applied, or no id left to assign). All of them
//! are deterministic functions of the caller, the arguments and the current
//! state, so none are retryable.

use credreg_core::{CredentialId, Identity};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Category of a [`RegistryError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Caller lacks the required role or binding.
    Unauthorized,
    /// Referenced credential has no record.
    NotFound,
    /// Ledger state forbids the operation.
    InvalidState,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::NotFound => "NOT_FOUND",
            Self::InvalidState => "INVALID_STATE",
        };
        f.write_str(s)
    }
}

/// The authorization rule a caller failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    /// Administrative operation attempted by someone other than the administrator.
    #[error("caller {caller} is not the administrator")]
    NotAdministrator {
        /// The rejected caller.
        caller: Identity,
    },

    /// Issuance attempted by an identity outside the issuer set.
    #[error("caller {caller} is not an authorized issuer")]
    NotAuthorizedIssuer {
        /// The rejected caller.
        caller: Identity,
    },

    /// Revocation attempted by someone other than the credential's issuer.
    #[error("only the original issuer may revoke credential {id} (caller {caller})")]
    NotOriginalIssuer {
        /// The rejected caller.
        caller: Identity,
        /// The credential the caller tried to revoke.
        id: CredentialId,
    },
}

/// Errors returned by registry operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Caller lacks the required role or binding.
    #[error("unauthorized: {0}")]
    Unauthorized(#[from] Denial),

    /// No credential record exists for the id.
    #[error("credential {0} does not exist")]
    NotFound(CredentialId),

    /// The credential has already been revoked.
    #[error("credential {0} already revoked")]
    InvalidState(CredentialId),

    /// Every credential id up to `u64::MAX` has been assigned.
    #[error("credential id space exhausted")]
    IdSpaceExhausted,
}

impl RegistryError {
    /// The category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::InvalidState(_) | Self::IdSpaceExhausted => ErrorKind::InvalidState,
        }
    }
}
