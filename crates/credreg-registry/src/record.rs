//! # Credential Records
//!
//! A [`CredentialRecord`] is permanent once created. Its only mutation is
//! the single `Valid → Revoked` transition, and the revocation reason lives
//! inside the `Revoked` variant so a valid record cannot carry one.
//!
//! ```text
//! Valid ──revoke(reason)──▶ Revoked { reason } (terminal)
//! ```

use credreg_core::{CredentialId, Identity, Timestamp};
use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

// ─── Credential Status ───────────────────────────────────────────────

/// Lifecycle status of a credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CredentialStatus {
    /// The credential stands.
    Valid,
    /// The credential was withdrawn by its issuer (terminal).
    Revoked {
        /// Reason supplied by the issuer.
        reason: String,
        /// When the revocation was applied.
        revoked_at: Timestamp,
    },
}

impl CredentialStatus {
    /// Whether the status is `Valid`.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

impl std::fmt::Display for CredentialStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Valid => f.write_str("VALID"),
            Self::Revoked { .. } => f.write_str("REVOKED"),
        }
    }
}

// ─── Credential Record ───────────────────────────────────────────────

/// A single issued credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// Ledger-assigned id.
    pub id: CredentialId,
    /// Recipient of the credential.
    pub holder: Identity,
    /// The identity that issued it; the only one allowed to revoke it.
    pub issuer: Identity,
    /// Free-form label, e.g. "Degree".
    pub credential_type: String,
    /// Opaque pointer to descriptive data held elsewhere.
    pub metadata_uri: String,
    /// Issuance time.
    pub issued_at: Timestamp,
    /// Current lifecycle status.
    pub status: CredentialStatus,
}

impl CredentialRecord {
    /// Whether the credential is still valid.
    pub fn is_valid(&self) -> bool {
        self.status.is_valid()
    }

    /// The revocation reason, or the empty string while valid.
    pub fn revocation_reason(&self) -> &str {
        match &self.status {
            CredentialStatus::Valid => "",
            CredentialStatus::Revoked { reason, .. } => reason,
        }
    }

    /// When the credential was revoked, if it was.
    pub fn revoked_at(&self) -> Option<Timestamp> {
        match &self.status {
            CredentialStatus::Valid => None,
            CredentialStatus::Revoked { revoked_at, .. } => Some(*revoked_at),
        }
    }

    /// Apply the `Valid → Revoked` transition.
    ///
    /// The issuer binding is checked by the ledger before this is called.
    pub(crate) fn revoke(&mut self, reason: String, at: Timestamp) -> Result<(), RegistryError> {
        if !self.status.is_valid() {
            return Err(RegistryError::InvalidState(self.id));
        }
        self.status = CredentialStatus::Revoked {
            reason,
            revoked_at: at,
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> CredentialRecord {
        CredentialRecord {
            id: CredentialId::FIRST,
            holder: Identity::from_bytes([2; 20]),
            issuer: Identity::from_bytes([1; 20]),
            credential_type: "Degree".to_string(),
            metadata_uri: "ipfs://x".to_string(),
            issued_at: Timestamp::parse("2026-01-15T12:00:00Z").unwrap(),
            status: CredentialStatus::Valid,
        }
    }

    #[test]
    fn fresh_record_is_valid_without_reason() {
        let rec = record();
        assert!(rec.is_valid());
        assert_eq!(rec.revocation_reason(), "");
        assert_eq!(rec.revoked_at(), None);
        assert_eq!(rec.status.to_string(), "VALID");
    }

    #[test]
    fn revoke_sets_reason_once() {
        let mut rec = record();
        let at = Timestamp::parse("2026-02-01T00:00:00Z").unwrap();
        rec.revoke("expired".into(), at).unwrap();
        assert!(!rec.is_valid());
        assert_eq!(rec.revocation_reason(), "expired");
        assert_eq!(rec.revoked_at(), Some(at));
        assert_eq!(rec.status.to_string(), "REVOKED");

        let err = rec.revoke("again".into(), Timestamp::now()).unwrap_err();
        assert_eq!(err, RegistryError::InvalidState(CredentialId::FIRST));
        assert_eq!(rec.revocation_reason(), "expired");
        assert_eq!(rec.revoked_at(), Some(at));
    }

    #[test]
    fn status_serializes_with_state_tag() {
        let json = serde_json::to_value(CredentialStatus::Valid).unwrap();
        assert_eq!(json, serde_json::json!({"state": "VALID"}));

        let revoked = CredentialStatus::Revoked {
            reason: "fraud".into(),
            revoked_at: Timestamp::parse("2026-02-01T00:00:00Z").unwrap(),
        };
        let json = serde_json::to_value(&revoked).unwrap();
        assert_eq!(json["state"], "REVOKED");
        assert_eq!(json["reason"], "fraud");
    }
}
