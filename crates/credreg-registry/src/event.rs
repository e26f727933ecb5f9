//! # Registry Events
//!
//! Every successful mutation produces exactly one [`RegistryEvent`],
//! returned to the caller together with the result of the mutation. The
//! [`CredentialRegistry`](crate::CredentialRegistry) additionally appends
//! each event to its journal as an [`EventRecord`].

use credreg_core::{CredentialId, Identity, Timestamp};
use serde::{Deserialize, Serialize};

/// Notification describing an applied mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "PascalCase")]
pub enum RegistryEvent {
    /// An identity was granted the issuer role.
    IssuerAdded {
        /// The identity added to the issuer set.
        issuer: Identity,
    },
    /// An identity lost the issuer role.
    IssuerRemoved {
        /// The identity removed from the issuer set.
        issuer: Identity,
    },
    /// A credential record was created.
    CredentialIssued {
        /// The id assigned to the new record.
        id: CredentialId,
        /// The issuing caller.
        issuer: Identity,
        /// The recipient.
        holder: Identity,
        /// Free-form credential label.
        credential_type: String,
    },
    /// A credential record moved to `Revoked`.
    CredentialRevoked {
        /// The revoked record.
        id: CredentialId,
        /// The revoking caller, always the original issuer.
        issuer: Identity,
        /// Reason supplied at revocation.
        reason: String,
    },
    /// The administrator role moved to a new identity.
    AdministrationTransferred {
        /// The administrator before the transfer.
        previous: Identity,
        /// The administrator after the transfer.
        current: Identity,
    },
}

impl RegistryEvent {
    /// Event name as used in logs and interface descriptors.
    pub fn name(&self) -> &'static str {
        match self {
            Self::IssuerAdded { .. } => "IssuerAdded",
            Self::IssuerRemoved { .. } => "IssuerRemoved",
            Self::CredentialIssued { .. } => "CredentialIssued",
            Self::CredentialRevoked { .. } => "CredentialRevoked",
            Self::AdministrationTransferred { .. } => "AdministrationTransferred",
        }
    }

    /// All event names, in declaration order.
    pub const NAMES: [&'static str; 5] = [
        "IssuerAdded",
        "IssuerRemoved",
        "CredentialIssued",
        "CredentialRevoked",
        "AdministrationTransferred",
    ];
}

/// A journaled event with its position in the registry's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// 1-based position in the journal.
    pub sequence: u64,
    /// When the event was journaled.
    pub recorded_at: Timestamp,
    /// The event itself.
    #[serde(flatten)]
    pub event: RegistryEvent,
}
