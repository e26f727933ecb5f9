//! # Credential Registry
//!
//! Composes one [`AccessControlManager`] and one [`CredentialLedger`] into
//! a single owned instance, binds the ledger's issuer check to the owned
//! manager, and journals every event a successful mutation produces.
//!
//! Failed mutations change nothing, including the journal.

use credreg_core::{CredentialId, Identity, Timestamp};
use serde::{Deserialize, Serialize};

use crate::access::AccessControlManager;
use crate::error::RegistryError;
use crate::event::{EventRecord, RegistryEvent};
use crate::ledger::CredentialLedger;
use crate::record::CredentialRecord;

/// Point-in-time overview of a registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySummary {
    /// Current administrator.
    pub administrator: Identity,
    /// Size of the authorized issuer set.
    pub issuer_count: usize,
    /// Number of credentials issued so far, revoked ones included.
    pub credential_count: u64,
    /// Sequence number of the newest journal entry, 0 when empty.
    pub last_event_sequence: u64,
}

/// Access control, ledger and event journal as one unit.
#[derive(Debug, Clone)]
pub struct CredentialRegistry {
    access: AccessControlManager,
    ledger: CredentialLedger,
    journal: Vec<EventRecord>,
}

impl CredentialRegistry {
    /// Create a registry administered by `administrator`.
    pub fn new(administrator: Identity) -> Self {
        Self {
            access: AccessControlManager::new(administrator),
            ledger: CredentialLedger::new(),
            journal: Vec::new(),
        }
    }

    // ─── Administration ──────────────────────────────────────────────

    /// See [`AccessControlManager::add_issuer`].
    pub fn add_issuer(
        &mut self,
        caller: &Identity,
        target: Identity,
    ) -> Result<RegistryEvent, RegistryError> {
        let event = self.access.add_issuer(caller, target)?;
        Ok(self.journal(event))
    }

    /// See [`AccessControlManager::remove_issuer`].
    pub fn remove_issuer(
        &mut self,
        caller: &Identity,
        target: Identity,
    ) -> Result<RegistryEvent, RegistryError> {
        let event = self.access.remove_issuer(caller, target)?;
        Ok(self.journal(event))
    }

    /// See [`AccessControlManager::transfer_administration`].
    pub fn transfer_administration(
        &mut self,
        caller: &Identity,
        new_administrator: Identity,
    ) -> Result<RegistryEvent, RegistryError> {
        let event = self
            .access
            .transfer_administration(caller, new_administrator)?;
        Ok(self.journal(event))
    }

    /// The current administrator.
    pub fn administrator(&self) -> Identity {
        self.access.administrator()
    }

    /// Whether `identity` holds the issuer role.
    pub fn is_authorized_issuer(&self, identity: &Identity) -> bool {
        self.access.is_authorized_issuer(identity)
    }

    /// Authorized issuers, sorted ascending.
    pub fn issuers(&self) -> Vec<Identity> {
        self.access.issuers()
    }

    // ─── Credentials ─────────────────────────────────────────────────

    /// Issue a credential, checking `caller` against this registry's issuer set.
    pub fn issue_credential(
        &mut self,
        caller: &Identity,
        holder: Identity,
        credential_type: impl Into<String>,
        metadata_uri: impl Into<String>,
    ) -> Result<(CredentialId, RegistryEvent), RegistryError> {
        let (id, event) = self.ledger.issue_credential(
            &self.access,
            caller,
            holder,
            credential_type,
            metadata_uri,
        )?;
        Ok((id, self.journal(event)))
    }

    /// See [`CredentialLedger::revoke_credential`].
    pub fn revoke_credential(
        &mut self,
        caller: &Identity,
        id: CredentialId,
        reason: impl Into<String>,
    ) -> Result<RegistryEvent, RegistryError> {
        let event = self.ledger.revoke_credential(caller, id, reason)?;
        Ok(self.journal(event))
    }

    /// Look up a record; `NotFound` for ids never issued.
    pub fn get_credential_by_id(&self, id: CredentialId) -> Result<&CredentialRecord, RegistryError> {
        self.ledger.get_credential_by_id(id)
    }

    /// Ids issued to `holder` in issuance order, revoked ones included.
    pub fn get_credentials_of(&self, holder: &Identity) -> &[CredentialId] {
        self.ledger.get_credentials_of(holder)
    }

    /// Whether `id` exists and has not been revoked.
    pub fn verify_credential(&self, id: CredentialId) -> bool {
        self.ledger.verify_credential(id)
    }

    /// Number of credentials issued so far.
    pub fn credential_count(&self) -> u64 {
        self.ledger.credential_count()
    }

    // ─── Journal ─────────────────────────────────────────────────────

    /// Journal entries with a sequence strictly greater than `sequence`.
    pub fn events_since(&self, sequence: u64) -> &[EventRecord] {
        // Sequences are 1-based and contiguous, so entry `n` sits at index `n - 1`.
        let start = usize::try_from(sequence).unwrap_or(usize::MAX);
        self.journal.get(start..).unwrap_or(&[])
    }

    /// Sequence number of the newest entry, 0 when the journal is empty.
    pub fn last_sequence(&self) -> u64 {
        self.journal.len() as u64
    }

    /// Administrator, counts and journal head in one value.
    pub fn summary(&self) -> RegistrySummary {
        RegistrySummary {
            administrator: self.administrator(),
            issuer_count: self.issuers().len(),
            credential_count: self.credential_count(),
            last_event_sequence: self.last_sequence(),
        }
    }

    fn journal(&mut self, event: RegistryEvent) -> RegistryEvent {
        self.journal.push(EventRecord {
            sequence: self.last_sequence() + 1,
            recorded_at: Timestamp::now(),
            event: event.clone(),
        });
        event
    }
}
