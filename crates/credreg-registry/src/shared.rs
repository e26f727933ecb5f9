//! # Shared Registry Handle
//!
//! [`SharedRegistry`] is a cloneable handle to one [`CredentialRegistry`]
//! behind a `parking_lot::RwLock`. Each mutation holds the write lock for
//! its whole check-and-apply sequence, so mutations are serialized and a
//! reader never sees one half-applied. Reads share the lock and return
//! owned values, so no guard outlives a call.
//!
//! The lock is never held across an `.await`; every operation is a bounded
//! in-memory transition. This is also where registry activity is logged.

use std::sync::Arc;

use credreg_core::{CredentialId, Identity};
use parking_lot::RwLock;

use crate::error::{ErrorKind, RegistryError};
use crate::event::{EventRecord, RegistryEvent};
use crate::record::CredentialRecord;
use crate::registry::{CredentialRegistry, RegistrySummary};

/// Thread-safe handle to a single registry instance.
#[derive(Debug, Clone)]
pub struct SharedRegistry {
    inner: Arc<RwLock<CredentialRegistry>>,
}

impl SharedRegistry {
    /// Create a new registry administered by `administrator`.
    pub fn new(administrator: Identity) -> Self {
        Self::from_registry(CredentialRegistry::new(administrator))
    }

    /// Wrap an existing registry.
    pub fn from_registry(registry: CredentialRegistry) -> Self {
        Self {
            inner: Arc::new(RwLock::new(registry)),
        }
    }

    // ─── Mutations ───────────────────────────────────────────────────

    /// Grant the issuer role. Administrator only.
    pub fn add_issuer(
        &self,
        caller: &Identity,
        target: Identity,
    ) -> Result<RegistryEvent, RegistryError> {
        let result = self.inner.write().add_issuer(caller, target);
        log_outcome("add_issuer", caller, &result);
        result
    }

    /// Withdraw the issuer role. Administrator only.
    pub fn remove_issuer(
        &self,
        caller: &Identity,
        target: Identity,
    ) -> Result<RegistryEvent, RegistryError> {
        let result = self.inner.write().remove_issuer(caller, target);
        log_outcome("remove_issuer", caller, &result);
        result
    }

    /// Hand the administrator role to `new_administrator`.
    pub fn transfer_administration(
        &self,
        caller: &Identity,
        new_administrator: Identity,
    ) -> Result<RegistryEvent, RegistryError> {
        let result = self
            .inner
            .write()
            .transfer_administration(caller, new_administrator);
        log_outcome("transfer_administration", caller, &result);
        result
    }

    /// Issue a credential under the write lock.
    pub fn issue_credential(
        &self,
        caller: &Identity,
        holder: Identity,
        credential_type: impl Into<String>,
        metadata_uri: impl Into<String>,
    ) -> Result<(CredentialId, RegistryEvent), RegistryError> {
        let result = self
            .inner
            .write()
            .issue_credential(caller, holder, credential_type, metadata_uri);
        match &result {
            Ok((id, event)) => tracing::info!(
                operation = "issue_credential",
                caller = %caller,
                event = event.name(),
                credential_id = %id,
                holder = %holder,
                "registry mutation applied"
            ),
            Err(err) => log_denial("issue_credential", caller, err),
        }
        result
    }

    /// Revoke a credential under the write lock.
    pub fn revoke_credential(
        &self,
        caller: &Identity,
        id: CredentialId,
        reason: impl Into<String>,
    ) -> Result<RegistryEvent, RegistryError> {
        let result = self.inner.write().revoke_credential(caller, id, reason);
        log_outcome("revoke_credential", caller, &result);
        result
    }

    // ─── Reads ───────────────────────────────────────────────────────

    /// Run `f` against a consistent snapshot under the read lock.
    ///
    /// `f` must not call back into this handle.
    pub fn read<R>(&self, f: impl FnOnce(&CredentialRegistry) -> R) -> R {
        f(&*self.inner.read())
    }

    /// The current administrator.
    pub fn administrator(&self) -> Identity {
        self.inner.read().administrator()
    }

    /// Whether `identity` holds the issuer role.
    pub fn is_authorized_issuer(&self, identity: &Identity) -> bool {
        self.inner.read().is_authorized_issuer(identity)
    }

    /// Authorized issuers, sorted ascending.
    pub fn issuers(&self) -> Vec<Identity> {
        self.inner.read().issuers()
    }

    /// A copy of the record for `id`.
    pub fn get_credential_by_id(&self, id: CredentialId) -> Result<CredentialRecord, RegistryError> {
        self.inner.read().get_credential_by_id(id).cloned()
    }

    /// Ids issued to `holder`, in issuance order.
    pub fn get_credentials_of(&self, holder: &Identity) -> Vec<CredentialId> {
        self.inner.read().get_credentials_of(holder).to_vec()
    }

    /// Whether `id` exists and is still valid.
    pub fn verify_credential(&self, id: CredentialId) -> bool {
        self.inner.read().verify_credential(id)
    }

    /// Number of credentials issued so far.
    pub fn credential_count(&self) -> u64 {
        self.inner.read().credential_count()
    }

    /// Journal entries after `sequence`, copied out of the lock.
    pub fn events_since(&self, sequence: u64) -> Vec<EventRecord> {
        self.inner.read().events_since(sequence).to_vec()
    }

    /// Registry summary from one snapshot.
    pub fn summary(&self) -> RegistrySummary {
        self.inner.read().summary()
    }
}

fn log_outcome(
    operation: &'static str,
    caller: &Identity,
    result: &Result<RegistryEvent, RegistryError>,
) {
    match result {
        Ok(event) => {
            tracing::info!(operation, caller = %caller, event = event.name(), "registry mutation applied")
        }
        Err(err) => log_denial(operation, caller, err),
    }
}

fn log_denial(operation: &'static str, caller: &Identity, err: &RegistryError) {
    match err.kind() {
        ErrorKind::Unauthorized => {
            tracing::warn!(operation, caller = %caller, error = %err, "registry mutation denied")
        }
        ErrorKind::NotFound | ErrorKind::InvalidState => {
            tracing::debug!(operation, caller = %caller, error = %err, "registry mutation rejected")
        }
    }
}
