//! # Access Control
//!
//! [`AccessControlManager`] owns the administrator identity and the set of
//! authorized issuers. Only the administrator may change either. The two
//! roles are independent: the administrator is not implicitly an issuer,
//! and an issuer gains no administrative rights.
//!
//! ```text
//! administrator ──add/remove──▶ authorized issuers ──issue──▶ holders
//! ```

use std::collections::HashSet;

use credreg_core::Identity;

use crate::error::{Denial, RegistryError};
use crate::event::RegistryEvent;

/// Read-only issuer predicate consulted by the ledger.
///
/// This is the only channel between the access-control component and the
/// ledger; the ledger never sees the issuer set itself.
pub trait IssuerAuthority {
    /// Whether `identity` may currently issue credentials.
    fn is_authorized_issuer(&self, identity: &Identity) -> bool;
}

/// Administrator identity plus the authorized issuer set.
#[derive(Debug, Clone)]
pub struct AccessControlManager {
    administrator: Identity,
    authorized_issuers: HashSet<Identity>,
}

impl AccessControlManager {
    /// Create a manager with the given administrator and no issuers.
    pub fn new(administrator: Identity) -> Self {
        Self {
            administrator,
            authorized_issuers: HashSet::new(),
        }
    }

    /// The current administrator.
    pub fn administrator(&self) -> Identity {
        self.administrator
    }

    /// Grant the issuer role to `target`.
    ///
    /// Re-adding an existing issuer succeeds and still yields an event.
    pub fn add_issuer(
        &mut self,
        caller: &Identity,
        target: Identity,
    ) -> Result<RegistryEvent, RegistryError> {
        self.require_administrator(caller)?;
        self.authorized_issuers.insert(target);
        Ok(RegistryEvent::IssuerAdded { issuer: target })
    }

    /// Revoke the issuer role from `target`.
    ///
    /// Removing an identity that is not an issuer succeeds and still yields
    /// an event. Credentials already issued by `target` are unaffected.
    pub fn remove_issuer(
        &mut self,
        caller: &Identity,
        target: Identity,
    ) -> Result<RegistryEvent, RegistryError> {
        self.require_administrator(caller)?;
        self.authorized_issuers.remove(&target);
        Ok(RegistryEvent::IssuerRemoved { issuer: target })
    }

    /// Hand the administrator role to `new_administrator`.
    ///
    /// The issuer set is left untouched.
    pub fn transfer_administration(
        &mut self,
        caller: &Identity,
        new_administrator: Identity,
    ) -> Result<RegistryEvent, RegistryError> {
        self.require_administrator(caller)?;
        let previous = std::mem::replace(&mut self.administrator, new_administrator);
        Ok(RegistryEvent::AdministrationTransferred {
            previous,
            current: new_administrator,
        })
    }

    /// Whether `identity` is in the issuer set.
    pub fn is_authorized_issuer(&self, identity: &Identity) -> bool {
        self.authorized_issuers.contains(identity)
    }

    /// All authorized issuers, sorted ascending.
    pub fn issuers(&self) -> Vec<Identity> {
        let mut issuers: Vec<Identity> = self.authorized_issuers.iter().copied().collect();
        issuers.sort_unstable();
        issuers
    }

    fn require_administrator(&self, caller: &Identity) -> Result<(), RegistryError> {
        if *caller == self.administrator {
            Ok(())
        } else {
            Err(Denial::NotAdministrator { caller: *caller }.into())
        }
    }
}

impl IssuerAuthority for AccessControlManager {
    fn is_authorized_issuer(&self, identity: &Identity) -> bool {
        AccessControlManager::is_authorized_issuer(self, identity)
    }
}
