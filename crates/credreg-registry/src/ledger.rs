//! # Credential Ledger
//!
//! Owns the credential records, the monotonic id sequence and the
//! per-holder index. Issuance is gated on the [`IssuerAuthority`]
//! predicate; revocation is gated on the record's own issuer binding.
//!
//! ## Revocation checks
//!
//! Checked in order, first failure wins:
//!
//! 1. the record exists (`NotFound`);
//! 2. the caller is the record's issuer (`Unauthorized`). Current issuer
//!    membership is neither required nor sufficient;
//! 3. the record is still valid (`InvalidState`).

use std::collections::{BTreeMap, HashMap};

use credreg_core::{CredentialId, Identity, Timestamp};

use crate::access::IssuerAuthority;
use crate::error::{Denial, RegistryError};
use crate::event::RegistryEvent;
use crate::record::{CredentialRecord, CredentialStatus};

/// Append-mostly store of credential records.
#[derive(Debug, Clone)]
pub struct CredentialLedger {
    /// `None` once `u64::MAX` has been assigned.
    next_id: Option<CredentialId>,
    records: BTreeMap<CredentialId, CredentialRecord>,
    holder_index: HashMap<Identity, Vec<CredentialId>>,
}

impl CredentialLedger {
    /// Create an empty ledger. The first issued id is 1.
    pub fn new() -> Self {
        Self {
            next_id: Some(CredentialId::FIRST),
            records: BTreeMap::new(),
            holder_index: HashMap::new(),
        }
    }

    /// Issue a new credential to `holder`.
    ///
    /// Fails with `Unauthorized` when `caller` is not an authorized issuer
    /// according to `authority`; in that case no id is consumed. Fails with
    /// `IdSpaceExhausted` once every id has been assigned, so no id is ever
    /// handed out twice.
    pub fn issue_credential(
        &mut self,
        authority: &impl IssuerAuthority,
        caller: &Identity,
        holder: Identity,
        credential_type: impl Into<String>,
        metadata_uri: impl Into<String>,
    ) -> Result<(CredentialId, RegistryEvent), RegistryError> {
        if !authority.is_authorized_issuer(caller) {
            return Err(Denial::NotAuthorizedIssuer { caller: *caller }.into());
        }

        let id = self.next_id.ok_or(RegistryError::IdSpaceExhausted)?;
        self.next_id = id.next();

        let credential_type = credential_type.into();
        let record = CredentialRecord {
            id,
            holder,
            issuer: *caller,
            credential_type: credential_type.clone(),
            metadata_uri: metadata_uri.into(),
            issued_at: Timestamp::now(),
            status: CredentialStatus::Valid,
        };
        self.records.insert(id, record);
        self.holder_index.entry(holder).or_default().push(id);

        Ok((
            id,
            RegistryEvent::CredentialIssued {
                id,
                issuer: *caller,
                holder,
                credential_type,
            },
        ))
    }

    /// Revoke credential `id` on behalf of `caller`.
    pub fn revoke_credential(
        &mut self,
        caller: &Identity,
        id: CredentialId,
        reason: impl Into<String>,
    ) -> Result<RegistryEvent, RegistryError> {
        let record = self
            .records
            .get_mut(&id)
            .ok_or(RegistryError::NotFound(id))?;

        if record.issuer != *caller {
            return Err(Denial::NotOriginalIssuer {
                caller: *caller,
                id,
            }
            .into());
        }

        let reason = reason.into();
        record.revoke(reason.clone(), Timestamp::now())?;

        Ok(RegistryEvent::CredentialRevoked {
            id,
            issuer: *caller,
            reason,
        })
    }

    /// Look up a record by id.
    pub fn get_credential_by_id(&self, id: CredentialId) -> Result<&CredentialRecord, RegistryError> {
        self.records.get(&id).ok_or(RegistryError::NotFound(id))
    }

    /// Ids issued to `holder`, in issuance order. Includes revoked ids.
    pub fn get_credentials_of(&self, holder: &Identity) -> &[CredentialId] {
        self.holder_index
            .get(holder)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether `id` exists and is still valid.
    pub fn verify_credential(&self, id: CredentialId) -> bool {
        self.records.get(&id).is_some_and(CredentialRecord::is_valid)
    }

    /// Number of credentials issued so far.
    pub fn credential_count(&self) -> u64 {
        self.records.len() as u64
    }

    /// The id the next successful issuance will receive, if any remain.
    pub fn next_id(&self) -> Option<CredentialId> {
        self.next_id
    }
}

impl Default for CredentialLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::AccessControlManager;
    use crate::error::ErrorKind;

    fn id(byte: u8) -> Identity {
        Identity::from_bytes([byte; 20])
    }

    const ADMIN: u8 = 1;
    const ISSUER: u8 = 2;
    const HOLDER: u8 = 3;

    fn setup() -> (AccessControlManager, CredentialLedger) {
        let mut acm = AccessControlManager::new(id(ADMIN));
        acm.add_issuer(&id(ADMIN), id(ISSUER)).unwrap();
        (acm, CredentialLedger::new())
    }

    fn cid(n: u64) -> CredentialId {
        CredentialId::new(n).unwrap()
    }

    #[test]
    fn first_id_is_one() {
        let (acm, mut ledger) = setup();
        let (first, event) = ledger
            .issue_credential(&acm, &id(ISSUER), id(HOLDER), "Degree", "ipfs://x")
            .unwrap();
        assert_eq!(first, cid(1));
        assert_eq!(
            event,
            RegistryEvent::CredentialIssued {
                id: cid(1),
                issuer: id(ISSUER),
                holder: id(HOLDER),
                credential_type: "Degree".into(),
            }
        );
    }

    #[test]
    fn fresh_record_is_valid() {
        let (acm, mut ledger) = setup();
        let (cred, _) = ledger
            .issue_credential(&acm, &id(ISSUER), id(HOLDER), "Degree", "ipfs://x")
            .unwrap();
        let rec = ledger.get_credential_by_id(cred).unwrap();
        assert_eq!(rec.holder, id(HOLDER));
        assert_eq!(rec.issuer, id(ISSUER));
        assert_eq!(rec.credential_type, "Degree");
        assert_eq!(rec.metadata_uri, "ipfs://x");
        assert!(rec.is_valid());
        assert_eq!(rec.revocation_reason(), "");
        assert!(ledger.verify_credential(cred));
    }

    #[test]
    fn unauthorized_issue_consumes_no_id() {
        let (acm, mut ledger) = setup();
        let err = ledger
            .issue_credential(&acm, &id(HOLDER), id(HOLDER), "Degree", "ipfs://x")
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::Unauthorized(Denial::NotAuthorizedIssuer { caller: id(HOLDER) })
        );
        assert_eq!(ledger.credential_count(), 0);
        assert_eq!(ledger.next_id(), Some(cid(1)));

        let (first, _) = ledger
            .issue_credential(&acm, &id(ISSUER), id(HOLDER), "Degree", "ipfs://x")
            .unwrap();
        assert_eq!(first, cid(1));
    }

    #[test]
    fn administrator_is_not_implicitly_an_issuer() {
        let (acm, mut ledger) = setup();
        let err = ledger
            .issue_credential(&acm, &id(ADMIN), id(HOLDER), "Degree", "")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[test]
    fn ids_increase_across_holders() {
        let (acm, mut ledger) = setup();
        let ids: Vec<_> = (0..5u8)
            .map(|i| {
                ledger
                    .issue_credential(&acm, &id(ISSUER), id(10 + i), "Badge", "")
                    .unwrap()
                    .0
            })
            .collect();
        assert_eq!(ids, (1..=5).map(cid).collect::<Vec<_>>());
        assert_eq!(ledger.credential_count(), 5);
    }

    #[test]
    fn last_id_is_assigned_once() {
        let (acm, mut ledger) = setup();
        ledger.next_id = Some(cid(u64::MAX));

        let (last, _) = ledger
            .issue_credential(&acm, &id(ISSUER), id(HOLDER), "A", "")
            .unwrap();
        assert_eq!(last, cid(u64::MAX));
        assert_eq!(ledger.next_id(), None);

        let err = ledger
            .issue_credential(&acm, &id(ISSUER), id(HOLDER), "B", "")
            .unwrap_err();
        assert_eq!(err, RegistryError::IdSpaceExhausted);
        assert_eq!(ledger.credential_count(), 1);
        assert_eq!(ledger.get_credential_by_id(last).unwrap().credential_type, "A");
        assert_eq!(ledger.get_credentials_of(&id(HOLDER)), &[last]);
    }

    #[test]
    fn revoke_requires_existing_record() {
        let (_, mut ledger) = setup();
        let err = ledger.revoke_credential(&id(ISSUER), cid(1), "x").unwrap_err();
        assert_eq!(err, RegistryError::NotFound(cid(1)));
    }

    #[test]
    fn not_found_wins_over_unauthorized() {
        let (_, mut ledger) = setup();
        let err = ledger.revoke_credential(&id(HOLDER), cid(42), "x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn only_original_issuer_revokes() {
        let (mut acm, mut ledger) = setup();
        acm.add_issuer(&id(ADMIN), id(4)).unwrap();
        let (cred, _) = ledger
            .issue_credential(&acm, &id(ISSUER), id(HOLDER), "Degree", "")
            .unwrap();

        for caller in [id(4), id(ADMIN), id(HOLDER)] {
            let err = ledger.revoke_credential(&caller, cred, "nope").unwrap_err();
            assert_eq!(
                err,
                RegistryError::Unauthorized(Denial::NotOriginalIssuer { caller, id: cred })
            );
        }
        assert!(ledger.verify_credential(cred));
    }

    #[test]
    fn unauthorized_wins_over_invalid_state() {
        let (acm, mut ledger) = setup();
        let (cred, _) = ledger
            .issue_credential(&acm, &id(ISSUER), id(HOLDER), "Degree", "")
            .unwrap();
        ledger.revoke_credential(&id(ISSUER), cred, "expired").unwrap();
        let err = ledger.revoke_credential(&id(HOLDER), cred, "x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[test]
    fn second_revocation_is_invalid_state() {
        let (acm, mut ledger) = setup();
        let (cred, _) = ledger
            .issue_credential(&acm, &id(ISSUER), id(HOLDER), "Degree", "")
            .unwrap();
        let event = ledger.revoke_credential(&id(ISSUER), cred, "expired").unwrap();
        assert_eq!(
            event,
            RegistryEvent::CredentialRevoked {
                id: cred,
                issuer: id(ISSUER),
                reason: "expired".into(),
            }
        );

        let err = ledger.revoke_credential(&id(ISSUER), cred, "again").unwrap_err();
        assert_eq!(err, RegistryError::InvalidState(cred));
        let rec = ledger.get_credential_by_id(cred).unwrap();
        assert_eq!(rec.revocation_reason(), "expired");
        assert!(!ledger.verify_credential(cred));
    }

    #[test]
    fn de_authorized_issuer_keeps_revocation_right() {
        let (mut acm, mut ledger) = setup();
        let (cred, _) = ledger
            .issue_credential(&acm, &id(ISSUER), id(HOLDER), "Degree", "ipfs://x")
            .unwrap();
        acm.remove_issuer(&id(ADMIN), id(ISSUER)).unwrap();

        ledger.revoke_credential(&id(ISSUER), cred, "expired").unwrap();
        let rec = ledger.get_credential_by_id(cred).unwrap();
        assert!(!rec.is_valid());
        assert_eq!(rec.revocation_reason(), "expired");
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let (_, ledger) = setup();
        assert_eq!(
            ledger.get_credential_by_id(cid(1)).unwrap_err(),
            RegistryError::NotFound(cid(1))
        );
        assert!(!ledger.verify_credential(cid(1)));
    }

    #[test]
    fn holder_index_keeps_order_and_revoked_ids() {
        let (acm, mut ledger) = setup();
        let other = id(9);
        let a = ledger.issue_credential(&acm, &id(ISSUER), id(HOLDER), "A", "").unwrap().0;
        let _ = ledger.issue_credential(&acm, &id(ISSUER), other, "B", "").unwrap();
        let c = ledger.issue_credential(&acm, &id(ISSUER), id(HOLDER), "C", "").unwrap().0;

        ledger.revoke_credential(&id(ISSUER), a, "superseded").unwrap();

        assert_eq!(ledger.get_credentials_of(&id(HOLDER)), &[a, c]);
        assert_eq!(ledger.get_credentials_of(&other), &[cid(2)]);
    }

    #[test]
    fn unknown_holder_has_no_credentials() {
        let (_, ledger) = setup();
        assert!(ledger.get_credentials_of(&id(77)).is_empty());
    }

    #[test]
    fn content_is_not_validated() {
        let (acm, mut ledger) = setup();
        let (cred, _) = ledger
            .issue_credential(&acm, &id(ISSUER), id(ISSUER), "", "")
            .unwrap();
        let rec = ledger.get_credential_by_id(cred).unwrap();
        assert_eq!(rec.credential_type, "");
        assert_eq!(rec.holder, rec.issuer);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn successful_issues_are_dense_and_increasing(
                callers in proptest::collection::vec(prop_oneof![Just(ISSUER), Just(HOLDER), Just(ADMIN)], 0..40)
            ) {
                let (acm, mut ledger) = setup();
                let mut expected = 1u64;
                for caller in callers {
                    match ledger.issue_credential(&acm, &id(caller), id(HOLDER), "T", "") {
                        Ok((issued, _)) => {
                            prop_assert_eq!(caller, ISSUER);
                            prop_assert_eq!(issued.get(), expected);
                            expected += 1;
                        }
                        Err(err) => {
                            prop_assert_ne!(caller, ISSUER);
                            prop_assert_eq!(err.kind(), ErrorKind::Unauthorized);
                        }
                    }
                }
                prop_assert_eq!(ledger.credential_count(), expected - 1);
                prop_assert_eq!(ledger.get_credentials_of(&id(HOLDER)).len() as u64, expected - 1);
            }
        }
    }
}
