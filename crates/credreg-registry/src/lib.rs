#![deny(missing_docs)]

//! # credreg-registry: Credential Registry Core
//!
//! The access-control and credential-lifecycle state machine.
//!
//! ## Components
//!
//! - **Access control** (`access.rs`): the administrator identity and the
//!   authorized issuer set. Only the administrator changes either.
//!
//! - **Ledger** (`ledger.rs`): credential records, the monotonic id
//!   sequence starting at 1, and the per-holder index. Issuance requires an
//!   authorized issuer; revocation requires the record's original issuer.
//!
//! - **Registry** (`registry.rs`): one manager plus one ledger plus an
//!   append-only event journal, as an explicitly constructed instance.
//!
//! - **Shared handle** (`shared.rs`): `Arc<RwLock<_>>` wrapper that
//!   serializes mutations and lets reads run concurrently.
//!
//! ## Events
//!
//! Every successful mutation returns its [`RegistryEvent`] together with
//! the result. Nothing is emitted through a side channel.

pub mod access;
pub mod error;
pub mod event;
pub mod ledger;
pub mod record;
pub mod registry;
pub mod shared;

pub use access::{AccessControlManager, IssuerAuthority};
pub use error::{Denial, ErrorKind, RegistryError};
pub use event::{EventRecord, RegistryEvent};
pub use ledger::CredentialLedger;
pub use record::{CredentialRecord, CredentialStatus};
pub use registry::{CredentialRegistry, RegistrySummary};
pub use shared::SharedRegistry;
