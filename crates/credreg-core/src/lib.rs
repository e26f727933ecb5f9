#![deny(missing_docs)]

//! # credreg-core: Foundational Types for the Credential Registry
//!
//! Defines the value types every other crate in the workspace builds on.
//! It depends on no internal crate.
//!
//! ## Key Design Principles
//!
//! 1. **Fixed-width identities.** [`Identity`] is a 20-byte value with
//!    structural equality and a single canonical text form
//!    (`0x` + 40 lowercase hex digits). No bare strings for principals.
//!
//! 2. **Reserved sentinel id.** [`CredentialId`] zero means "does not
//!    exist" and is never assigned by a ledger.
//!
//! 3. **UTC-only timestamps.** [`Timestamp`] is UTC with seconds
//!    precision, rendered with a `Z` suffix.
//!
//! ## Crate Policy
//!
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod temporal;

pub use error::ValidationError;
pub use identity::{CredentialId, Identity, IDENTITY_LEN};
pub use temporal::Timestamp;
