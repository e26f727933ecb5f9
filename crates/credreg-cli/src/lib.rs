//! # credreg-cli: Command Line for the Credential Registry
//!
//! ## Subcommands
//!
//! - `credreg serve`: run the HTTP service.
//! - `credreg describe`: write the published address and interface
//!   descriptor for clients.
//! - `credreg identity`: generate or check identities.
//!
//! ```bash
//! credreg identity new --count 3
//! credreg serve --admin 0x1111111111111111111111111111111111111111
//! credreg describe --endpoint http://localhost:8080 \
//!     --admin 0x1111111111111111111111111111111111111111 --output-dir deploy/
//! ```

pub mod describe;
pub mod identity;
pub mod serve;

/// Contract name used in published artifacts.
pub const REGISTRY_NAME: &str = "CredentialRegistry";
