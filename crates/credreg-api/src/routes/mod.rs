//! # Route Modules
//!
//! | Prefix                | Module          |
//! |-----------------------|-----------------|
//! | `/v1/registry*`, `/v1/metrics` | [`registry`] |
//! | `/v1/issuers*`        | [`issuers`]     |
//! | `/v1/credentials*`    | [`credentials`] |
//! | `/v1/holders/*`       | [`holders`]     |
//! | `/v1/events`          | [`events`]      |

pub mod credentials;
pub mod events;
pub mod holders;
pub mod issuers;
pub mod registry;
