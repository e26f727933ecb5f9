//! # HTTP Middleware
//!
//! Request counting and per-caller rate limiting. Authentication lives in
//! [`crate::auth`].

pub mod metrics;
pub mod rate_limit;
