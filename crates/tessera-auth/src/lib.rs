//! API key authentication for the Tessera licensing server.
//!
//! The [`resolver::IdentityResolver`] turns a presented API key into a
//! categorical [`resolver::Verdict`] (active, inactive, or unknown tenant),
//! preferring the cache and falling back to the store of record. The axum
//! extractors in [`extract`] and [`admin`] sit at the routing boundary and
//! map verdicts onto the error taxonomy in [`error`].

pub mod admin;
pub mod error;
pub mod extract;
pub mod resolver;

pub use admin::AdminAuth;
pub use error::AuthError;
pub use extract::{ApiKeyAuth, AuthState, API_KEY_HEADER};
pub use resolver::{IdentityResolver, Verdict};
