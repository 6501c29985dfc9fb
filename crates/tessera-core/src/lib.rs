//! Core domain types for the Tessera licensing server.
//!
//! This crate holds the plain tenant value types shared by the storage,
//! cache, and HTTP layers. Nothing here talks to a database or a cache;
//! a `Tenant` is always an immutable snapshot of a row in the store of
//! record.

pub mod api_key;
pub mod error;
pub mod tenant;

pub use api_key::generate_api_key;
pub use error::{CoreError, Result};
pub use tenant::{NewTenant, Tenant};
