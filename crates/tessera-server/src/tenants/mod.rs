//! Tenant administration: service layer, request/response types, and the
//! axum handlers behind the admin-guarded CRUD routes.

pub mod handlers;
pub mod service;
pub mod types;

pub use service::TenantService;
pub use types::{CreateTenantRequest, CreatedTenantResponse, TenantResponse};
