//! Handlers for the admin-guarded tenant CRUD routes.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use tessera_auth::AdminAuth;

use crate::api::ApiError;
use crate::server::AppState;
use crate::tenants::types::{CreateTenantRequest, CreatedTenantResponse, TenantResponse};

/// GET /tenants
pub async fn list_tenants(
    _admin: AdminAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<TenantResponse>>, ApiError> {
    let tenants = state.tenants.list().await?;
    Ok(Json(tenants.into_iter().map(Into::into).collect()))
}

/// GET /tenants/{id}
pub async fn get_tenant(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TenantResponse>, ApiError> {
    let tenant = state.tenants.get(id).await?;
    Ok(Json(tenant.into()))
}

/// POST /tenants
///
/// The 201 body is the only place the API key ever appears.
pub async fn create_tenant(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Json(body): Json<CreateTenantRequest>,
) -> Result<(StatusCode, Json<CreatedTenantResponse>), ApiError> {
    let tenant = state.tenants.create(&body.name).await?;
    Ok((StatusCode::CREATED, Json(tenant.into())))
}

/// DELETE /tenants/{id}
pub async fn delete_tenant(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.tenants.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
