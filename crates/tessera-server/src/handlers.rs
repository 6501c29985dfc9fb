//! Service info, health, and caller identity handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

use tessera_auth::ApiKeyAuth;

use crate::server::AppState;
use crate::tenants::types::TenantResponse;

/// GET /
pub async fn root() -> Json<Value> {
    Json(json!({
        "name": "tessera",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /healthz
///
/// Liveness only: the process is up and serving.
pub async fn healthz() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// GET /readyz
///
/// Readiness: both the store of record and the cache must be reachable.
/// The store probe is a single-row lookup by the nil id, which exercises
/// connectivity without touching real data.
pub async fn readyz(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let store_ok = state.store.find_by_id(Uuid::nil()).await.is_ok();
    let cache_ok = state.cache.is_available().await;

    let status = if store_ok && cache_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (
        status,
        Json(json!({
            "store": if store_ok { "ok" } else { "unavailable" },
            "cache": if cache_ok { "ok" } else { "unavailable" },
        })),
    )
}

/// GET /whoami
///
/// The authenticated tenant's own snapshot. The extractor has already run
/// the resolver; the key is not echoed back.
pub async fn whoami(ApiKeyAuth(tenant): ApiKeyAuth) -> Json<TenantResponse> {
    Json(tenant.into())
}
