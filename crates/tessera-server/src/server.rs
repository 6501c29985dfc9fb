use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{Router, extract::FromRef, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use tessera_auth::{AuthState, IdentityResolver};
use tessera_cache::CacheBackend;
use tessera_storage::TenantStore;

use crate::config::AppConfig;
use crate::tenants::TenantService;
use crate::{handlers, tenants};

/// Shared application state behind every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TenantStore>,
    pub cache: CacheBackend,
    pub tenants: TenantService,
    pub auth: AuthState,
}

impl AppState {
    /// Wires the service and resolver over one store and one cache.
    pub fn new(
        store: Arc<dyn TenantStore>,
        cache: CacheBackend,
        admin_api_key: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        let resolver = Arc::new(IdentityResolver::with_ttl(
            store.clone(),
            cache.clone(),
            ttl,
        ));
        let tenants = TenantService::new(store.clone(), cache.clone(), ttl);
        Self {
            store,
            cache,
            tenants,
            auth: AuthState::new(resolver, admin_api_key),
        }
    }
}

// Lets the auth extractors pull their state out of ours.
impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        // Health and info endpoints
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz))
        .route("/readyz", get(handlers::readyz))
        // Caller identity (tenant API key)
        .route("/whoami", get(handlers::whoami))
        // Tenant administration (admin key)
        .route(
            "/tenants",
            get(tenants::handlers::list_tenants).post(tenants::handlers::create_tenant),
        )
        .route(
            "/tenants/{id}",
            get(tenants::handlers::get_tenant).delete(tenants::handlers::delete_tenant),
        )
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http.request",
                        http.method = %req.method(),
                        http.target = %req.uri(),
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        tracing::info!(
                            http.status = %res.status().as_u16(),
                            elapsed_ms = %latency.as_millis(),
                            "request handled"
                        );
                    },
                ),
        )
        .with_state(state)
}

pub struct TesseraServer {
    addr: SocketAddr,
    app: Router,
}

pub struct ServerBuilder {
    addr: SocketAddr,
    state: AppState,
}

impl ServerBuilder {
    pub fn new(config: &AppConfig, state: AppState) -> Self {
        Self {
            addr: config.addr(),
            state,
        }
    }

    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    pub fn build(self) -> TesseraServer {
        TesseraServer {
            addr: self.addr,
            app: build_app(self.state),
        }
    }
}

impl TesseraServer {
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    // Wait for Ctrl+C
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
