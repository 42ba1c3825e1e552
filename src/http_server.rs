use axum::{response::Json, routing::get, Router};
use serde::Serialize;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::Config,
    db_persistence::DbPersistence,
    routes::api_routes,
    services::{
        invitation_service::InvitationService, session_store::SessionStore,
        twitter_service::TwitterService, wallet_service::WalletService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbPersistence>,
    pub config: Arc<Config>,
    pub sessions: Arc<SessionStore>,
    pub wallet: Arc<WalletService>,
    pub twitter: Arc<TwitterService>,
    pub invitations: Arc<InvitationService>,
}

impl AppState {
    pub fn new(db: Arc<DbPersistence>, config: Arc<Config>) -> Self {
        let sessions = Arc::new(SessionStore::new());
        let wallet = Arc::new(WalletService::new(
            db.clone(),
            config.wallet.require_owner_check,
        ));
        let twitter = Arc::new(TwitterService::new(
            db.clone(),
            sessions.clone(),
            config.clone(),
        ));
        let invitations = Arc::new(InvitationService::new(db.clone()));

        Self {
            db,
            config,
            sessions,
            wallet,
            twitter,
            invitations,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub healthy: bool,
    pub service: String,
    pub version: String,
}

/// Create the HTTP server router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes(state.clone()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Health check endpoint, reachable without an API key
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        healthy: true,
        service: "IdentityHub".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn start_server(
    state: AppState,
    bind_address: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);

    tracing::info!("Starting HTTP server on {}", bind_address);

    let listener = tokio::net::TcpListener::bind(bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
