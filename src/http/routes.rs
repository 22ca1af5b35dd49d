//! HTTP route definitions
//!
//! One port serves everything: static client assets, the status endpoints,
//! and the WebSocket upgrade at /ws.

use axum::{
    extract::State,
    http::{header, Method},
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::app::AppState;
use crate::util::time::{unix_millis, uptime_secs};
use crate::ws::handler::ws_handler;
use crate::ws::protocol::Scores;

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    // The browser client may be served from anywhere
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let static_assets = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/status", get(status_handler))
        .route("/ws", get(ws_handler))
        .fallback_service(static_assets)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

// ============================================================================
// Health endpoint
// ============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
    connected_players: usize,
    scores: Scores,
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: uptime_secs(),
        connected_players: state.game.player_count(),
        scores: state.game.scores(),
    })
}

// ============================================================================
// Status endpoint (the browser client polls this before connecting)
// ============================================================================

#[derive(Serialize)]
struct StatusResponse {
    status: &'static str,
    environment: String,
    port: u16,
    socket_enabled: bool,
    timestamp: u64,
}

async fn status_handler(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "online",
        environment: state.config.environment.clone(),
        port: state.config.server_addr.port(),
        socket_enabled: true,
        timestamp: unix_millis(),
    })
}
