/// Axum HTTP server setup and routing
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::*;
use crate::state::SharedState;

pub fn create_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Wallet endpoints
        .route("/accounts/request", post(request_accounts))
        .route("/accounts/authorized", get(authorized_accounts))
        .route("/accounts/authorize", post(set_authorized))
        .route("/send", post(send_transaction))
        // Memo contract endpoints
        .route("/contract/:contract/append", post(append_record))
        .route("/contract/:contract/records", get(get_records))
        .route("/contract/:contract/count", get(get_record_count))
        // Transaction status
        .route("/tx/:tx_hash/status", get(get_tx_status))
        // Test helper endpoints
        .route("/mine", post(mine))
        .route("/config", post(configure))
        // Shared state
        .with_state(state)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn run_server(state: SharedState, host: String, port: u16) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    log::info!("Chain mock server listening on http://{}", addr);
    log::info!("Mining endpoint: POST /mine");

    axum::serve(listener, app).await?;

    Ok(())
}
