use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use super::handlers;
use crate::config::Config;
use crate::ledger::GatewayLedger;
use crate::provider::GatewayProvider;
use crate::session::WalletSession;
use crate::storage::PrefsStore;

pub fn create_router(session: Arc<WalletSession>) -> Router {
    // Configure CORS based on environment
    // Set ALLOWED_ORIGINS="https://app.example.com" for production
    let cors = match std::env::var("ALLOWED_ORIGINS") {
        Ok(origins) if !origins.is_empty() => {
            log::info!("CORS configured for origins: {}", origins);
            let origin_list: Vec<_> = origins
                .split(',')
                .map(|s| s.trim().parse().expect("Invalid CORS origin"))
                .collect();
            CorsLayer::new()
                .allow_origin(origin_list)
                .allow_methods(Any)
                .allow_headers(Any)
        }
        _ => {
            log::warn!("CORS: Allowing all origins (development mode). Set ALLOWED_ORIGINS env var for production.");
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    };

    Router::new()
        .route("/health", get(handlers::health_handler))
        // Session routes
        .route("/api/session", get(handlers::get_session_handler))
        .route("/api/session/connect", post(handlers::connect_handler))
        .route("/api/session/switch", post(handlers::switch_account_handler))
        .route("/api/session/draft", put(handlers::update_draft_handler))
        // Transaction routes
        .route(
            "/api/transactions",
            get(handlers::list_transactions_handler).post(handlers::submit_handler),
        )
        .route(
            "/api/transactions/refresh",
            post(handlers::refresh_transactions_handler),
        )
        // Preference routes
        .route(
            "/api/preferences/theme",
            get(handlers::get_theme_handler).put(handlers::toggle_theme_handler),
        )
        .layer(cors)
        .with_state(session)
}

pub async fn start_server(config: Config) -> anyhow::Result<()> {
    let provider = Arc::new(GatewayProvider::new(
        &config.gateway_url,
        config.poll_interval,
    ));
    let ledger = Arc::new(GatewayLedger::new(
        &config.gateway_url,
        &config.contract_address,
        config.poll_interval,
    ));
    let prefs = PrefsStore::new_with_base_dir(config.data_dir.clone().into());

    let session = Arc::new(WalletSession::new(
        provider,
        ledger,
        prefs,
        config.gas_limit,
        config.confirmation_timeout,
    ));
    session.clone().start().await;

    let app = create_router(session.clone());

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    log::info!("Server listening on http://{}", config.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Handle graceful shutdown signals (Ctrl+C, SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            log::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            log::info!("Received SIGTERM signal");
        },
    }

    log::info!("Shutdown signal received, exiting gracefully...");
}
