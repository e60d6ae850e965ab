use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use tickethub_server::config::Config;
use tickethub_server::queue::{SqsConnector, PURCHASE_QUEUE_NAME};
use tickethub_server::routes::create_routes;
use tickethub_server::state::AppState;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let config = Config::from_env().expect("Invalid configuration");

    if config.queue_connection_string.is_none() {
        tracing::warn!(
            "QUEUE_CONNECTION_STRING is not set; purchases will fail until it is configured"
        );
    } else {
        tracing::info!(queue = PURCHASE_QUEUE_NAME, "Purchase queue configured");
    }

    let state = AppState::new(
        Arc::new(SqsConnector::new()),
        config.queue_connection_string.clone(),
    );
    let app: Router = create_routes(state, &config);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server running at http://{}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server failed");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
