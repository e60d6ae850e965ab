use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, Config, SecurityHeaders};
use crate::handlers::{health_check, purchase_ticket};
use crate::state::AppState;

pub fn create_routes(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .route("/health", get(health_check))
        .route("/api/purchase-ticket", post(purchase_ticket))
        .route("/api/tickets", post(purchase_ticket))
        .with_state(state);

    SecurityHeaders::new(config.production)
        .apply(router)
        .layer(create_cors_layer(&config.cors_allowed_origins))
        .layer(TraceLayer::new_for_http())
}
