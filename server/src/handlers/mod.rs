use axum::extract::State;
use axum::response::Response;
use serde::Serialize;

use crate::state::AppState;
use crate::utils::response::success;

pub mod purchase;

pub use purchase::purchase_ticket;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
    queue_configured: bool,
}

pub async fn health_check(State(state): State<AppState>) -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "tickethub-api",
        queue_configured: state.publisher.is_configured(),
    };

    success(payload, "Health check successful")
}
