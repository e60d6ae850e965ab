use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::response::Response;

use serde_json::Value;

use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::confirmation;
use crate::validation::{read_form, validate_purchase};

pub const PURCHASE_QUEUED_MESSAGE: &str = "Ticket purchase successfully queued.";

/// Validates a purchase and places it on the purchase queue.
///
/// 400 when the body is missing or any field fails validation, 500 when the
/// queue is not configured or the enqueue fails, 200 once the message is sent.
pub async fn purchase_ticket(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let body = match payload {
        Ok(Json(body @ Value::Object(_))) => body,
        Ok(Json(Value::Null)) => {
            return Err(AppError::InvalidBody("request body is null".to_string()))
        }
        Ok(Json(_)) => {
            return Err(AppError::InvalidBody(
                "request body must be a JSON object".to_string(),
            ))
        }
        Err(rejection) => return Err(AppError::InvalidBody(rejection.body_text())),
    };

    let form = read_form(&body).map_err(AppError::Validation)?;
    let purchase = validate_purchase(form).map_err(AppError::Validation)?;

    tracing::debug!(?purchase, queue = state.publisher.queue_name(), "Publishing purchase");
    state.publisher.publish(&purchase).await?;

    Ok(confirmation(PURCHASE_QUEUED_MESSAGE))
}
