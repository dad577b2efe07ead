use crate::adapters::discord;
use crate::api::RequestContext;
use crate::common::error::AppError;
use crate::models::webhook::{WebhookErrorResponse, WebhookPayload};
use crate::usecases::ingestion;
use axum::Json;
use axum::body::Bytes;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{debug, error};

/// Receives inbound message notifications from the WhatsApp Cloud API.
pub async fn receive(ctx: RequestContext, body: Bytes) -> Response {
    debug!(size = body.len(), "Received webhook");
    let payload: WebhookPayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            error!("Failed to decode webhook: {e}");
            return failure(AppError::DecodingRequestFailed.message()).await;
        }
    };

    match ingestion::handle_payload(&ctx, &payload).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => failure(e.message()).await,
    }
}

async fn failure(message: &'static str) -> Response {
    if let Err(e) = discord::warn("Webhook processing failed", message).await {
        error!("Failed to send discord alert: {}", e.message());
    }
    let body = WebhookErrorResponse { error: message };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}
