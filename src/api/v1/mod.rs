pub mod attachments;
pub mod contacts;
pub mod conversations;

use crate::common::state::AppState;
use axum::Router;
use axum::routing::get;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/conversations", get(conversations::list))
        .route("/conversations/{chat_id}/messages", get(conversations::messages))
        .route("/conversations/{chat_id}/events", get(conversations::events))
        .route("/contacts/{chat_id}", get(contacts::fetch_one))
        .route("/attachments/resolve", get(attachments::resolve))
}
