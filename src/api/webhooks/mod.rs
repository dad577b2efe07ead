pub mod whatsapp;

use crate::common::state::AppState;
use axum::Router;
use axum::http::Method;
use axum::http::header::CONTENT_TYPE;
use axum::routing::post;
use tower_http::cors::{Any, CorsLayer};

pub fn router() -> Router<AppState> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);
    Router::new()
        .route("/whatsapp", post(whatsapp::receive))
        .layer(cors)
}
