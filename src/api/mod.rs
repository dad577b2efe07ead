use crate::adapters::storage::StorageClient;
use crate::adapters::whatsapp::WhatsAppClient;
use crate::common::context::Context;
use crate::common::init;
use crate::common::redis_pool::{PoolResult, RedisPool};
use crate::common::state::AppState;
use crate::settings::AppSettings;
use async_trait::async_trait;
use axum::Router;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::routing::get;
use sqlx::{Pool, Postgres};
use std::convert::Infallible;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod v1;
pub mod webhooks;

pub struct RequestContext {
    pub db: Pool<Postgres>,
    pub redis: RedisPool,
    pub redis_client: redis::Client,
    pub storage: StorageClient,
    pub whatsapp: WhatsAppClient,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .nest("/webhooks", webhooks::router())
        .nest("/api/v1", v1::router())
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(settings: &AppSettings) -> anyhow::Result<()> {
    let state = init::initialize_state(settings).await?;
    let app = router().with_state(state);
    let listener = TcpListener::bind((settings.app_host, settings.app_port)).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

pub async fn index() -> &'static str {
    "Running support-chat-service v0.1"
}

impl FromRequestParts<AppState> for RequestContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self {
            db: state.db.clone(),
            redis: state.redis.clone(),
            redis_client: state.redis_client.clone(),
            storage: state.storage.clone(),
            whatsapp: state.whatsapp.clone(),
        })
    }
}

#[async_trait]
impl Context for RequestContext {
    fn db(&self) -> &Pool<Postgres> {
        &self.db
    }

    async fn redis(&self) -> PoolResult {
        self.redis.get().await
    }

    fn redis_client(&self) -> &redis::Client {
        &self.redis_client
    }

    fn storage(&self) -> &StorageClient {
        &self.storage
    }

    fn whatsapp(&self) -> &WhatsAppClient {
        &self.whatsapp
    }
}
