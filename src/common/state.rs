use crate::adapters::storage::StorageClient;
use crate::adapters::whatsapp::WhatsAppClient;
use crate::common::context::Context;
use crate::common::redis_pool::{PoolResult, RedisPool};
use async_trait::async_trait;
use sqlx::{Pool, Postgres};

#[derive(Clone)]
pub struct AppState {
    pub db: Pool<Postgres>,
    pub redis: RedisPool,
    pub redis_client: redis::Client,
    pub storage: StorageClient,
    pub whatsapp: WhatsAppClient,
}

#[async_trait]
impl Context for AppState {
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
