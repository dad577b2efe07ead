use crate::adapters::storage::StorageClient;
use crate::adapters::whatsapp::WhatsAppClient;
use crate::common::redis_pool::PoolResult;
use async_trait::async_trait;
use sqlx::{Pool, Postgres};

#[async_trait]
pub trait Context: Sync + Send {
    fn db(&self) -> &Pool<Postgres>;
    async fn redis(&self) -> PoolResult;
    /// For dedicated connections such as pub/sub subscriptions.
    fn redis_client(&self) -> &redis::Client;
    fn storage(&self) -> &StorageClient;
    fn whatsapp(&self) -> &WhatsAppClient;
}
