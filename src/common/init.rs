use crate::adapters::storage::StorageClient;
use crate::adapters::whatsapp::WhatsAppClient;
use crate::common::redis_pool::{RedisPool, RedisPoolManager};
use crate::common::state::AppState;
use crate::settings::AppSettings;
use deadpool::Runtime;
use redis::{AsyncConnectionConfig, Commands};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use tracing::info;

pub fn initialize_logging(settings: &AppSettings) {
    tracing_subscriber::fmt()
        .with_max_level(settings.level)
        .with_timer(tracing_subscriber::fmt::time())
        .with_level(true)
        .compact()
        .init();
}

pub async fn initialize_state(settings: &AppSettings) -> anyhow::Result<AppState> {
    let db = initialize_db(settings).await?;
    if settings.db_run_migrations {
        info!("Running database migrations");
        sqlx::migrate!("./migrations").run(&db).await?;
    }
    let (redis_client, redis) = initialize_redis(settings)?;
    let storage = initialize_storage(settings)?;
    let whatsapp = initialize_whatsapp(settings);
    Ok(AppState {
        db,
        redis,
        redis_client,
        storage,
        whatsapp,
    })
}

pub fn initialize_db(
    settings: &AppSettings,
) -> impl Future<Output = sqlx::Result<Pool<Postgres>>> {
    PgPoolOptions::new()
        .acquire_timeout(settings.db_wait_timeout)
        .max_connections(settings.db_max_connections as _)
        .connect(&settings.database_url)
}

pub fn initialize_redis(settings: &AppSettings) -> anyhow::Result<(redis::Client, RedisPool)> {
    let redis_client = redis::Client::open(settings.redis_url.as_str())?;
    let mut conn = redis_client.get_connection_with_timeout(settings.redis_wait_timeout)?;
    let _: () = conn.ping()?;
    let redis_cfg = AsyncConnectionConfig::new()
        .set_connection_timeout(settings.redis_connection_timeout)
        .set_response_timeout(settings.redis_response_timeout);

    let redis_manager = RedisPoolManager::new(redis_client.clone(), redis_cfg);
    let redis = RedisPool::builder(redis_manager)
        .max_size(settings.redis_max_connections)
        .wait_timeout(Some(settings.redis_wait_timeout))
        .runtime(Runtime::Tokio1)
        .build()?;
    Ok((redis_client, redis))
}

pub fn initialize_storage(settings: &AppSettings) -> anyhow::Result<StorageClient> {
    StorageClient::new(
        &settings.storage_url,
        &settings.storage_service_key,
        &settings.storage_primary_bucket,
    )
}

pub fn initialize_whatsapp(settings: &AppSettings) -> WhatsAppClient {
    WhatsAppClient::new(
        &settings.whatsapp_graph_url,
        &settings.whatsapp_access_token,
    )
}
