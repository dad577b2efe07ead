use crate::common::context::Context;
use crate::common::redis_json::Json;
use crate::entities::orphaned_blobs::OrphanedBlob;
use redis::AsyncCommands;
use std::num::NonZeroUsize;

const ORPHANED_BLOBS_KEY: &str = "support:storage:orphaned_blobs";

pub async fn push<C: Context>(ctx: &C, blobs: &[OrphanedBlob]) -> anyhow::Result<()> {
    if blobs.is_empty() {
        return Ok(());
    }
    let encoded = blobs
        .iter()
        .map(|blob| Json(blob).encode())
        .collect::<serde_json::Result<Vec<String>>>()?;
    let mut redis = ctx.redis().await?;
    let _: () = redis.rpush(ORPHANED_BLOBS_KEY, encoded).await?;
    Ok(())
}

/// Removes and returns up to `count` queued blobs, oldest first.
pub async fn pop_many<C: Context>(ctx: &C, count: NonZeroUsize) -> anyhow::Result<Vec<OrphanedBlob>> {
    let mut redis = ctx.redis().await?;
    let blobs: Option<Vec<Json<OrphanedBlob>>> = redis
        .lpop(ORPHANED_BLOBS_KEY, Some(count))
        .await?;
    Ok(blobs
        .unwrap_or_default()
        .into_iter()
        .map(Json::into_inner)
        .collect())
}

pub async fn count<C: Context>(ctx: &C) -> anyhow::Result<usize> {
    let mut redis = ctx.redis().await?;
    let len: usize = redis.llen(ORPHANED_BLOBS_KEY).await?;
    Ok(len)
}
