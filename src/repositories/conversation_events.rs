use crate::common::context::Context;
use crate::common::redis_json::Json;
use crate::models::realtime::ChangeEvent;
use futures::stream::BoxStream;
use futures::{StreamExt, future};
use redis::AsyncCommands;
use tracing::warn;

pub fn make_channel(contact_id: &str) -> String {
    format!("support:conversations:{contact_id}")
}

/// Publishes `event` to the contact's channel, returning the number of
/// subscribers that received it.
pub async fn publish<C: Context>(
    ctx: &C,
    contact_id: &str,
    event: &ChangeEvent,
) -> anyhow::Result<usize> {
    let payload = Json(event).encode()?;
    let mut redis = ctx.redis().await?;
    let receivers: usize = redis.publish(make_channel(contact_id), payload).await?;
    Ok(receivers)
}

/// Subscribes to the contact's channel on a dedicated connection. Events are
/// yielded in publish order; undecodable payloads are skipped.
pub async fn subscribe<C: Context>(
    ctx: &C,
    contact_id: &str,
) -> anyhow::Result<BoxStream<'static, ChangeEvent>> {
    let mut pubsub = ctx.redis_client().get_async_pubsub().await?;
    pubsub.subscribe(make_channel(contact_id)).await?;
    let events = pubsub.into_on_message().filter_map(|message| {
        let event = match message.get_payload::<Json<ChangeEvent>>() {
            Ok(event) => Some(event.into_inner()),
            Err(e) => {
                warn!(channel = message.get_channel_name(), "Dropping undecodable change event: {e}");
                None
            }
        };
        future::ready(event)
    });
    Ok(events.boxed())
}
