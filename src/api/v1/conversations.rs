use crate::api::RequestContext;
use crate::common::error::{ServiceResponse, ServiceResult};
use crate::models::contacts::ConversationSummary;
use crate::models::messages::ThreadView;
use crate::usecases::{contacts, messages, realtime};
use axum::Json;
use axum::extract::Path;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::{Stream, StreamExt, future};
use std::convert::Infallible;
use std::time::Duration;
use tracing::warn;

const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(15);

pub async fn list(ctx: RequestContext) -> ServiceResponse<Vec<ConversationSummary>> {
    let conversations = contacts::fetch_conversations(&ctx).await?;
    Ok(Json(conversations))
}

pub async fn messages(
    ctx: RequestContext,
    Path(chat_id): Path<String>,
) -> ServiceResponse<ThreadView> {
    let thread = messages::fetch_thread(&ctx, &chat_id).await?;
    Ok(Json(thread))
}

/// Live change feed of one conversation.
pub async fn events(
    ctx: RequestContext,
    Path(chat_id): Path<String>,
) -> ServiceResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let changes = realtime::subscribe(&ctx, &chat_id).await?;
    let events = changes.filter_map(|change| {
        let name = change.name();
        let event = match Event::default().event(name).json_data(change.into_feed_payload()) {
            Ok(event) => Some(Ok(event)),
            Err(e) => {
                warn!(event = name, "Failed to encode change event: {e}");
                None
            }
        };
        future::ready(event)
    });
    Ok(Sse::new(events).keep_alive(KeepAlive::new().interval(KEEP_ALIVE_INTERVAL).text("ping")))
}
