use crate::common::context::Context;
use crate::common::error::{ServiceResult, unexpected};
use crate::models::realtime::ChangeEvent;
use crate::repositories::conversation_events;
use crate::usecases::contacts;
use futures::stream::BoxStream;
use tracing::info;

/// Change events for the conversation behind `chat_id`. Events are published
/// under the contact's `wa_id`, so a known contact is subscribed by that key.
pub async fn subscribe<C: Context>(
    ctx: &C,
    chat_id: &str,
) -> ServiceResult<BoxStream<'static, ChangeEvent>> {
    let contact_id = match contacts::find_by_chat_id(ctx, chat_id).await? {
        Some(contact) => contact.wa_id,
        None => chat_id.to_owned(),
    };
    match conversation_events::subscribe(ctx, &contact_id).await {
        Ok(events) => {
            info!(chat_id, contact_id, "Subscribed to conversation events");
            Ok(events)
        }
        Err(e) => unexpected(e),
    }
}
