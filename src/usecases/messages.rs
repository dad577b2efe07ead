use crate::common::context::Context;
use crate::common::error::{ServiceResult, unexpected};
use crate::models::attachments::AttachmentState;
use crate::models::messages::{AttachmentRef, Message, MessageView, ThreadView};
use crate::repositories::messages;
use crate::usecases::attachments::{self, AttachmentSources};
use crate::usecases::contacts;
use futures::future::join_all;
use tracing::info;

pub async fn fetch_thread<C: Context>(ctx: &C, chat_id: &str) -> ServiceResult<ThreadView> {
    let contact = contacts::find_by_chat_id(ctx, chat_id).await?;
    let (contact_name, mut thread_keys) = match contact {
        Some(contact) => (contact.name.clone(), contact.thread_keys()),
        None => (String::new(), vec![]),
    };
    if !thread_keys.iter().any(|key| key == chat_id) {
        thread_keys.push(chat_id.to_owned());
    }

    let rows = match messages::fetch_by_contact_ids(ctx, &thread_keys).await {
        Ok(rows) => rows,
        Err(e) => return unexpected(e),
    };
    let messages: Vec<Message> = rows.into_iter().map(Message::from).collect();
    info!(chat_id, count = messages.len(), "Fetched conversation thread");

    let views = render_messages(ctx, messages).await;
    Ok(ThreadView {
        contact_name,
        messages: views,
    })
}

/// Resolves every attachment concurrently. A failed resolution only affects
/// its own message.
pub async fn render_messages<S: AttachmentSources>(
    sources: &S,
    messages: Vec<Message>,
) -> Vec<MessageView> {
    let states = join_all(
        messages
            .iter()
            .map(|message| resolve_attachment(sources, message.attachment.as_ref())),
    )
    .await;
    messages
        .into_iter()
        .zip(states)
        .map(|(message, state)| MessageView::new(message, state))
        .collect()
}

async fn resolve_attachment<S: AttachmentSources>(
    sources: &S,
    attachment: Option<&AttachmentRef>,
) -> Option<AttachmentState> {
    let attachment = attachment?;
    let resolution =
        attachments::resolve(sources, &attachment.reference, &attachment.declared_type).await;
    Some(AttachmentState::from_resolution(
        &attachment.declared_type,
        resolution,
    ))
}
