use crate::common::context::Context;
use crate::common::error::{AppError, ServiceResult, unexpected};
use crate::models::contacts::{Contact, ContactKey, ConversationSummary};
use crate::repositories::contacts;

pub async fn fetch_one<C: Context>(ctx: &C, chat_id: &str) -> ServiceResult<Contact> {
    match find_by_chat_id(ctx, chat_id).await? {
        Some(contact) => Ok(contact),
        None => Err(AppError::ContactsNotFound),
    }
}

/// Like [`fetch_one`], but an unknown chat id is not an error.
pub async fn find_by_chat_id<C: Context>(ctx: &C, chat_id: &str) -> ServiceResult<Option<Contact>> {
    let key = ContactKey::from_chat_id(chat_id);
    match contacts::fetch_one_by_key(ctx, key).await {
        Ok(contact) => Ok(contact.map(Contact::from)),
        Err(e) => unexpected(e),
    }
}

pub async fn fetch_conversations<C: Context>(ctx: &C) -> ServiceResult<Vec<ConversationSummary>> {
    match contacts::fetch_conversation_summaries(ctx).await {
        Ok(summaries) => Ok(summaries
            .into_iter()
            .map(ConversationSummary::from)
            .collect()),
        Err(e) => unexpected(e),
    }
}
