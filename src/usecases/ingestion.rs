//! Inbound WhatsApp message ingestion.
//!
//! Media is fetched from the provider, written to the primary bucket under a
//! fresh `{unix_millis}_{uuid}.{ext}` path and only then recorded on a message
//! row. The two writes are not transactional: when the row insert fails the
//! blob is queued for the orphan sweeper before the error is returned.

use crate::common::context::Context;
use crate::common::error::{AppError, ServiceResult, unexpected};
use crate::entities::messages::{CreateMessageArgs, Message};
use crate::entities::orphaned_blobs::OrphanedBlob;
use crate::models::realtime::ChangeEvent;
use crate::models::webhook::{
    InboundContact, InboundContent, InboundMedia, InboundMessage, MediaCategory, WebhookPayload,
    WebhookResponse,
};
use crate::repositories::{contacts, conversation_events, messages, orphaned_blobs};
use async_trait::async_trait;
use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

pub struct FetchedMedia {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// Everything the pipeline writes to or fetches from.
#[async_trait]
pub trait IngestionBackend: Sync + Send {
    fn primary_bucket(&self) -> &str;

    /// Looks up the short-lived media URL for `media_id` and downloads it.
    async fn fetch_media(&self, media_id: &str) -> ServiceResult<FetchedMedia>;

    async fn upload_blob(&self, path: &str, bytes: Vec<u8>, content_type: &str)
    -> ServiceResult<()>;

    async fn upsert_contact(&self, wa_id: &str, name: Option<&str>) -> ServiceResult<()>;

    async fn insert_message(&self, args: CreateMessageArgs) -> ServiceResult<Message>;

    async fn enqueue_orphaned_blob(&self, blob: OrphanedBlob) -> ServiceResult<()>;

    async fn publish_change(&self, contact_id: &str, event: ChangeEvent) -> ServiceResult<()>;
}

#[async_trait]
impl<C: Context> IngestionBackend for C {
    fn primary_bucket(&self) -> &str {
        self.storage().bucket()
    }

    async fn fetch_media(&self, media_id: &str) -> ServiceResult<FetchedMedia> {
        let info = self.whatsapp().fetch_media_info(media_id).await?;
        let url = info.url.ok_or(AppError::WhatsAppMediaUrlMissing)?;
        let download = self.whatsapp().download_media(&url).await?;
        info!(
            media_id,
            size = download.bytes.len(),
            mime_type = info.mime_type.as_deref(),
            "Downloaded media"
        );
        Ok(FetchedMedia {
            bytes: download.bytes,
            content_type: info.mime_type.or(download.content_type),
        })
    }

    async fn upload_blob(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> ServiceResult<()> {
        self.storage().upload(path, bytes, content_type).await
    }

    async fn upsert_contact(&self, wa_id: &str, name: Option<&str>) -> ServiceResult<()> {
        match contacts::upsert_by_wa_id(self, wa_id, name).await {
            Ok(()) => Ok(()),
            Err(e) => unexpected(e),
        }
    }

    async fn insert_message(&self, args: CreateMessageArgs) -> ServiceResult<Message> {
        match messages::create(self, args).await {
            Ok(message) => Ok(message),
            Err(e) => {
                error!("Failed to insert message: {e}");
                Err(AppError::MessagesInsertFailed)
            }
        }
    }

    async fn enqueue_orphaned_blob(&self, blob: OrphanedBlob) -> ServiceResult<()> {
        match orphaned_blobs::push(self, &[blob]).await {
            Ok(()) => Ok(()),
            Err(e) => unexpected(e),
        }
    }

    async fn publish_change(&self, contact_id: &str, event: ChangeEvent) -> ServiceResult<()> {
        match conversation_events::publish(self, contact_id, &event).await {
            Ok(receivers) => {
                info!(contact_id, event = event.name(), receivers, "Published change event");
                Ok(())
            }
            Err(e) => unexpected(e),
        }
    }
}

/// MIME type without parameters, lower-cased.
fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
        .to_ascii_lowercase()
}

pub fn extension_for(content_type: &str) -> &'static str {
    match essence(content_type).as_str() {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "application/pdf" => "pdf",
        _ => "bin",
    }
}

pub fn make_blob_path(unix_millis: i64, id: Uuid, content_type: &str) -> String {
    format!("{unix_millis}_{id}.{}", extension_for(content_type))
}

pub async fn handle_payload<B: IngestionBackend>(
    backend: &B,
    payload: &WebhookPayload,
) -> ServiceResult<WebhookResponse> {
    let Some(message) = payload.first_message() else {
        info!("Webhook carried no message");
        return Ok(WebhookResponse::status(WebhookResponse::NO_MESSAGE));
    };
    let Some(contact) = payload.first_contact() else {
        error!(meta_id = message.id, "Webhook message has no contact");
        return Err(AppError::WebhookMissingContact);
    };

    record_contact(backend, contact).await;

    match message.content() {
        InboundContent::Media { category, media } => {
            ingest_media(backend, message, contact, category, media).await
        }
        InboundContent::Text(body) => ingest_text(backend, message, contact, body).await,
        InboundContent::Unsupported => {
            info!(
                meta_id = message.id,
                message_type = message.message_type,
                "No processable content in message"
            );
            Ok(WebhookResponse::status(WebhookResponse::NOTHING_PROCESSABLE))
        }
    }
}

async fn record_contact<B: IngestionBackend>(backend: &B, contact: &InboundContact) {
    let name = contact
        .profile
        .as_ref()
        .and_then(|profile| profile.name.as_deref())
        .filter(|name| !name.trim().is_empty());
    if name.is_none() {
        return;
    }
    if let Err(e) = backend.upsert_contact(&contact.wa_id, name).await {
        warn!(wa_id = contact.wa_id, "Failed to record contact: {}", e.message());
    }
}

async fn ingest_media<B: IngestionBackend>(
    backend: &B,
    message: &InboundMessage,
    contact: &InboundContact,
    category: MediaCategory,
    media: &InboundMedia,
) -> ServiceResult<WebhookResponse> {
    info!(meta_id = message.id, media_id = media.id, ?category, "Processing media message");

    let fetched = backend.fetch_media(&media.id).await?;
    let content_type = fetched
        .content_type
        .or_else(|| media.mime_type.clone())
        .map(|content_type| essence(&content_type))
        .filter(|content_type| !content_type.is_empty())
        .unwrap_or_else(|| category.fallback_content_type().to_owned());

    let path = make_blob_path(Utc::now().timestamp_millis(), Uuid::new_v4(), &content_type);
    backend
        .upload_blob(&path, fetched.bytes, &content_type)
        .await?;
    info!(path, content_type, "Uploaded media");

    let text = media
        .caption
        .clone()
        .filter(|caption| !caption.is_empty())
        .unwrap_or_else(|| category.placeholder_text().to_owned());
    let args = CreateMessageArgs {
        contact_id: contact.wa_id.clone(),
        text: Some(text),
        attachment_path: Some(path.clone()),
        attachment_type: Some(content_type),
        meta_id: Some(message.id.clone()),
    };
    let created = match backend.insert_message(args).await {
        Ok(created) => created,
        Err(e) => {
            let orphan = OrphanedBlob {
                bucket: backend.primary_bucket().to_owned(),
                path: path.clone(),
                queued_at: Utc::now(),
            };
            if let Err(enqueue_error) = backend.enqueue_orphaned_blob(orphan).await {
                error!(
                    path,
                    "Failed to queue orphaned blob: {}",
                    enqueue_error.message()
                );
            }
            return Err(e);
        }
    };

    publish_insert(backend, &contact.wa_id, created).await;
    Ok(WebhookResponse {
        status: category.processed_status(),
        path: Some(path),
    })
}

async fn ingest_text<B: IngestionBackend>(
    backend: &B,
    message: &InboundMessage,
    contact: &InboundContact,
    body: &str,
) -> ServiceResult<WebhookResponse> {
    let args = CreateMessageArgs {
        contact_id: contact.wa_id.clone(),
        text: Some(body.to_owned()),
        meta_id: Some(message.id.clone()),
        ..Default::default()
    };
    let created = backend.insert_message(args).await?;
    publish_insert(backend, &contact.wa_id, created).await;
    Ok(WebhookResponse::status(WebhookResponse::TEXT_PROCESSED))
}

async fn publish_insert<B: IngestionBackend>(backend: &B, contact_id: &str, message: Message) {
    let event = ChangeEvent::Insert { new: message };
    if let Err(e) = backend.publish_change(contact_id, event).await {
        warn!(contact_id, "Failed to publish change event: {}", e.message());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions_follow_the_content_type() {
        assert_eq!(extension_for("image/jpeg"), "jpg");
        assert_eq!(extension_for("IMAGE/PNG"), "png");
        assert_eq!(extension_for("image/webp; q=1"), "webp");
        assert_eq!(extension_for("application/pdf"), "pdf");
        assert_eq!(extension_for("application/zip"), "bin");
    }

    #[test]
    fn blob_paths_are_timestamp_and_uuid() {
        let id = Uuid::nil();
        assert_eq!(
            make_blob_path(1700000000000, id, "image/jpeg"),
            "1700000000000_00000000-0000-0000-0000-000000000000.jpg"
        );
    }
}
