#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use support_chat_service::common::error::{AppError, ServiceResult};
use support_chat_service::entities::messages::{CreateMessageArgs, Message};
use support_chat_service::entities::orphaned_blobs::OrphanedBlob;
use support_chat_service::models::realtime::ChangeEvent;
use support_chat_service::usecases::attachments::AttachmentSources;
use support_chat_service::usecases::ingestion::{FetchedMedia, IngestionBackend};
use uuid::Uuid;

pub const BUCKET: &str = "chat_images";
pub const PUBLIC_BASE: &str = "https://project.storage.test/storage/v1/object/public/chat_images";

/// In-memory stand-in for the object store, the relational store, the
/// messaging provider and the realtime channel.
#[derive(Default)]
pub struct FakeBackend {
    pub blobs: Mutex<HashSet<String>>,
    pub rows: Mutex<Vec<Message>>,
    pub indexed_paths: HashMap<String, String>,
    pub provider_media: HashMap<String, (Vec<u8>, Option<String>)>,
    pub failing_storage: bool,
    pub failing_db: bool,
    pub failing_insert: bool,
    pub probes: Mutex<Vec<String>>,
    pub db_lookups: Mutex<usize>,
    pub uploads: Mutex<Vec<(String, String)>>,
    pub contacts: Mutex<Vec<(String, Option<String>)>>,
    pub orphans: Mutex<Vec<OrphanedBlob>>,
    pub events: Mutex<Vec<(String, ChangeEvent)>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(self, path: &str) -> Self {
        self.blobs.lock().unwrap().insert(path.to_owned());
        self
    }

    pub fn with_row(self, meta_id: &str, attachment_path: &str) -> Self {
        self.rows.lock().unwrap().push(Message {
            id: Uuid::new_v4(),
            contact_id: Some("27821234567".to_owned()),
            text: Some("Image message".to_owned()),
            created_at: Utc::now(),
            sender_id: None,
            attachment_path: Some(attachment_path.to_owned()),
            attachment_type: Some("image/jpeg".to_owned()),
            meta_id: Some(meta_id.to_owned()),
        });
        self
    }

    pub fn with_indexed_path(mut self, message_id: &str, path: &str) -> Self {
        self.indexed_paths.insert(message_id.to_owned(), path.to_owned());
        self
    }

    pub fn with_provider_media(mut self, media_id: &str, bytes: &[u8], mime_type: &str) -> Self {
        self.provider_media.insert(
            media_id.to_owned(),
            (bytes.to_vec(), Some(mime_type.to_owned())),
        );
        self
    }

    pub fn probed(&self) -> Vec<String> {
        self.probes.lock().unwrap().clone()
    }

    pub fn lookups(&self) -> usize {
        *self.db_lookups.lock().unwrap()
    }

    pub fn calls(&self) -> usize {
        self.probed().len() + self.lookups()
    }
}

pub fn public_url(path: &str) -> String {
    format!("{PUBLIC_BASE}/{path}")
}

#[async_trait]
impl AttachmentSources for FakeBackend {
    fn public_url(&self, path: &str) -> String {
        public_url(path)
    }

    async fn blob_exists(&self, path: &str) -> ServiceResult<bool> {
        self.probes.lock().unwrap().push(path.to_owned());
        if self.failing_storage {
            return Err(AppError::StorageRequestFailed);
        }
        Ok(self.blobs.lock().unwrap().contains(path))
    }

    async fn attachment_path_by_meta_id(&self, meta_id: &str) -> ServiceResult<Option<String>> {
        *self.db_lookups.lock().unwrap() += 1;
        if self.failing_db {
            return Err(AppError::Unexpected);
        }
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|row| row.meta_id.as_deref() == Some(meta_id))
            .find_map(|row| row.attachment_path.clone()))
    }

    async fn indexed_file_path(&self, message_id: &str) -> ServiceResult<Option<String>> {
        *self.db_lookups.lock().unwrap() += 1;
        if self.failing_db {
            return Err(AppError::Unexpected);
        }
        Ok(self.indexed_paths.get(message_id).cloned())
    }
}

#[async_trait]
impl IngestionBackend for FakeBackend {
    fn primary_bucket(&self) -> &str {
        BUCKET
    }

    async fn fetch_media(&self, media_id: &str) -> ServiceResult<FetchedMedia> {
        match self.provider_media.get(media_id) {
            Some((bytes, content_type)) => Ok(FetchedMedia {
                bytes: bytes.clone(),
                content_type: content_type.clone(),
            }),
            None => Err(AppError::WhatsAppMediaUrlFailed),
        }
    }

    async fn upload_blob(
        &self,
        path: &str,
        _bytes: Vec<u8>,
        content_type: &str,
    ) -> ServiceResult<()> {
        if self.failing_storage {
            return Err(AppError::StorageUploadFailed);
        }
        self.blobs.lock().unwrap().insert(path.to_owned());
        self.uploads
            .lock()
            .unwrap()
            .push((path.to_owned(), content_type.to_owned()));
        Ok(())
    }

    async fn upsert_contact(&self, wa_id: &str, name: Option<&str>) -> ServiceResult<()> {
        if self.failing_db {
            return Err(AppError::Unexpected);
        }
        self.contacts
            .lock()
            .unwrap()
            .push((wa_id.to_owned(), name.map(str::to_owned)));
        Ok(())
    }

    async fn insert_message(&self, args: CreateMessageArgs) -> ServiceResult<Message> {
        if self.failing_insert {
            return Err(AppError::MessagesInsertFailed);
        }
        let message = Message {
            id: Uuid::new_v4(),
            contact_id: Some(args.contact_id),
            text: args.text,
            created_at: Utc::now(),
            sender_id: None,
            attachment_path: args.attachment_path,
            attachment_type: args.attachment_type,
            meta_id: args.meta_id,
        };
        self.rows.lock().unwrap().push(message.clone());
        Ok(message)
    }

    async fn enqueue_orphaned_blob(&self, blob: OrphanedBlob) -> ServiceResult<()> {
        self.orphans.lock().unwrap().push(blob);
        Ok(())
    }

    async fn publish_change(&self, contact_id: &str, event: ChangeEvent) -> ServiceResult<()> {
        self.events
            .lock()
            .unwrap()
            .push((contact_id.to_owned(), event));
        Ok(())
    }
}
