use crate::entities::messages::Message as MessageEntity;
use crate::models::attachments::AttachmentState;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Who a message came from. A missing `sender_id` means the external contact
/// wrote it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Inbound,
    Outbound,
}

impl Direction {
    pub fn from_sender_id(sender_id: Option<i64>) -> Self {
        match sender_id {
            None => Direction::Inbound,
            Some(_) => Direction::Outbound,
        }
    }
}

/// The reference a message carries for its attachment, derived at read time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentRef {
    pub reference: String,
    pub declared_type: String,
}

impl AttachmentRef {
    /// `attachment_path` wins over `meta_id`. Without a declared type, or without
    /// any non-empty reference, the message has no attachment.
    pub fn from_columns(
        attachment_path: Option<&str>,
        meta_id: Option<&str>,
        attachment_type: Option<&str>,
    ) -> Option<Self> {
        let declared_type = attachment_type.filter(|t| !t.trim().is_empty())?;
        let reference = attachment_path
            .filter(|path| !path.is_empty())
            .or_else(|| meta_id.filter(|id| !id.is_empty()))?;
        Some(Self {
            reference: reference.to_owned(),
            declared_type: declared_type.to_owned(),
        })
    }

    /// The state shown before resolution has finished.
    pub fn loading(&self) -> AttachmentState {
        AttachmentState::Loading {
            reference: self.reference.clone(),
            declared_type: self.declared_type.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Message {
    pub message_id: Uuid,
    pub contact_id: Option<String>,
    pub text: Option<String>,
    pub created_at: DateTime<Utc>,
    pub direction: Direction,
    pub attachment: Option<AttachmentRef>,
    pub meta_id: Option<String>,
}

impl From<MessageEntity> for Message {
    fn from(value: MessageEntity) -> Self {
        let attachment = AttachmentRef::from_columns(
            value.attachment_path.as_deref(),
            value.meta_id.as_deref(),
            value.attachment_type.as_deref(),
        );
        Self {
            message_id: value.id,
            contact_id: value.contact_id,
            text: value.text,
            created_at: value.created_at,
            direction: Direction::from_sender_id(value.sender_id),
            attachment,
            meta_id: value.meta_id,
        }
    }
}

/// A message as the chat client renders it.
#[derive(Debug, Clone, Serialize)]
pub struct MessageView {
    pub id: Uuid,
    pub text: Option<String>,
    pub created_at: DateTime<Utc>,
    pub display_time: String,
    pub direction: Direction,
    pub attachment: Option<AttachmentState>,
}

impl MessageView {
    pub fn new(message: Message, attachment: Option<AttachmentState>) -> Self {
        Self {
            id: message.message_id,
            display_time: format_display_time(message.created_at),
            text: message.text,
            created_at: message.created_at,
            direction: message.direction,
            attachment,
        }
    }
}

pub fn format_display_time(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%H:%M").to_string()
}

#[derive(Debug, Serialize)]
pub struct ThreadView {
    pub contact_name: String,
    pub messages: Vec<MessageView>,
}
