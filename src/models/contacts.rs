use crate::entities::contacts::{Contact as ContactEntity, ConversationSummary as SummaryEntity};
use crate::models::messages::format_display_time;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// How a chat id given by a client maps onto the `contacts` table.
///
/// Thread keys were historically the provider's `wa_id`, while some clients pass
/// the internal `id`. An id that parses as a UUID may be either; in that case a
/// `wa_id` match takes precedence over an `id` match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKey<'a> {
    WaId(&'a str),
    Either { raw: &'a str, id: Uuid },
}

impl<'a> ContactKey<'a> {
    pub fn from_chat_id(chat_id: &'a str) -> Self {
        match Uuid::parse_str(chat_id) {
            Ok(id) => ContactKey::Either { raw: chat_id, id },
            Err(_) => ContactKey::WaId(chat_id),
        }
    }

    pub fn raw(&self) -> &'a str {
        match self {
            ContactKey::WaId(raw) | ContactKey::Either { raw, .. } => raw,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Contact {
    pub contact_id: Uuid,
    pub wa_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<ContactEntity> for Contact {
    fn from(entity: ContactEntity) -> Self {
        Self {
            contact_id: entity.id,
            wa_id: entity.wa_id,
            name: entity.name.unwrap_or_default(),
            created_at: entity.created_at,
        }
    }
}

impl Contact {
    /// Every `contact_id` value a thread of this contact may have been stored under.
    pub fn thread_keys(&self) -> Vec<String> {
        vec![self.wa_id.clone(), self.contact_id.to_string()]
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversationSummary {
    pub contact_id: Uuid,
    pub wa_id: String,
    pub name: String,
    pub initials: String,
    pub last_message: Option<String>,
    pub last_message_at: Option<DateTime<Utc>>,
    pub display_time: Option<String>,
}

impl From<SummaryEntity> for ConversationSummary {
    fn from(entity: SummaryEntity) -> Self {
        let name = entity.name.unwrap_or_default();
        let initials = match name.trim().is_empty() {
            true => initials(&entity.wa_id),
            false => initials(&name),
        };
        Self {
            contact_id: entity.id,
            wa_id: entity.wa_id,
            initials,
            name,
            last_message: entity.last_message_text,
            display_time: entity.last_message_at.map(format_display_time),
            last_message_at: entity.last_message_at,
        }
    }
}

/// First letter of the first two words, upper-cased.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}
