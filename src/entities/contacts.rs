use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct Contact {
    pub id: Uuid,
    pub wa_id: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A contact joined with the newest message of its thread, if any.
#[derive(Debug, Clone, FromRow)]
pub struct ConversationSummary {
    pub id: Uuid,
    pub wa_id: String,
    pub name: Option<String>,
    pub last_message_text: Option<String>,
    pub last_message_at: Option<DateTime<Utc>>,
}
