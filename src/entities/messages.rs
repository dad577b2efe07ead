use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A row of the `conversations` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Message {
    pub id: Uuid,
    pub contact_id: Option<String>,
    pub text: Option<String>,
    pub created_at: DateTime<Utc>,
    pub sender_id: Option<i64>,
    pub attachment_path: Option<String>,
    pub attachment_type: Option<String>,
    pub meta_id: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CreateMessageArgs {
    pub contact_id: String,
    pub text: Option<String>,
    pub attachment_path: Option<String>,
    pub attachment_type: Option<String>,
    pub meta_id: Option<String>,
}
