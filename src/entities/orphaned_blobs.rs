use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A blob that was uploaded but never got its message row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrphanedBlob {
    pub bucket: String,
    pub path: String,
    pub queued_at: DateTime<Utc>,
}
