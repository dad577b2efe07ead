pub mod attachment_index;
pub mod contacts;
pub mod conversation_events;
pub mod messages;
pub mod orphaned_blobs;
