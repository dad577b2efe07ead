pub mod attachments;
pub mod contacts;
pub mod ingestion;
pub mod messages;
pub mod realtime;
