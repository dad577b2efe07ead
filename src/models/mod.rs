pub mod attachments;
pub mod contacts;
pub mod messages;
pub mod realtime;
pub mod webhook;
