pub mod contacts;
pub mod messages;
pub mod orphaned_blobs;
