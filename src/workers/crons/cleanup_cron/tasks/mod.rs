pub mod cleanup_orphaned_blobs;
