use crate::common::context::Context;
use crate::common::error::{ServiceResult, unexpected};
use crate::entities::orphaned_blobs::OrphanedBlob;
use crate::repositories::orphaned_blobs;
use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use tracing::{error, info, warn};

const BATCH_SIZE: NonZeroUsize = NonZeroUsize::new(100).unwrap();

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub removed: usize,
    pub requeued: usize,
    /// Queue length after the sweep, including requeued blobs.
    pub remaining: usize,
}

pub async fn cleanup_orphaned_blobs<C: Context>(ctx: &C) -> ServiceResult<SweepReport> {
    let blobs = match orphaned_blobs::pop_many(ctx, BATCH_SIZE).await {
        Ok(blobs) => blobs,
        Err(e) => return unexpected(e),
    };
    let mut report = SweepReport::default();
    for (bucket, batch) in group_by_bucket(blobs) {
        let paths: Vec<String> = batch.iter().map(|blob| blob.path.clone()).collect();
        match ctx.storage().remove(&bucket, &paths).await {
            Ok(()) => {
                info!(bucket, count = paths.len(), "Removed orphaned blobs");
                report.removed += paths.len();
            }
            Err(e) => {
                error!(bucket, count = paths.len(), "Failed to remove orphaned blobs: {}", e.message());
                if let Err(e) = orphaned_blobs::push(ctx, &batch).await {
                    error!(bucket, ?paths, "Failed to requeue orphaned blobs: {e:?}");
                    continue;
                }
                report.requeued += batch.len();
            }
        }
    }
    match orphaned_blobs::count(ctx).await {
        Ok(remaining) => report.remaining = remaining,
        Err(e) => warn!("Failed to count orphaned blobs: {e:?}"),
    }
    Ok(report)
}

fn group_by_bucket(blobs: Vec<OrphanedBlob>) -> BTreeMap<String, Vec<OrphanedBlob>> {
    let mut grouped: BTreeMap<String, Vec<OrphanedBlob>> = BTreeMap::new();
    for blob in blobs {
        grouped.entry(blob.bucket.clone()).or_default().push(blob);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn blob(bucket: &str, path: &str) -> OrphanedBlob {
        OrphanedBlob {
            bucket: bucket.to_owned(),
            path: path.to_owned(),
            queued_at: Utc::now(),
        }
    }

    #[test]
    fn blobs_are_grouped_per_bucket_in_queue_order() {
        let grouped = group_by_bucket(vec![
            blob("chat_images", "1.jpg"),
            blob("whatsapp_media", "2.pdf"),
            blob("chat_images", "3.png"),
        ]);
        let chat_images: Vec<_> = grouped["chat_images"].iter().map(|b| b.path.as_str()).collect();
        assert_eq!(chat_images, vec!["1.jpg", "3.png"]);
        assert_eq!(grouped["whatsapp_media"].len(), 1);
    }
}
