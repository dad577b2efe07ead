pub mod tasks;

use crate::common::init;
use crate::cron_tasks;
use crate::settings::AppSettings;
use tasks::cleanup_orphaned_blobs::cleanup_orphaned_blobs;

pub async fn serve(settings: &AppSettings) -> anyhow::Result<()> {
    let ctx = init::initialize_state(settings).await?;
    cron_tasks! {
        &ctx,
        cleanup_orphaned_blobs,
    }
    Ok(())
}
