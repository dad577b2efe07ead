use crate::common::context::Context;

/// Auxiliary tables mapping a message identifier to a stored file path,
/// in lookup order.
pub const INDEX_TABLES: [&str; 2] = ["chat_attachments", "media_files"];

pub async fn fetch_file_path<C: Context>(
    ctx: &C,
    table: &'static str,
    message_id: &str,
) -> sqlx::Result<Option<String>> {
    let query = format!(
        "SELECT file_path FROM {table} WHERE message_id = $1 AND file_path <> '' LIMIT 1"
    );
    sqlx::query_scalar(&query)
        .bind(message_id)
        .fetch_optional(ctx.db())
        .await
}
