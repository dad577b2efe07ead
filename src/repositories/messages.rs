use crate::common::context::Context;
use crate::entities::messages::{CreateMessageArgs, Message};

const TABLE_NAME: &str = "conversations";
const READ_FIELDS: &str = r#"
id, contact_id, text, created_at, sender_id,
attachment_path, attachment_type, meta_id"#;

pub async fn fetch_by_contact_ids<C: Context>(
    ctx: &C,
    contact_ids: &[String],
) -> sqlx::Result<Vec<Message>> {
    const QUERY: &str = const_str::concat!(
        "SELECT ",
        READ_FIELDS,
        " FROM ",
        TABLE_NAME,
        " WHERE contact_id = ANY($1) ORDER BY created_at ASC, id ASC"
    );
    sqlx::query_as(QUERY)
        .bind(contact_ids)
        .fetch_all(ctx.db())
        .await
}

/// The stored path of the first row carrying `meta_id` that has one.
pub async fn fetch_attachment_path_by_meta_id<C: Context>(
    ctx: &C,
    meta_id: &str,
) -> sqlx::Result<Option<String>> {
    const QUERY: &str = const_str::concat!(
        "SELECT attachment_path FROM ",
        TABLE_NAME,
        " WHERE meta_id = $1 AND attachment_path IS NOT NULL AND attachment_path <> ''",
        " ORDER BY created_at ASC LIMIT 1"
    );
    sqlx::query_scalar(QUERY)
        .bind(meta_id)
        .fetch_optional(ctx.db())
        .await
}

pub async fn create<C: Context>(ctx: &C, args: CreateMessageArgs) -> sqlx::Result<Message> {
    const QUERY: &str = const_str::concat!(
        "INSERT INTO ",
        TABLE_NAME,
        " (contact_id, text, attachment_path, attachment_type, meta_id)",
        " VALUES ($1, $2, $3, $4, $5) RETURNING ",
        READ_FIELDS
    );
    sqlx::query_as(QUERY)
        .bind(args.contact_id)
        .bind(args.text)
        .bind(args.attachment_path)
        .bind(args.attachment_type)
        .bind(args.meta_id)
        .fetch_one(ctx.db())
        .await
}
