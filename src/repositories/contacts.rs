use crate::common::context::Context;
use crate::entities::contacts::{Contact, ConversationSummary};
use crate::models::contacts::ContactKey;

const TABLE_NAME: &str = "contacts";
const READ_FIELDS: &str = "id, wa_id, name, created_at";

/// Looks a contact up by either key in a single query. When the key may be
/// both a `wa_id` and an `id`, a `wa_id` match wins.
pub async fn fetch_one_by_key<C: Context>(
    ctx: &C,
    key: ContactKey<'_>,
) -> sqlx::Result<Option<Contact>> {
    match key {
        ContactKey::WaId(wa_id) => {
            const QUERY: &str = const_str::concat!(
                "SELECT ",
                READ_FIELDS,
                " FROM ",
                TABLE_NAME,
                " WHERE wa_id = $1"
            );
            sqlx::query_as(QUERY)
                .bind(wa_id)
                .fetch_optional(ctx.db())
                .await
        }
        ContactKey::Either { raw, id } => {
            const QUERY: &str = const_str::concat!(
                "SELECT ",
                READ_FIELDS,
                " FROM ",
                TABLE_NAME,
                " WHERE wa_id = $1 OR id = $2",
                " ORDER BY (wa_id = $1) DESC LIMIT 1"
            );
            sqlx::query_as(QUERY)
                .bind(raw)
                .bind(id)
                .fetch_optional(ctx.db())
                .await
        }
    }
}

/// Creates the contact if its `wa_id` is new, otherwise fills in a missing name.
pub async fn upsert_by_wa_id<C: Context>(
    ctx: &C,
    wa_id: &str,
    name: Option<&str>,
) -> sqlx::Result<()> {
    const QUERY: &str = const_str::concat!(
        "INSERT INTO ",
        TABLE_NAME,
        " (wa_id, name) VALUES ($1, $2)",
        " ON CONFLICT (wa_id) DO UPDATE SET name = COALESCE(",
        TABLE_NAME,
        ".name, EXCLUDED.name)"
    );
    sqlx::query(QUERY)
        .bind(wa_id)
        .bind(name)
        .execute(ctx.db())
        .await?;
    Ok(())
}

pub async fn fetch_conversation_summaries<C: Context>(
    ctx: &C,
) -> sqlx::Result<Vec<ConversationSummary>> {
    const QUERY: &str = r#"
SELECT c.id, c.wa_id, c.name,
       last_message.text AS last_message_text,
       last_message.created_at AS last_message_at
FROM contacts c
LEFT JOIN LATERAL (
    SELECT m.text, m.created_at
    FROM conversations m
    WHERE m.contact_id = c.wa_id OR m.contact_id = c.id::text
    ORDER BY m.created_at DESC
    LIMIT 1
) last_message ON TRUE
ORDER BY last_message.created_at DESC NULLS LAST, c.created_at DESC"#;
    sqlx::query_as(QUERY).fetch_all(ctx.db()).await
}
