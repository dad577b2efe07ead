use crate::api::RequestContext;
use crate::common::error::ServiceResponse;
use crate::models::contacts::Contact;
use crate::usecases::contacts;
use axum::Json;
use axum::extract::Path;

pub async fn fetch_one(ctx: RequestContext, Path(chat_id): Path<String>) -> ServiceResponse<Contact> {
    let contact = contacts::fetch_one(&ctx, &chat_id).await?;
    Ok(Json(contact))
}
