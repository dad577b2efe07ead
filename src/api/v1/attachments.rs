use crate::api::RequestContext;
use crate::common::error::ServiceResponse;
use crate::models::attachments::Resolution;
use crate::usecases::attachments;
use axum::Json;
use axum::extract::Query;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ResolveArgs {
    pub reference: String,
    #[serde(rename = "type")]
    pub declared_type: String,
}

/// Resolves a single attachment reference, e.g. when a client retries a
/// failed attachment.
pub async fn resolve(
    ctx: RequestContext,
    Query(args): Query<ResolveArgs>,
) -> ServiceResponse<Resolution> {
    let resolution = attachments::resolve(&ctx, &args.reference, &args.declared_type).await;
    Ok(Json(resolution))
}
