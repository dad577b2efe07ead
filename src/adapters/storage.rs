//! Object storage adapter for the backend's REST storage API.
//!
//! Blobs live in named buckets and are addressed by path. The service only
//! ever talks to one primary bucket for reads; orphan cleanup names the bucket
//! explicitly since queued entries may predate a bucket change.

use crate::common::error::{AppError, ServiceResult};
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};
use reqwest::{StatusCode, Url};
use serde::Serialize;
use tracing::{error, warn};

const STORAGE_API_PATH: [&str; 2] = ["storage", "v1"];
const UPLOAD_CACHE_CONTROL: &str = "3600";

#[derive(Clone)]
pub struct StorageClient {
    http: reqwest::Client,
    base_url: Url,
    service_key: String,
    bucket: String,
}

#[derive(Serialize)]
struct RemoveObjectsRequest<'a> {
    prefixes: &'a [String],
}

impl StorageClient {
    pub fn new(base_url: &str, service_key: &str, bucket: &str) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("Storage url {base_url} cannot be used as a base url");
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            service_key: service_key.to_owned(),
            bucket: bucket.to_owned(),
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// `{base}/storage/v1/{endpoint...}/{path}` with every segment percent-encoded.
    /// Object paths may be nested, so `path` is split on `/`.
    fn make_url(&self, endpoint: &[&str], path: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(STORAGE_API_PATH)
                .extend(endpoint)
                .extend(path.split('/').filter(|segment| !segment.is_empty()));
        }
        url
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
    }

    /// Public URL of `path` in the primary bucket. Pure string derivation,
    /// says nothing about whether the blob exists.
    pub fn public_url(&self, path: &str) -> String {
        self.make_url(&["object", "public", self.bucket.as_str()], path)
            .into()
    }

    /// Existence probe against the primary bucket without downloading the body.
    pub async fn exists(&self, path: &str) -> ServiceResult<bool> {
        let url = self.make_url(&["object", "authenticated", self.bucket.as_str()], path);
        let response = self.authorized(self.http.head(url)).send().await?;
        match response.status() {
            status if status.is_success() => Ok(true),
            // the storage API reports missing objects as 400 on some versions
            StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST => Ok(false),
            status => {
                warn!(path, bucket = self.bucket, %status, "Storage probe failed");
                Err(AppError::StorageRequestFailed)
            }
        }
    }

    pub async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> ServiceResult<()> {
        let url = self.make_url(&["object", self.bucket.as_str()], path);
        let size = bytes.len();
        let response = self
            .authorized(self.http.post(url))
            .header(CONTENT_TYPE, content_type)
            .header(CACHE_CONTROL, UPLOAD_CACHE_CONTROL)
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(
                path,
                bucket = self.bucket,
                size,
                content_type,
                %status,
                body,
                "Upload to storage failed"
            );
            return Err(AppError::StorageUploadFailed);
        }
        Ok(())
    }

    /// Deletes `paths` from `bucket`. Paths that do not exist are not an error.
    pub async fn remove(&self, bucket: &str, paths: &[String]) -> ServiceResult<()> {
        if paths.is_empty() {
            return Ok(());
        }
        let url = self.make_url(&["object", bucket], "");
        let response = self
            .authorized(self.http.delete(url))
            .json(&RemoveObjectsRequest { prefixes: paths })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(bucket, count = paths.len(), %status, body, "Removing objects failed");
            return Err(AppError::StorageRequestFailed);
        }
        Ok(())
    }
}
