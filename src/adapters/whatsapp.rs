use crate::common::error::{AppError, ServiceResult};
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use tracing::error;

#[derive(Clone)]
pub struct WhatsAppClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
}

/// Media metadata returned by the Graph API for a media id.
/// The `url` is short-lived and must be fetched with the same bearer token.
#[derive(Debug, Deserialize)]
pub struct MediaInfo {
    pub id: Option<String>,
    pub url: Option<String>,
    pub mime_type: Option<String>,
    pub file_size: Option<u64>,
}

pub struct MediaDownload {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

impl WhatsAppClient {
    pub fn new(base_url: &str, access_token: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            access_token: access_token.to_owned(),
        }
    }

    fn make_url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.base_url)
    }

    pub async fn fetch_media_info(&self, media_id: &str) -> ServiceResult<MediaInfo> {
        let response = self
            .http
            .get(self.make_url(media_id))
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(media_id, %status, body, "Failed to get media URL");
            return Err(AppError::WhatsAppMediaUrlFailed);
        }

        let info: MediaInfo = response.json().await?;
        match info.url {
            Some(ref url) if !url.is_empty() => Ok(info),
            _ => {
                error!(media_id, ?info, "No URL in media data");
                Err(AppError::WhatsAppMediaUrlMissing)
            }
        }
    }

    pub async fn download_media(&self, url: &str) -> ServiceResult<MediaDownload> {
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%status, body, "Failed to download media");
            return Err(AppError::WhatsAppMediaDownloadFailed);
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let bytes = response.bytes().await?.to_vec();
        Ok(MediaDownload {
            bytes,
            content_type,
        })
    }
}
