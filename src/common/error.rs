use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

pub type ServiceResult<T> = Result<T, AppError>;
pub type ServiceResponse<T> = ServiceResult<Json<T>>;

#[track_caller]
pub fn unexpected<T, E: Into<anyhow::Error>>(e: E) -> ServiceResult<T> {
    let caller = std::panic::Location::caller();
    error!("An unexpected error has occurred at {caller}: {}", e.into());
    Err(AppError::Unexpected)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppError {
    Unexpected,
    DecodingRequestFailed,

    ContactsNotFound,

    MessagesInsertFailed,

    StorageUploadFailed,
    StorageRequestFailed,

    WebhookMissingContact,

    WhatsAppMediaUrlFailed,
    WhatsAppMediaUrlMissing,
    WhatsAppMediaDownloadFailed,
}

impl<E: Into<anyhow::Error>> From<E> for AppError {
    #[track_caller]
    fn from(e: E) -> Self {
        unexpected::<(), E>(e).unwrap_err()
    }
}

impl AppError {
    pub const fn as_str(&self) -> &str {
        self.code()
    }

    pub const fn code(&self) -> &'static str {
        match self {
            AppError::Unexpected => "unexpected",
            AppError::DecodingRequestFailed => "decoding_request_failed",

            AppError::ContactsNotFound => "contacts.not_found",

            AppError::MessagesInsertFailed => "messages.insert_failed",

            AppError::StorageUploadFailed => "storage.upload_failed",
            AppError::StorageRequestFailed => "storage.request_failed",

            AppError::WebhookMissingContact => "webhook.missing_contact",

            AppError::WhatsAppMediaUrlFailed => "whatsapp.media_url_failed",
            AppError::WhatsAppMediaUrlMissing => "whatsapp.media_url_missing",
            AppError::WhatsAppMediaDownloadFailed => "whatsapp.media_download_failed",
        }
    }

    pub const fn message(&self) -> &'static str {
        match self {
            AppError::Unexpected => "An unexpected error has occurred.",
            AppError::DecodingRequestFailed => "Failed to decode request",

            AppError::ContactsNotFound => "Contact not found",

            AppError::MessagesInsertFailed => "Failed to insert message",

            AppError::StorageUploadFailed => "Failed to upload to storage",
            AppError::StorageRequestFailed => "Storage request failed",

            AppError::WebhookMissingContact => "No contact in webhook",

            AppError::WhatsAppMediaUrlFailed => "Failed to get media URL",
            AppError::WhatsAppMediaUrlMissing => "Failed to get media URL from Meta",
            AppError::WhatsAppMediaDownloadFailed => "Failed to download media",
        }
    }

    pub const fn http_status_code(&self) -> StatusCode {
        match self {
            AppError::DecodingRequestFailed => StatusCode::BAD_REQUEST,

            AppError::ContactsNotFound => StatusCode::NOT_FOUND,

            AppError::StorageRequestFailed
            | AppError::WhatsAppMediaUrlFailed
            | AppError::WhatsAppMediaUrlMissing
            | AppError::WhatsAppMediaDownloadFailed => StatusCode::BAD_GATEWAY,

            AppError::Unexpected
            | AppError::MessagesInsertFailed
            | AppError::StorageUploadFailed
            | AppError::WebhookMissingContact => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub const fn response_parts(&self) -> (StatusCode, Json<ErrorResponse>) {
        let status = self.http_status_code();
        let response = ErrorResponse {
            code: self.code(),
            message: self.message(),
        };
        (status, Json(response))
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.response_parts().into_response()
    }
}
