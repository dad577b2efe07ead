use serde::Serialize;

const IMAGE_MIME_PREFIX: &str = "image/";
const PDF_MIME_PREFIX: &str = "application/pdf";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentKind {
    Image,
    Pdf,
}

impl AttachmentKind {
    /// Classifies a declared MIME type by prefix. Anything that is neither an
    /// image nor a PDF is unsupported.
    pub fn from_mime(declared_type: &str) -> Option<Self> {
        let declared_type = declared_type.trim();
        if declared_type.starts_with(IMAGE_MIME_PREFIX) {
            Some(AttachmentKind::Image)
        } else if declared_type.starts_with(PDF_MIME_PREFIX) {
            Some(AttachmentKind::Pdf)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedReason {
    UnsupportedType,
    LegacyUnrecoverable,
    NotFound,
    MediaNotRetrieved,
    LookupFailed,
}

impl UnresolvedReason {
    pub const fn detail(self) -> &'static str {
        match self {
            UnresolvedReason::UnsupportedType => "unsupported file type",
            UnresolvedReason::LegacyUnrecoverable => {
                "This attachment uses a legacy identifier and is no longer available"
            }
            UnresolvedReason::NotFound => "File not found in storage or database records",
            UnresolvedReason::MediaNotRetrieved => {
                "The WhatsApp media file could not be retrieved from storage"
            }
            UnresolvedReason::LookupFailed => {
                "Unable to load attachment, storage or database lookups failed"
            }
        }
    }

    /// Whether asking again later could plausibly succeed.
    pub const fn is_retryable(self) -> bool {
        match self {
            UnresolvedReason::UnsupportedType | UnresolvedReason::LegacyUnrecoverable => false,
            UnresolvedReason::NotFound
            | UnresolvedReason::MediaNotRetrieved
            | UnresolvedReason::LookupFailed => true,
        }
    }
}

/// Outcome of resolving an attachment reference. Resolution failures are values,
/// never errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Resolution {
    Resolved {
        url: String,
    },
    Unresolved {
        legacy: bool,
        reason: UnresolvedReason,
        detail: String,
    },
}

impl Resolution {
    pub fn unresolved(reason: UnresolvedReason) -> Self {
        Resolution::Unresolved {
            legacy: reason == UnresolvedReason::LegacyUnrecoverable,
            reason,
            detail: reason.detail().to_owned(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved { .. })
    }
}

/// What a client renders for one attachment. There are exactly three states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AttachmentState {
    Loading {
        reference: String,
        declared_type: String,
    },
    Ready {
        kind: AttachmentKind,
        url: String,
    },
    Failed {
        message: &'static str,
        legacy: bool,
        retryable: bool,
    },
}

impl AttachmentState {
    pub fn from_resolution(declared_type: &str, resolution: Resolution) -> Self {
        let kind = AttachmentKind::from_mime(declared_type);
        match (kind, resolution) {
            (Some(kind), Resolution::Resolved { url }) => AttachmentState::Ready { kind, url },
            (None, _) => AttachmentState::Failed {
                message: "Unsupported attachment",
                legacy: false,
                retryable: false,
            },
            (Some(kind), Resolution::Unresolved { legacy, reason, .. }) => {
                let message = match (legacy, kind) {
                    (true, _) => "This image is no longer available",
                    (false, AttachmentKind::Image) => "Unable to load image",
                    (false, AttachmentKind::Pdf) => "Unable to load document",
                };
                AttachmentState::Failed {
                    message,
                    legacy,
                    retryable: reason.is_retryable(),
                }
            }
        }
    }
}
