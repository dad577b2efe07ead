//! Attachment resolution.
//!
//! A message's attachment reference may come from any of several ingestion
//! naming epochs (`{timestamp}.jpg`, `{providerMessageId}_{timestamp}.jpg`,
//! `{timestamp}_{uuid}.jpg`, `{providerMessageId}.jpg`) or be a bare provider
//! message id. Stored blobs were never migrated between epochs, so resolution
//! runs an ordered list of strategies and takes the first hit.
//!
//! Resolution is read-only and never fails: backend errors only make the
//! strategy that hit them miss.

use crate::common::context::Context;
use crate::common::error::{ServiceResult, unexpected};
use crate::models::attachments::{AttachmentKind, Resolution, UnresolvedReason};
use crate::repositories::{attachment_index, messages};
use async_trait::async_trait;
use tracing::{debug, info, warn};

/// The stores the resolver reads from.
#[async_trait]
pub trait AttachmentSources: Sync + Send {
    /// Public URL of `path` in the primary bucket.
    fn public_url(&self, path: &str) -> String;

    /// Whether `path` exists in the primary bucket.
    async fn blob_exists(&self, path: &str) -> ServiceResult<bool>;

    /// `attachment_path` of a message row whose `meta_id` is `meta_id`.
    async fn attachment_path_by_meta_id(&self, meta_id: &str) -> ServiceResult<Option<String>>;

    /// File path recorded for `message_id` in the auxiliary index tables.
    async fn indexed_file_path(&self, message_id: &str) -> ServiceResult<Option<String>>;
}

#[async_trait]
impl<C: Context> AttachmentSources for C {
    fn public_url(&self, path: &str) -> String {
        self.storage().public_url(path)
    }

    async fn blob_exists(&self, path: &str) -> ServiceResult<bool> {
        self.storage().exists(path).await
    }

    async fn attachment_path_by_meta_id(&self, meta_id: &str) -> ServiceResult<Option<String>> {
        match messages::fetch_attachment_path_by_meta_id(self, meta_id).await {
            Ok(path) => Ok(path),
            Err(e) => unexpected(e),
        }
    }

    async fn indexed_file_path(&self, message_id: &str) -> ServiceResult<Option<String>> {
        let mut failure = None;
        for table in attachment_index::INDEX_TABLES {
            match attachment_index::fetch_file_path(self, table, message_id).await {
                Ok(Some(path)) => return Ok(Some(path)),
                Ok(None) => {}
                Err(e) => {
                    warn!(table, message_id, "Attachment index lookup failed: {e}");
                    failure = Some(e);
                }
            }
        }
        match failure {
            Some(e) => unexpected(e),
            None => Ok(None),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// The reference already is a stored filename.
    DirectPath,
    /// The reference plus guessed extensions and suffixes.
    ProbeCandidates,
    /// The reference is a provider message id recorded on another row.
    MessageMetaId,
    /// The reference is a message id in an auxiliary index table.
    AttachmentIndex,
}

pub const RESOLUTION_ORDER: [Strategy; 4] = [
    Strategy::DirectPath,
    Strategy::ProbeCandidates,
    Strategy::MessageMetaId,
    Strategy::AttachmentIndex,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrategyOutcome {
    Found(String),
    Missed,
    /// At least one backend call failed and nothing was found.
    Failed,
}

impl Strategy {
    pub const fn name(self) -> &'static str {
        match self {
            Strategy::DirectPath => "direct_path",
            Strategy::ProbeCandidates => "probe_candidates",
            Strategy::MessageMetaId => "message_meta_id",
            Strategy::AttachmentIndex => "attachment_index",
        }
    }

    pub fn applies_to(self, reference: &str) -> bool {
        match self {
            Strategy::DirectPath => reference.contains('.'),
            Strategy::ProbeCandidates | Strategy::MessageMetaId | Strategy::AttachmentIndex => true,
        }
    }

    pub async fn attempt<S: AttachmentSources>(
        self,
        sources: &S,
        reference: &str,
    ) -> StrategyOutcome {
        match self {
            Strategy::DirectPath => probe(sources, reference).await,
            Strategy::ProbeCandidates => {
                let mut failed = false;
                for candidate in probe_candidates(reference) {
                    match probe(sources, &candidate).await {
                        StrategyOutcome::Found(url) => return StrategyOutcome::Found(url),
                        StrategyOutcome::Missed => {}
                        StrategyOutcome::Failed => failed = true,
                    }
                }
                match failed {
                    true => StrategyOutcome::Failed,
                    false => StrategyOutcome::Missed,
                }
            }
            Strategy::MessageMetaId => {
                let result = sources.attachment_path_by_meta_id(reference).await;
                found_path(sources, result)
            }
            Strategy::AttachmentIndex => {
                let result = sources.indexed_file_path(reference).await;
                found_path(sources, result)
            }
        }
    }
}

async fn probe<S: AttachmentSources>(sources: &S, path: &str) -> StrategyOutcome {
    match sources.blob_exists(path).await {
        Ok(true) => StrategyOutcome::Found(sources.public_url(path)),
        Ok(false) => StrategyOutcome::Missed,
        Err(e) => {
            debug!(path, error = e.code(), "Storage probe failed");
            StrategyOutcome::Failed
        }
    }
}

fn found_path<S: AttachmentSources>(
    sources: &S,
    result: ServiceResult<Option<String>>,
) -> StrategyOutcome {
    match result {
        Ok(Some(path)) if !path.is_empty() => StrategyOutcome::Found(sources.public_url(&path)),
        Ok(_) => StrategyOutcome::Missed,
        Err(_) => StrategyOutcome::Failed,
    }
}

/// Purely numeric references longer than 8 digits come from an abandoned
/// ingestion path that rarely stored a retrievable file.
pub fn is_legacy_reference(reference: &str) -> bool {
    reference.len() > 8 && reference.bytes().all(|b| b.is_ascii_digit())
}

pub fn looks_like_whatsapp_media_id(reference: &str) -> bool {
    reference.starts_with("wamid.")
        || reference.contains("WhatsApp")
        || (reference.contains("3A") && reference.len() > 20)
}

/// The media id part of a stored filename: text before the first `_`, else
/// before the first `.`, else the whole reference.
pub fn media_id_of(reference: &str) -> &str {
    if let Some((head, _)) = reference.split_once('_') {
        head
    } else if let Some((head, _)) = reference.split_once('.') {
        head
    } else {
        reference
    }
}

/// Filenames to probe for a reference, in probe order, without duplicates.
/// The bare reference is only included when it has no extension, since the
/// direct path already covers it otherwise.
pub fn probe_candidates(reference: &str) -> Vec<String> {
    let head = reference.split('_').next().unwrap_or(reference);
    let media_id = media_id_of(reference);

    let mut candidates = vec![format!("{reference}.jpg")];
    if !reference.contains('.') {
        candidates.push(reference.to_owned());
    }
    candidates.extend([
        format!("{reference}.jpeg"),
        format!("{reference}.png"),
        format!("{reference}_image.jpg"),
        format!("{head}.jpg"),
        format!("{media_id}.jpg"),
        format!("{media_id}.jpeg"),
        format!("{media_id}.png"),
    ]);

    let mut unique = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !unique.contains(&candidate) {
            unique.push(candidate);
        }
    }
    unique
}

/// Maps an attachment reference to a fetchable URL or a typed failure.
pub async fn resolve<S: AttachmentSources>(
    sources: &S,
    reference: &str,
    declared_type: &str,
) -> Resolution {
    if AttachmentKind::from_mime(declared_type).is_none() {
        debug!(reference, declared_type, "Unsupported attachment type");
        return Resolution::unresolved(UnresolvedReason::UnsupportedType);
    }
    if reference.is_empty() {
        return Resolution::unresolved(UnresolvedReason::NotFound);
    }

    // only labels the final failure, the chain still runs
    let legacy = is_legacy_reference(reference);

    let mut failed_strategies = 0;
    for strategy in RESOLUTION_ORDER {
        if !strategy.applies_to(reference) {
            continue;
        }
        match strategy.attempt(sources, reference).await {
            StrategyOutcome::Found(url) => {
                debug!(reference, strategy = strategy.name(), url, "Resolved attachment");
                return Resolution::Resolved { url };
            }
            StrategyOutcome::Missed => {}
            StrategyOutcome::Failed => failed_strategies += 1,
        }
    }

    let reason = if legacy {
        info!(reference, "Legacy attachment reference, no blob to recover");
        UnresolvedReason::LegacyUnrecoverable
    } else if failed_strategies > 0 {
        UnresolvedReason::LookupFailed
    } else if looks_like_whatsapp_media_id(reference) {
        UnresolvedReason::MediaNotRetrieved
    } else {
        UnresolvedReason::NotFound
    };
    warn!(
        reference,
        declared_type,
        failed_strategies,
        reason = reason.detail(),
        "Attachment could not be resolved"
    );
    Resolution::unresolved(reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_references_are_long_and_numeric() {
        assert!(is_legacy_reference("1700000000"));
        assert!(is_legacy_reference("123456789"));
        assert!(!is_legacy_reference("12345678"));
        assert!(!is_legacy_reference("1700000000.jpg"));
        assert!(!is_legacy_reference("17000000001_a"));
        assert!(!is_legacy_reference(""));
    }

    #[test]
    fn whatsapp_media_ids_are_recognized() {
        assert!(looks_like_whatsapp_media_id("wamid.HBgLMjc4MjEyMzQ1Njc"));
        assert!(looks_like_whatsapp_media_id("WhatsApp Image 2024"));
        assert!(looks_like_whatsapp_media_id("wamid_3A1B2C3D4E5F6A7B8C9D"));
        assert!(!looks_like_whatsapp_media_id("1700000000000_abc.jpg"));
    }

    #[test]
    fn media_id_prefers_the_underscore_prefix() {
        assert_eq!(media_id_of("wamid.X_1700.jpg"), "wamid.X");
        assert_eq!(media_id_of("1700.jpg"), "1700");
        assert_eq!(media_id_of("abc"), "abc");
    }

    #[test]
    fn candidates_for_a_bare_reference() {
        assert_eq!(
            probe_candidates("abc"),
            vec!["abc.jpg", "abc", "abc.jpeg", "abc.png", "abc_image.jpg"]
        );
    }

    #[test]
    fn candidates_include_the_prefix_before_the_first_underscore() {
        assert_eq!(
            probe_candidates("media-1_1700"),
            vec![
                "media-1_1700.jpg",
                "media-1_1700",
                "media-1_1700.jpeg",
                "media-1_1700.png",
                "media-1_1700_image.jpg",
                "media-1.jpg",
                "media-1.jpeg",
                "media-1.png",
            ]
        );
    }

    #[test]
    fn candidates_for_a_reference_with_an_extension_skip_the_bare_path() {
        let candidates = probe_candidates("wamid.OLD999");
        assert!(!candidates.contains(&"wamid.OLD999".to_owned()));
        assert_eq!(candidates[0], "wamid.OLD999.jpg");
        assert!(candidates.contains(&"wamid.jpg".to_owned()));
    }

    #[test]
    fn strategy_order_is_fixed() {
        let names: Vec<_> = RESOLUTION_ORDER.iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            vec!["direct_path", "probe_candidates", "message_meta_id", "attachment_index"]
        );
        assert!(Strategy::DirectPath.applies_to("a.jpg"));
        assert!(!Strategy::DirectPath.applies_to("abc"));
    }
}
