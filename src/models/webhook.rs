use serde::{Deserialize, Serialize};

/// Inbound notification from the WhatsApp Cloud API. Only the first entry,
/// change, message and contact are ever looked at.
#[derive(Debug, Default, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub entry: Vec<WebhookEntry>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WebhookEntry {
    #[serde(default)]
    pub changes: Vec<WebhookChange>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WebhookChange {
    #[serde(default)]
    pub value: Option<WebhookValue>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WebhookValue {
    #[serde(default)]
    pub messages: Vec<InboundMessage>,
    #[serde(default)]
    pub contacts: Vec<InboundContact>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InboundMessage {
    pub id: String,
    #[serde(rename = "type")]
    pub message_type: String,
    pub image: Option<InboundMedia>,
    pub document: Option<InboundMedia>,
    pub text: Option<InboundText>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InboundMedia {
    pub id: String,
    pub caption: Option<String>,
    pub mime_type: Option<String>,
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InboundText {
    pub body: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InboundContact {
    pub wa_id: String,
    pub profile: Option<InboundProfile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InboundProfile {
    pub name: Option<String>,
}

impl WebhookPayload {
    fn value(&self) -> Option<&WebhookValue> {
        self.entry.first()?.changes.first()?.value.as_ref()
    }

    pub fn first_message(&self) -> Option<&InboundMessage> {
        self.value()?.messages.first()
    }

    pub fn first_contact(&self) -> Option<&InboundContact> {
        self.value()?.contacts.first()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaCategory {
    Image,
    Document,
}

impl MediaCategory {
    pub const fn fallback_content_type(self) -> &'static str {
        match self {
            MediaCategory::Image => "image/jpeg",
            MediaCategory::Document => "application/octet-stream",
        }
    }

    pub const fn placeholder_text(self) -> &'static str {
        match self {
            MediaCategory::Image => "Image message",
            MediaCategory::Document => "Document message",
        }
    }

    pub const fn processed_status(self) -> &'static str {
        match self {
            MediaCategory::Image => "Image processed successfully",
            MediaCategory::Document => "Document processed successfully",
        }
    }
}

/// What an inbound message carries, in the order the pipeline checks it.
#[derive(Debug, Clone, Copy)]
pub enum InboundContent<'a> {
    Media {
        category: MediaCategory,
        media: &'a InboundMedia,
    },
    Text(&'a str),
    Unsupported,
}

impl InboundMessage {
    pub fn content(&self) -> InboundContent<'_> {
        match (self.message_type.as_str(), &self.image, &self.document) {
            ("image", Some(media), _) => InboundContent::Media {
                category: MediaCategory::Image,
                media,
            },
            ("document", _, Some(media)) => InboundContent::Media {
                category: MediaCategory::Document,
                media,
            },
            _ => match self.text.as_ref().map(|text| text.body.as_str()) {
                Some(body) if !body.is_empty() => InboundContent::Text(body),
                _ => InboundContent::Unsupported,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl WebhookResponse {
    pub const NO_MESSAGE: &'static str = "No message in webhook";
    pub const TEXT_PROCESSED: &'static str = "Message processed successfully";
    pub const NOTHING_PROCESSABLE: &'static str = "No processable content in message";

    pub fn status(status: &'static str) -> Self {
        Self { status, path: None }
    }
}

#[derive(Debug, Serialize)]
pub struct WebhookErrorResponse {
    pub error: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> WebhookPayload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn status_updates_carry_no_message() {
        let payload = parse(json!({
            "entry": [{ "changes": [{ "value": { "statuses": [{ "id": "wamid.1" }] } }] }]
        }));
        assert!(payload.first_message().is_none());
        assert!(parse(json!({})).first_message().is_none());
    }

    #[test]
    fn image_messages_are_media_content() {
        let payload = parse(json!({
            "entry": [{ "changes": [{ "value": {
                "contacts": [{ "wa_id": "27821234567", "profile": { "name": "Thandi" } }],
                "messages": [{
                    "id": "wamid.ABC123",
                    "type": "image",
                    "image": { "id": "media-1", "caption": "receipt", "mime_type": "image/jpeg" }
                }]
            } }] }]
        }));
        let message = payload.first_message().unwrap();
        match message.content() {
            InboundContent::Media { category, media } => {
                assert_eq!(category, MediaCategory::Image);
                assert_eq!(media.id, "media-1");
                assert_eq!(media.caption.as_deref(), Some("receipt"));
            }
            other => panic!("unexpected content {other:?}"),
        }
        assert_eq!(payload.first_contact().unwrap().wa_id, "27821234567");
    }

    #[test]
    fn image_type_without_media_object_falls_through_to_text() {
        let payload = parse(json!({
            "entry": [{ "changes": [{ "value": {
                "messages": [{ "id": "wamid.1", "type": "image", "text": { "body": "hi" } }]
            } }] }]
        }));
        assert!(matches!(
            payload.first_message().unwrap().content(),
            InboundContent::Text("hi")
        ));
    }

    #[test]
    fn stickers_are_not_processable() {
        let payload = parse(json!({
            "entry": [{ "changes": [{ "value": {
                "messages": [{ "id": "wamid.1", "type": "sticker" }]
            } }] }]
        }));
        assert!(matches!(
            payload.first_message().unwrap().content(),
            InboundContent::Unsupported
        ));
    }
}
