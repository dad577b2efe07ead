use crate::entities::messages::Message;
use crate::models::messages::{Message as MessageModel, MessageView};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A row change on the `conversations` table, scoped to one contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "UPPERCASE")]
pub enum ChangeEvent {
    Insert { new: Message },
    Update { new: Message },
    Delete { old_id: Uuid },
}

impl ChangeEvent {
    pub const fn name(&self) -> &'static str {
        match self {
            ChangeEvent::Insert { .. } => "insert",
            ChangeEvent::Update { .. } => "update",
            ChangeEvent::Delete { .. } => "delete",
        }
    }

    /// What the live feed sends for this event. Attachments of new or changed
    /// messages are left loading for the client to resolve.
    pub fn into_feed_payload(self) -> FeedPayload {
        match self {
            ChangeEvent::Insert { new } | ChangeEvent::Update { new } => {
                let message = MessageModel::from(new);
                let attachment = message.attachment.as_ref().map(|a| a.loading());
                FeedPayload::Message(MessageView::new(message, attachment))
            }
            ChangeEvent::Delete { old_id } => FeedPayload::Removed { id: old_id },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum FeedPayload {
    Message(MessageView),
    Removed { id: Uuid },
}

/// The in-memory message list of an open conversation, kept current by
/// applying change events in the order they arrive.
#[derive(Debug, Default)]
pub struct MessageThread {
    messages: Vec<Message>,
}

impl MessageThread {
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn apply(&mut self, event: ChangeEvent) {
        match event {
            ChangeEvent::Insert { new } => self.messages.push(new),
            ChangeEvent::Update { new } => {
                if let Some(existing) = self.messages.iter_mut().find(|m| m.id == new.id) {
                    *existing = new;
                }
            }
            ChangeEvent::Delete { old_id } => self.messages.retain(|m| m.id != old_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn message(text: &str) -> Message {
        Message {
            id: Uuid::new_v4(),
            contact_id: Some("27821234567".to_owned()),
            text: Some(text.to_owned()),
            created_at: Utc::now(),
            sender_id: None,
            attachment_path: None,
            attachment_type: None,
            meta_id: None,
        }
    }

    #[test]
    fn events_apply_in_arrival_order() {
        let first = message("hello");
        let second = message("anyone there?");
        let mut thread = MessageThread::new(vec![first.clone()]);

        thread.apply(ChangeEvent::Insert { new: second.clone() });
        let mut edited = first.clone();
        edited.text = Some("hello!".to_owned());
        thread.apply(ChangeEvent::Update { new: edited });
        thread.apply(ChangeEvent::Delete { old_id: second.id });

        let texts: Vec<_> = thread.messages().iter().map(|m| m.text.as_deref()).collect();
        assert_eq!(texts, vec![Some("hello!")]);
    }

    #[test]
    fn update_for_an_unknown_message_is_ignored() {
        let mut thread = MessageThread::new(vec![message("hello")]);
        thread.apply(ChangeEvent::Update { new: message("stranger") });
        assert_eq!(thread.messages().len(), 1);
        assert_eq!(thread.messages()[0].text.as_deref(), Some("hello"));
    }

    #[test]
    fn inserted_attachments_start_out_loading() {
        let mut new = message("receipt");
        new.attachment_path = Some("1700000000000_abc.jpg".to_owned());
        new.attachment_type = Some("image/jpeg".to_owned());
        let payload = serde_json::to_value(ChangeEvent::Insert { new }.into_feed_payload()).unwrap();
        assert_eq!(payload["direction"], "inbound");
        assert_eq!(payload["attachment"]["state"], "loading");
        assert_eq!(payload["attachment"]["reference"], "1700000000000_abc.jpg");
    }

    #[test]
    fn events_round_trip_through_json() {
        let event = ChangeEvent::Delete { old_id: Uuid::nil() };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"event_type\":\"DELETE\""));
        assert_eq!(serde_json::from_str::<ChangeEvent>(&json).unwrap(), event);
    }
}
