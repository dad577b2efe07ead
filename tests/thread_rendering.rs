mod common;

use chrono::{TimeZone, Utc};
use common::{FakeBackend, public_url};
use support_chat_service::entities::messages::Message as MessageEntity;
use support_chat_service::models::attachments::{AttachmentKind, AttachmentState};
use support_chat_service::models::messages::{Direction, Message};
use support_chat_service::usecases::messages::render_messages;
use uuid::Uuid;

fn row(
    minute: u32,
    sender_id: Option<i64>,
    attachment_path: Option<&str>,
    attachment_type: Option<&str>,
    meta_id: Option<&str>,
) -> Message {
    Message::from(MessageEntity {
        id: Uuid::new_v4(),
        contact_id: Some("27821234567".to_owned()),
        text: Some("Image message".to_owned()),
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 14, minute, 0).unwrap(),
        sender_id,
        attachment_path: attachment_path.map(str::to_owned),
        attachment_type: attachment_type.map(str::to_owned),
        meta_id: meta_id.map(str::to_owned),
    })
}

#[tokio::test]
async fn each_message_gets_its_own_attachment_state() {
    let stored = "1709301600000_0f0e0d0c-0000-4000-8000-000000000000.jpg";
    let backend = FakeBackend::new().with_blob(stored);
    let messages = vec![
        row(0, None, Some(stored), Some("image/jpeg"), Some("wamid.NEW1")),
        row(1, None, Some("1709000000"), Some("image/jpeg"), None),
        row(2, Some(42), None, None, None),
        row(3, None, None, Some("application/pdf"), Some("wamid.OLD999")),
        row(4, None, Some("voice.ogg"), Some("audio/ogg"), None),
    ];

    let views = render_messages(&backend, messages).await;

    assert_eq!(views.len(), 5);
    assert_eq!(
        views[0].attachment,
        Some(AttachmentState::Ready {
            kind: AttachmentKind::Image,
            url: public_url(stored),
        })
    );
    assert_eq!(
        views[1].attachment,
        Some(AttachmentState::Failed {
            message: "This image is no longer available",
            legacy: true,
            retryable: false,
        })
    );
    assert_eq!(views[2].attachment, None);
    assert_eq!(views[2].direction, Direction::Outbound);
    assert_eq!(
        views[3].attachment,
        Some(AttachmentState::Failed {
            message: "Unable to load document",
            legacy: false,
            retryable: true,
        })
    );
    assert_eq!(
        views[4].attachment,
        Some(AttachmentState::Failed {
            message: "Unsupported attachment",
            legacy: false,
            retryable: false,
        })
    );
    assert_eq!(views[0].display_time, "14:00");
    assert_eq!(views[0].direction, Direction::Inbound);
}

#[tokio::test]
async fn storage_outage_fails_attachments_but_not_the_thread() {
    let backend = FakeBackend {
        failing_storage: true,
        failing_db: true,
        ..FakeBackend::new()
    };
    let messages = vec![
        row(0, None, Some("1709301600000_a.jpg"), Some("image/jpeg"), None),
        row(1, None, None, None, None),
    ];

    let views = render_messages(&backend, messages).await;

    assert_eq!(views.len(), 2);
    assert!(matches!(
        views[0].attachment,
        Some(AttachmentState::Failed { retryable: true, legacy: false, .. })
    ));
    assert_eq!(views[1].attachment, None);
}
