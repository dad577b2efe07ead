use serde_json::json;
use support_chat_service::adapters::whatsapp::WhatsAppClient;
use support_chat_service::common::error::AppError;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ACCESS_TOKEN: &str = "graph-token";

#[tokio::test]
async fn media_is_looked_up_then_downloaded_with_the_bearer_token() {
    let server = MockServer::start().await;
    let download_url = format!("{}/download/media-1", server.uri());
    Mock::given(method("GET"))
        .and(path("/media-1"))
        .and(header("authorization", format!("Bearer {ACCESS_TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "media-1",
            "url": download_url,
            "mime_type": "image/jpeg",
            "file_size": 3
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/download/media-1"))
        .and(header("authorization", format!("Bearer {ACCESS_TOKEN}").as_str()))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/jpeg")
                .set_body_bytes(b"\xff\xd8\xff".to_vec()),
        )
        .expect(1)
        .mount(&server)
        .await;
    let whatsapp = WhatsAppClient::new(&server.uri(), ACCESS_TOKEN);

    let info = whatsapp.fetch_media_info("media-1").await.unwrap();
    assert_eq!(info.mime_type.as_deref(), Some("image/jpeg"));
    assert_eq!(info.file_size, Some(3));

    let download = whatsapp
        .download_media(info.url.as_deref().unwrap())
        .await
        .unwrap();
    assert_eq!(download.bytes, b"\xff\xd8\xff".to_vec());
    assert_eq!(download.content_type.as_deref(), Some("image/jpeg"));
}

#[tokio::test]
async fn media_info_without_url_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/media-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "media-2" })))
        .mount(&server)
        .await;

    let result = WhatsAppClient::new(&server.uri(), ACCESS_TOKEN)
        .fetch_media_info("media-2")
        .await;

    assert!(matches!(result, Err(AppError::WhatsAppMediaUrlMissing)));
}

#[tokio::test]
async fn provider_errors_map_to_typed_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/expired"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "message": "Error validating access token" }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/download/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let whatsapp = WhatsAppClient::new(&server.uri(), ACCESS_TOKEN);

    assert!(matches!(
        whatsapp.fetch_media_info("expired").await,
        Err(AppError::WhatsAppMediaUrlFailed)
    ));
    assert!(matches!(
        whatsapp
            .download_media(&format!("{}/download/gone", server.uri()))
            .await,
        Err(AppError::WhatsAppMediaDownloadFailed)
    ));
}
