//! Wire-level tests for the Gemini client against a local mock server.

use studio_core::error::RemoteError;
use studio_core::remote::{Artifact, GeminiClient, GeminiModels, PollStatus, RemoteJobClient};

use common::RedactedApiKey;
use models::{
    AspectRatio, AssetSize, GenerationRequest, OperationRef, ReferenceImage, RemoteArtifactRef,
};

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_KEY: &str = "AIzaSyTestKey0123456789abcdefghijklmn";
const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

fn client_for(server: &MockServer) -> GeminiClient {
    GeminiClient::new(
        &format!("{}/v1beta/", server.uri()),
        GeminiModels::default(),
        Some(RedactedApiKey::new(TEST_KEY)),
        Duration::from_secs(5),
    )
    .unwrap()
}

fn reference() -> ReferenceImage {
    ReferenceImage::new(PNG.to_vec(), "image/png")
}

async fn only_request_body(server: &MockServer) -> Value {
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    requests[0].body_json().unwrap()
}

/// **VALUE**: Logos go to the Imagen predict endpoint with the key header.
///
/// **BUG THIS CATCHES**: Would catch the key being sent as a query parameter
/// (it would end up in proxy logs) or the aspect ratio being dropped.
#[tokio::test]
async fn given_logo_request_when_generated_then_predict_called_with_key_header() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/imagen-4.0-generate-001:predict"))
        .and(header("x-goog-api-key", TEST_KEY))
        .and(body_partial_json(json!({
            "instances": [{ "prompt": "a minimalist fox\n\nOutput size: 800x800 pixels." }],
            "parameters": { "aspectRatio": "1:1" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "predictions": [{
                "bytesBase64Encoded": BASE64.encode(PNG),
                "mimeType": "image/png"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    // WHEN
    let artifact = client_for(&server)
        .generate_sync(&GenerationRequest::logo("a minimalist fox"))
        .await
        .unwrap();

    // THEN
    assert_eq!(artifact.bytes(), PNG);
    assert_eq!(artifact.mime_type(), "image/png");
    let requests = server.received_requests().await.unwrap();
    assert!(!requests[0].url.as_str().contains(TEST_KEY));
}

#[tokio::test]
async fn given_custom_size_banner_when_generated_then_dimensions_sent() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/imagen-4.0-generate-001:predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "predictions": [{ "bytesBase64Encoded": BASE64.encode(PNG) }]
        })))
        .mount(&server)
        .await;
    let request = GenerationRequest::banner("retro arcade").with_size(AssetSize::new(
        3000,
        1000,
        AspectRatio::Widescreen,
    ));

    // WHEN
    client_for(&server).generate_sync(&request).await.unwrap();

    // THEN
    let body = only_request_body(&server).await;
    let prompt = body["instances"][0]["prompt"].as_str().unwrap();
    assert!(prompt.contains("3000x1000 pixels"), "prompt was {prompt:?}");
    assert_eq!(body["parameters"]["aspectRatio"], "16:9");
}

#[tokio::test]
async fn given_thumbnail_with_reference_when_generated_then_inline_image_sent() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash-image:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "parts": [
                    { "text": "Here is your thumbnail" },
                    { "inlineData": { "mimeType": "image/png", "data": BASE64.encode(PNG) } }
                ]},
                "finishReason": "STOP"
            }]
        })))
        .mount(&server)
        .await;

    // WHEN
    let artifact = client_for(&server)
        .generate_sync(&GenerationRequest::thumbnail(
            "bold title, surprised face",
            Some(reference()),
        ))
        .await
        .unwrap();

    // THEN
    assert_eq!(artifact.bytes(), PNG);
    let body = only_request_body(&server).await;
    let parts = &body["contents"][0]["parts"];
    assert_eq!(parts[0]["inlineData"]["data"], BASE64.encode(PNG));
    assert_eq!(parts[0]["inlineData"]["mimeType"], "image/png");
    assert_eq!(
        parts[1]["text"],
        "bold title, surprised face\n\nOutput size: 1280x720 pixels."
    );
    assert_eq!(body["generationConfig"]["imageConfig"]["aspectRatio"], "16:9");
}

#[tokio::test]
async fn given_description_request_when_generated_then_text_parts_joined() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "In this video " }, { "text": "we cook pasta." }] }
            }]
        })))
        .mount(&server)
        .await;

    // WHEN
    let artifact = client_for(&server)
        .generate_sync(&GenerationRequest::description("pasta tutorial"))
        .await
        .unwrap();

    // THEN
    assert_eq!(artifact.text(), Some("In this video we cook pasta."));
    let body = only_request_body(&server).await;
    assert_eq!(body["contents"][0]["parts"][0]["text"], "pasta tutorial");
}

#[tokio::test]
async fn given_blocked_text_response_when_generated_then_decode_error() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "finishReason": "SAFETY" }]
        })))
        .mount(&server)
        .await;

    // WHEN
    let result = client_for(&server)
        .generate_sync(&GenerationRequest::about("channel about"))
        .await;

    // THEN
    let Err(RemoteError::Decode { message, .. }) = result else {
        panic!("expected decode error, got {result:?}");
    };
    assert!(message.contains("SAFETY"));
}

/// **VALUE**: The API's error envelope becomes the error message.
///
/// **WHY THIS MATTERS**: Classification reads this text to tell quota
/// problems from bad keys.
///
/// **BUG THIS CATCHES**: Would catch the body being discarded and only the
/// status code kept.
#[tokio::test]
async fn given_error_envelope_when_call_fails_then_status_and_message_kept() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {
                "code": 429,
                "message": "Quota exceeded for metric generate_requests",
                "status": "RESOURCE_EXHAUSTED"
            }
        })))
        .mount(&server)
        .await;

    // WHEN
    let result = client_for(&server)
        .generate_sync(&GenerationRequest::logo("fox"))
        .await;

    // THEN
    let error = result.unwrap_err();
    assert_eq!(error.status_code().map(|s| s.0), Some(429));
    assert_eq!(
        error.message(),
        "RESOURCE_EXHAUSTED: Quota exceeded for metric generate_requests"
    );
}

#[tokio::test]
async fn given_plain_text_error_body_when_call_fails_then_body_used_as_message() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("upstream connect error"))
        .mount(&server)
        .await;

    // WHEN
    let error = client_for(&server)
        .generate_sync(&GenerationRequest::banner("banner"))
        .await
        .unwrap_err();

    // THEN
    assert_eq!(error.status_code().map(|s| s.0), Some(502));
    assert_eq!(error.message(), "upstream connect error");
}

/// **VALUE**: Without a key nothing is sent.
///
/// **BUG THIS CATCHES**: Would catch an unauthenticated request going out
/// and failing later with a confusing 403.
#[tokio::test]
async fn given_no_api_key_when_called_then_auth_error_and_no_request() {
    // GIVEN
    let server = MockServer::start().await;
    let client = GeminiClient::new(
        &format!("{}/v1beta", server.uri()),
        GeminiModels::default(),
        None,
        Duration::from_secs(5),
    )
    .unwrap();

    // WHEN
    let result = client
        .generate_sync(&GenerationRequest::logo("fox"))
        .await;

    // THEN
    assert!(matches!(result, Err(RemoteError::Auth { .. })));
    assert!(!client.has_api_key());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn given_intro_request_when_submitted_then_long_running_operation_started() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(
            "/v1beta/models/veo-3.1-fast-generate-preview:predictLongRunning",
        ))
        .and(header("x-goog-api-key", TEST_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "models/veo-3.1-fast-generate-preview/operations/op123"
        })))
        .mount(&server)
        .await;

    // WHEN
    let operation = client_for(&server)
        .submit_async(&GenerationRequest::intro("Fox Studio", Some(reference())))
        .await
        .unwrap();

    // THEN
    assert_eq!(
        operation.as_str(),
        "models/veo-3.1-fast-generate-preview/operations/op123"
    );
    let body = only_request_body(&server).await;
    assert_eq!(body["instances"][0]["prompt"], "Fox Studio");
    assert_eq!(
        body["instances"][0]["image"]["bytesBase64Encoded"],
        BASE64.encode(PNG)
    );
    assert_eq!(body["parameters"]["aspectRatio"], "16:9");
}

#[tokio::test]
async fn given_sync_kind_when_submitted_async_then_unsupported() {
    // GIVEN
    let server = MockServer::start().await;

    // WHEN
    let result = client_for(&server)
        .submit_async(&GenerationRequest::logo("fox"))
        .await;

    // THEN
    assert!(matches!(result, Err(RemoteError::Unsupported { .. })));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn given_running_operation_when_polled_then_pending() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1beta/models/veo/operations/op123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "models/veo/operations/op123"
        })))
        .mount(&server)
        .await;

    // WHEN
    let status = client_for(&server)
        .poll_async(&OperationRef::new("models/veo/operations/op123"))
        .await
        .unwrap();

    // THEN
    assert!(matches!(status, PollStatus::Pending));
}

#[tokio::test]
async fn given_done_operation_when_polled_then_video_reference_returned() {
    // GIVEN
    let server = MockServer::start().await;
    let video_uri = format!("{}/v1beta/files/vid1:download?alt=media", server.uri());
    Mock::given(method("GET"))
        .and(path("/v1beta/models/veo/operations/op123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "models/veo/operations/op123",
            "done": true,
            "response": { "generateVideoResponse": {
                "generatedSamples": [{ "video": { "uri": video_uri } }]
            }}
        })))
        .mount(&server)
        .await;

    // WHEN
    let status = client_for(&server)
        .poll_async(&OperationRef::new("models/veo/operations/op123"))
        .await
        .unwrap();

    // THEN
    let PollStatus::Completed(remote) = status else {
        panic!("expected completed, got {status:?}");
    };
    assert_eq!(remote.uri, video_uri);
    assert_eq!(remote.mime_type.as_deref(), Some("video/mp4"));
}

#[tokio::test]
async fn given_filtered_operation_when_polled_then_failed_with_reason() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "models/veo/operations/op123",
            "done": true,
            "response": { "generateVideoResponse": {
                "raiMediaFilteredReasons": ["contains a real person"]
            }}
        })))
        .mount(&server)
        .await;

    // WHEN
    let status = client_for(&server)
        .poll_async(&OperationRef::new("models/veo/operations/op123"))
        .await
        .unwrap();

    // THEN
    let PollStatus::Failed { message } = status else {
        panic!("expected failure, got {status:?}");
    };
    assert!(message.contains("contains a real person"));
}

#[tokio::test]
async fn given_operation_error_when_polled_then_failed_with_status() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "models/veo/operations/op123",
            "done": true,
            "error": { "code": 3, "message": "Prompt rejected", "status": "INVALID_ARGUMENT" }
        })))
        .mount(&server)
        .await;

    // WHEN
    let status = client_for(&server)
        .poll_async(&OperationRef::new("models/veo/operations/op123"))
        .await
        .unwrap();

    // THEN
    let PollStatus::Failed { message } = status else {
        panic!("expected failure");
    };
    assert_eq!(message, "INVALID_ARGUMENT: Prompt rejected");
}

#[tokio::test]
async fn given_video_on_api_origin_when_fetched_then_bytes_returned_with_key() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1beta/files/vid1:download"))
        .and(header("x-goog-api-key", TEST_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"mp4-bytes".to_vec()))
        .expect(1)
        .mount(&server)
        .await;
    let remote =
        RemoteArtifactRef::new(format!("{}/v1beta/files/vid1:download?alt=media", server.uri()));

    // WHEN
    let bytes = client_for(&server).fetch_artifact(&remote).await.unwrap();

    // THEN
    assert_eq!(bytes, b"mp4-bytes");
}

/// **VALUE**: The API key never leaks to a third-party download host.
///
/// **BUG THIS CATCHES**: Would catch the key header being attached to every
/// download regardless of where the result URI points.
#[tokio::test]
async fn given_video_on_other_origin_when_fetched_then_key_not_sent() {
    // GIVEN
    let api = MockServer::start().await;
    let storage = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bucket/vid1.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"mp4-bytes".to_vec()))
        .mount(&storage)
        .await;
    let remote = RemoteArtifactRef::new(format!("{}/bucket/vid1.mp4", storage.uri()));

    // WHEN
    let bytes = client_for(&api).fetch_artifact(&remote).await.unwrap();

    // THEN
    assert_eq!(bytes, b"mp4-bytes");
    let requests = storage.received_requests().await.unwrap();
    assert!(!requests[0].headers.contains_key("x-goog-api-key"));
}

#[tokio::test]
async fn given_missing_video_when_fetched_then_http_error() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let remote = RemoteArtifactRef::new(format!("{}/v1beta/files/gone", server.uri()));

    // WHEN
    let error = client_for(&server).fetch_artifact(&remote).await.unwrap_err();

    // THEN
    assert_eq!(error.status_code().map(|s| s.0), Some(404));
    assert_eq!(error.message(), "Not Found");
}

#[tokio::test]
async fn given_text_artifact_when_inspected_then_utf8_bytes_and_plain_mime() {
    let artifact = Artifact::Text("hello".to_string());

    assert_eq!(artifact.bytes(), b"hello");
    assert_eq!(artifact.mime_type(), "text/plain");
    assert_eq!(artifact.text(), Some("hello"));
}
