// Unit tests for Gemini request bodies and response parsing.

use crate::remote::gemini::wire::{
    ErrorEnvelope, GenerateContentResponse, Operation, edit_image_body, predict_body, video_body,
};

use models::{
    AspectRatio, AssetSize, BANNER_SIZE, LOGO_SIZE, ReferenceImage, THUMBNAIL_SIZE,
    VideoResolution,
};

use serde_json::json;

#[test]
fn given_prompt_when_predict_body_built_then_instance_and_aspect_ratio() {
    let body = predict_body("a fox logo", LOGO_SIZE);

    assert_eq!(
        body["instances"][0]["prompt"],
        "a fox logo\n\nOutput size: 800x800 pixels."
    );
    assert_eq!(body["parameters"]["aspectRatio"], "1:1");
    assert_eq!(body["parameters"]["sampleCount"], 1);
}

/// **VALUE**: A custom banner size reaches the generator.
///
/// **BUG THIS CATCHES**: Would catch custom dimensions collapsing into the
/// aspect ratio, making 3000x1000 and the default banner identical requests.
#[test]
fn given_custom_banner_size_when_predict_body_built_then_dimensions_in_prompt() {
    // GIVEN
    let custom = AssetSize::new(3000, 1000, AspectRatio::Widescreen);

    // WHEN
    let custom_body = predict_body("retro arcade", custom);
    let default_body = predict_body("retro arcade", BANNER_SIZE);

    // THEN
    let prompt = custom_body["instances"][0]["prompt"].as_str().unwrap();
    assert!(prompt.starts_with("retro arcade"));
    assert!(prompt.contains("3000x1000"));
    assert_ne!(custom_body, default_body);
    assert_eq!(custom_body["parameters"]["aspectRatio"], "16:9");
}

#[test]
fn given_reference_when_edit_body_built_then_inline_base64_image_first() {
    // GIVEN
    let image = ReferenceImage::new(vec![1, 2, 3], "image/png");

    // WHEN
    let body = edit_image_body("make it a banner", &image, THUMBNAIL_SIZE);

    // THEN
    let parts = &body["contents"][0]["parts"];
    assert_eq!(parts[0]["inlineData"]["mimeType"], "image/png");
    assert_eq!(parts[0]["inlineData"]["data"], "AQID");
    assert_eq!(
        parts[1]["text"],
        "make it a banner\n\nOutput size: 1280x720 pixels."
    );
    assert_eq!(
        body["generationConfig"]["imageConfig"]["aspectRatio"],
        "16:9"
    );
}

#[test]
fn given_video_request_when_body_built_then_image_and_parameters_present() {
    let image = ReferenceImage::new(vec![0xFF], "image/jpeg");

    let body = video_body(
        "Intro for Fox Studio",
        Some(&image),
        AspectRatio::Widescreen,
        VideoResolution::P720,
    );

    let instance = &body["instances"][0];
    assert_eq!(instance["prompt"], "Intro for Fox Studio");
    assert_eq!(instance["image"]["bytesBase64Encoded"], "/w==");
    assert_eq!(instance["image"]["mimeType"], "image/jpeg");
    assert_eq!(body["parameters"]["resolution"], "720p");
    assert_eq!(body["parameters"]["aspectRatio"], "16:9");
}

#[test]
fn given_video_request_without_image_when_body_built_then_no_image_field() {
    let body = video_body("x", None, AspectRatio::Widescreen, VideoResolution::P1080);

    assert!(body["instances"][0].get("image").is_none());
    assert_eq!(body["parameters"]["resolution"], "1080p");
}

#[test]
fn given_multi_part_text_response_when_parsed_then_parts_iterated_in_order() {
    // GIVEN
    let response: GenerateContentResponse = serde_json::from_value(json!({
        "candidates": [{
            "content": { "parts": [{ "text": "Hello " }, { "text": "world" }] },
            "finishReason": "STOP"
        }]
    }))
    .unwrap();

    // WHEN
    let text: String = response.parts().filter_map(|p| p.text.as_deref()).collect();

    // THEN
    assert_eq!(text, "Hello world");
    assert_eq!(response.finish_reason(), Some("STOP"));
}

/// **VALUE**: The finished-operation shape yields the video URI.
///
/// **BUG THIS CATCHES**: Would catch a renamed field in the nested
/// `generateVideoResponse.generatedSamples[].video.uri` path.
#[test]
fn given_done_operation_when_parsed_then_first_video_uri_found() {
    // GIVEN
    let operation: Operation = serde_json::from_value(json!({
        "name": "models/veo/operations/abc",
        "done": true,
        "response": {
            "@type": "type.googleapis.com/google.ai.generativelanguage.v1beta.PredictLongRunningResponse",
            "generateVideoResponse": {
                "generatedSamples": [{ "video": { "uri": "https://files.example/v.mp4" } }]
            }
        }
    }))
    .unwrap();

    // WHEN
    let video = operation.first_video();

    // THEN
    assert!(operation.done);
    assert_eq!(
        video.and_then(|v| v.uri.as_deref()),
        Some("https://files.example/v.mp4")
    );
}

#[test]
fn given_pending_operation_when_parsed_then_done_defaults_false() {
    let operation: Operation =
        serde_json::from_value(json!({ "name": "models/veo/operations/abc" })).unwrap();

    assert!(!operation.done);
    assert!(operation.first_video().is_none());
}

#[test]
fn given_error_body_when_described_then_status_and_message() {
    let envelope: ErrorEnvelope = serde_json::from_value(json!({
        "error": { "code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED" }
    }))
    .unwrap();

    assert_eq!(envelope.error.describe(), "RESOURCE_EXHAUSTED: Quota exceeded");
}
