//! JSON shapes exchanged with the Generative Language API.

use models::{AspectRatio, AssetSize, ReferenceImage, VideoResolution};

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;
use serde_json::{Value, json};

/// The image endpoints only take an aspect ratio, so the pixel size rides
/// along in the prompt.
pub(crate) fn sized_prompt(prompt: &str, size: AssetSize) -> String {
    format!("{prompt}\n\nOutput size: {size} pixels.")
}

pub(crate) fn predict_body(prompt: &str, size: AssetSize) -> Value {
    json!({
        "instances": [{ "prompt": sized_prompt(prompt, size) }],
        "parameters": {
            "sampleCount": 1,
            "aspectRatio": size.aspect_ratio.as_str(),
        }
    })
}

pub(crate) fn edit_image_body(prompt: &str, image: &ReferenceImage, size: AssetSize) -> Value {
    json!({
        "contents": [{
            "parts": [
                inline_part(image),
                { "text": sized_prompt(prompt, size) },
            ]
        }],
        "generationConfig": {
            "responseModalities": ["TEXT", "IMAGE"],
            "imageConfig": { "aspectRatio": size.aspect_ratio.as_str() },
        }
    })
}

pub(crate) fn text_body(prompt: &str) -> Value {
    json!({
        "contents": [{ "parts": [{ "text": prompt }] }]
    })
}

pub(crate) fn video_body(
    prompt: &str,
    image: Option<&ReferenceImage>,
    aspect_ratio: AspectRatio,
    resolution: VideoResolution,
) -> Value {
    let mut instance = json!({ "prompt": prompt });
    if let Some(image) = image {
        instance["image"] = json!({
            "bytesBase64Encoded": BASE64.encode(image.bytes()),
            "mimeType": image.mime_type(),
        });
    }

    json!({
        "instances": [instance],
        "parameters": {
            "aspectRatio": aspect_ratio.as_str(),
            "resolution": resolution.as_str(),
        }
    })
}

fn inline_part(image: &ReferenceImage) -> Value {
    json!({
        "inlineData": {
            "mimeType": image.mime_type(),
            "data": BASE64.encode(image.bytes()),
        }
    })
}

#[derive(Debug, Deserialize)]
pub(crate) struct PredictResponse {
    #[serde(default)]
    pub predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Prediction {
    pub bytes_base64_encoded: Option<String>,
    pub mime_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Part {
    pub text: Option<String>,
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InlineData {
    pub mime_type: Option<String>,
    pub data: String,
}

impl GenerateContentResponse {
    pub fn parts(&self) -> impl Iterator<Item = &Part> {
        self.candidates
            .iter()
            .filter_map(|candidate| candidate.content.as_ref())
            .flat_map(|content| content.parts.iter())
    }

    pub fn finish_reason(&self) -> Option<&str> {
        self.candidates
            .iter()
            .find_map(|candidate| candidate.finish_reason.as_deref())
    }
}

/// A long-running operation as returned by submit and by each poll.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Operation {
    pub name: String,
    #[serde(default)]
    pub done: bool,
    pub response: Option<OperationResponse>,
    pub error: Option<ApiStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OperationResponse {
    pub generate_video_response: Option<GenerateVideoResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateVideoResponse {
    #[serde(default)]
    pub generated_samples: Vec<GeneratedSample>,
    #[serde(default)]
    pub rai_media_filtered_reasons: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeneratedSample {
    pub video: Option<Video>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Video {
    pub uri: Option<String>,
    pub mime_type: Option<String>,
}

impl Operation {
    pub fn video_response(&self) -> Option<&GenerateVideoResponse> {
        self.response
            .as_ref()
            .and_then(|response| response.generate_video_response.as_ref())
    }

    pub fn first_video(&self) -> Option<&Video> {
        self.video_response()?
            .generated_samples
            .iter()
            .find_map(|sample| sample.video.as_ref().filter(|video| video.uri.is_some()))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ApiStatus,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiStatus {
    #[serde(default)]
    pub message: String,
    pub status: Option<String>,
}

impl ApiStatus {
    pub fn describe(&self) -> String {
        match &self.status {
            Some(status) if !self.message.is_empty() => format!("{status}: {}", self.message),
            Some(status) => status.clone(),
            None => self.message.clone(),
        }
    }
}
