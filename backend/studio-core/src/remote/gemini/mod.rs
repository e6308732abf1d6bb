//! [`RemoteJobClient`] backed by the Google Generative Language REST API.
//!
//! Images without a reference go to an Imagen `:predict` model; images with a
//! reference and all text go through `:generateContent`; video uses
//! `:predictLongRunning` and is polled by operation name.

pub(crate) mod wire;

use super::{Artifact, DEFAULT_IMAGE_MIME, DEFAULT_VIDEO_MIME, PollStatus, RemoteJobClient};
use crate::config::RemoteConfig;
use crate::error::RemoteError;

use common::RedactedApiKey;
use models::{
    AssetSize, GenerationPayload, GenerationRequest, OperationRef, ReferenceImage,
    RemoteArtifactRef,
};
use wire::{ErrorEnvelope, GenerateContentResponse, Operation, PredictResponse};

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use log::{debug, trace};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

pub const DEFAULT_IMAGE_MODEL: &str = "imagen-4.0-generate-001";
pub const DEFAULT_IMAGE_EDIT_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_VIDEO_MODEL: &str = "veo-3.1-fast-generate-preview";

const API_KEY_HEADER: &str = "x-goog-api-key";
const MISSING_KEY_MESSAGE: &str = "API key is not configured";
const MAX_ERROR_BODY_CHARS: usize = 300;

/// Model names used for each output type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiModels {
    pub image: String,
    pub image_edit: String,
    pub text: String,
    pub video: String,
}

impl Default for GeminiModels {
    fn default() -> Self {
        Self {
            image: DEFAULT_IMAGE_MODEL.to_string(),
            image_edit: DEFAULT_IMAGE_EDIT_MODEL.to_string(),
            text: DEFAULT_TEXT_MODEL.to_string(),
            video: DEFAULT_VIDEO_MODEL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    base_url: Url,
    client: Client,
    api_key: Option<RedactedApiKey>,
    models: GeminiModels,
}

impl GeminiClient {
    /// Build a client. Without a key every call fails with
    /// [`RemoteError::Auth`] and nothing is sent.
    pub fn new(
        base_url: &str,
        models: GeminiModels,
        api_key: Option<RedactedApiKey>,
        timeout: Duration,
    ) -> Result<Self, RemoteError> {
        // Url::join replaces the last segment unless the base ends in '/'
        let base_url = if base_url.ends_with('/') {
            Url::parse(base_url)?
        } else {
            Url::parse(&format!("{base_url}/"))?
        };
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            client,
            api_key,
            models,
        })
    }

    pub fn from_config(
        config: &RemoteConfig,
        api_key: Option<RedactedApiKey>,
    ) -> Result<Self, RemoteError> {
        let models = GeminiModels {
            image: config.image_model.clone(),
            image_edit: config.image_edit_model.clone(),
            text: config.text_model.clone(),
            video: config.video_model.clone(),
        };

        Self::new(
            &config.base_url,
            models,
            api_key,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn api_key(&self) -> Result<&RedactedApiKey, RemoteError> {
        self.api_key
            .as_ref()
            .ok_or_else(|| RemoteError::auth(MISSING_KEY_MESSAGE))
    }

    fn model_url(&self, model: &str, method: &str) -> Result<Url, RemoteError> {
        Ok(self.base_url.join(&format!("models/{model}:{method}"))?)
    }

    fn authorize(&self, request: RequestBuilder, key: &RedactedApiKey) -> RequestBuilder {
        request.header(API_KEY_HEADER, key.as_str())
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &Value,
    ) -> Result<T, RemoteError> {
        let key = self.api_key()?;
        debug!("POST {url}");

        let response = self
            .authorize(self.client.post(url), key)
            .json(body)
            .send()
            .await?;
        let response = check_status(response).await?;

        Ok(response.json().await?)
    }

    async fn predict_image(&self, prompt: &str, size: AssetSize) -> Result<Artifact, RemoteError> {
        let url = self.model_url(&self.models.image, "predict")?;
        let response: PredictResponse = self
            .post_json(url, &wire::predict_body(prompt, size))
            .await?;

        let prediction = response
            .predictions
            .into_iter()
            .find(|prediction| prediction.bytes_base64_encoded.is_some())
            .ok_or_else(|| RemoteError::decode("response contained no generated image"))?;

        let encoded = prediction.bytes_base64_encoded.unwrap_or_default();
        Ok(Artifact::Image {
            bytes: decode_base64(&encoded)?,
            mime_type: prediction
                .mime_type
                .unwrap_or_else(|| DEFAULT_IMAGE_MIME.to_string()),
        })
    }

    async fn edit_image(
        &self,
        prompt: &str,
        image: &ReferenceImage,
        size: AssetSize,
    ) -> Result<Artifact, RemoteError> {
        let url = self.model_url(&self.models.image_edit, "generateContent")?;
        let response: GenerateContentResponse = self
            .post_json(url, &wire::edit_image_body(prompt, image, size))
            .await?;

        let Some(inline) = response.parts().find_map(|part| part.inline_data.as_ref()) else {
            let reason = response.finish_reason().unwrap_or("none");
            return Err(RemoteError::decode(format!(
                "response contained no image data (finish reason: {reason})"
            )));
        };

        Ok(Artifact::Image {
            bytes: decode_base64(&inline.data)?,
            mime_type: inline
                .mime_type
                .clone()
                .unwrap_or_else(|| DEFAULT_IMAGE_MIME.to_string()),
        })
    }

    async fn generate_text(&self, prompt: &str) -> Result<Artifact, RemoteError> {
        let url = self.model_url(&self.models.text, "generateContent")?;
        let response: GenerateContentResponse =
            self.post_json(url, &wire::text_body(prompt)).await?;

        let text: String = response
            .parts()
            .filter_map(|part| part.text.as_deref())
            .collect();

        if text.trim().is_empty() {
            let reason = response.finish_reason().unwrap_or("none");
            return Err(RemoteError::decode(format!(
                "response contained no text (finish reason: {reason})"
            )));
        }

        Ok(Artifact::Text(text.trim().to_string()))
    }
}

#[async_trait]
impl RemoteJobClient for GeminiClient {
    async fn generate_sync(&self, request: &GenerationRequest) -> Result<Artifact, RemoteError> {
        match request.payload() {
            GenerationPayload::Logo { prompt, size } => {
                self.predict_image(prompt, *size).await
            }
            GenerationPayload::Banner {
                prompt,
                reference,
                size,
            }
            | GenerationPayload::Thumbnail {
                prompt,
                reference,
                size,
            } => match reference {
                Some(image) => self.edit_image(prompt, image, *size).await,
                None => self.predict_image(prompt, *size).await,
            },
            GenerationPayload::Description { prompt } | GenerationPayload::About { prompt } => {
                self.generate_text(prompt).await
            }
            GenerationPayload::Intro { .. } => Err(RemoteError::unsupported(
                "video generation runs as a long-running operation",
            )),
        }
    }

    async fn submit_async(
        &self,
        request: &GenerationRequest,
    ) -> Result<OperationRef, RemoteError> {
        let GenerationPayload::Intro {
            prompt,
            reference,
            aspect_ratio,
            resolution,
        } = request.payload()
        else {
            return Err(RemoteError::unsupported(format!(
                "{} requests complete in a single call",
                request.kind()
            )));
        };

        let url = self.model_url(&self.models.video, "predictLongRunning")?;
        let body = wire::video_body(prompt, reference.as_ref(), *aspect_ratio, *resolution);
        let operation: Operation = self.post_json(url, &body).await?;

        debug!("Started video operation {}", operation.name);
        Ok(OperationRef::new(operation.name))
    }

    async fn poll_async(&self, operation: &OperationRef) -> Result<PollStatus, RemoteError> {
        let key = self.api_key()?;
        let url = self.base_url.join(operation.as_str())?;

        let response = self.authorize(self.client.get(url), key).send().await?;
        let operation: Operation = check_status(response).await?.json().await?;
        trace!("Operation {} done={}", operation.name, operation.done);

        if let Some(error) = &operation.error {
            return Ok(PollStatus::Failed {
                message: error.describe(),
            });
        }

        if !operation.done {
            return Ok(PollStatus::Pending);
        }

        if let Some(video) = operation.first_video()
            && let Some(uri) = &video.uri
        {
            let mime_type = video.mime_type.as_deref().unwrap_or(DEFAULT_VIDEO_MIME);
            return Ok(PollStatus::Completed(
                RemoteArtifactRef::new(uri).with_mime_type(mime_type),
            ));
        }

        let filtered = operation
            .video_response()
            .and_then(|response| response.rai_media_filtered_reasons.first());
        let message = match filtered {
            Some(reason) => format!("video was filtered: {reason}"),
            None => "operation finished without a video".to_string(),
        };

        Ok(PollStatus::Failed { message })
    }

    async fn fetch_artifact(&self, artifact: &RemoteArtifactRef) -> Result<Vec<u8>, RemoteError> {
        let key = self.api_key()?;
        let url = self.base_url.join(&artifact.uri)?;

        let mut request = self.client.get(url.clone());
        // Only our own API origin gets the key
        if url.origin() == self.base_url.origin() {
            request = self.authorize(request, key);
        }

        debug!("Downloading artifact from {}", url.path());
        let response = check_status(request.send().await?).await?;

        Ok(response.bytes().await?.to_vec())
    }
}

async fn check_status(response: Response) -> Result<Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorEnvelope>(&body) {
        Ok(envelope) => envelope.error.describe(),
        Err(_) if body.trim().is_empty() => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
        Err(_) => body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
    };

    Err(RemoteError::http(status.as_u16(), message))
}

fn decode_base64(encoded: &str) -> Result<Vec<u8>, RemoteError> {
    BASE64
        .decode(encoded)
        .map_err(|e| RemoteError::decode(format!("invalid base64 payload: {e}")))
}
