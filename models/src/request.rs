//! Generation requests.
//!
//! A [`GenerationRequest`] is built once by the caller and handed to the
//! orchestrator; nothing downstream mutates it. The payload is a tagged union
//! so every kind carries only the fields it uses.

use crate::asset::{
    AspectRatio, AssetKind, AssetSize, BANNER_SIZE, LOGO_SIZE, THUMBNAIL_SIZE, VideoResolution,
};
use crate::error::model_error::ModelError;

use std::fmt;

const IMAGE_MIME_PREFIX: &str = "image/";

const LOGO_REQUIRED_MESSAGE: &str = "Please enter a description for your logo.";
const BANNER_REQUIRED_MESSAGE: &str = "Please enter a description for your banner.";
const THUMBNAIL_REQUIRED_MESSAGE: &str = "Please fill in all fields and upload an image.";
const DESCRIPTION_REQUIRED_MESSAGE: &str = "Please provide the details for your video description.";
const ABOUT_REQUIRED_MESSAGE: &str = "Please provide the details for your channel's About section.";
const INTRO_REQUIRED_MESSAGE: &str = "Please provide a channel name and upload a logo.";
const INVALID_IMAGE_MESSAGE: &str = "The uploaded file must be a non-empty image.";
const INVALID_SIZE_MESSAGE: &str = "Custom dimensions must be greater than zero.";

/// An uploaded image passed to the generator alongside the prompt.
#[derive(Clone, PartialEq, Eq)]
pub struct ReferenceImage {
    bytes: Vec<u8>,
    mime_type: String,
}

impl ReferenceImage {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    fn is_valid(&self) -> bool {
        !self.bytes.is_empty() && self.mime_type.starts_with(IMAGE_MIME_PREFIX)
    }
}

// Image bytes are large and unreadable in logs.
impl fmt::Debug for ReferenceImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReferenceImage")
            .field("len", &self.bytes.len())
            .field("mime_type", &self.mime_type)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationPayload {
    Logo {
        prompt: String,
        size: AssetSize,
    },
    Banner {
        prompt: String,
        reference: Option<ReferenceImage>,
        size: AssetSize,
    },
    Thumbnail {
        prompt: String,
        reference: Option<ReferenceImage>,
        size: AssetSize,
    },
    Description {
        prompt: String,
    },
    About {
        prompt: String,
    },
    Intro {
        prompt: String,
        reference: Option<ReferenceImage>,
        aspect_ratio: AspectRatio,
        resolution: VideoResolution,
    },
}

impl GenerationPayload {
    pub fn kind(&self) -> AssetKind {
        match self {
            GenerationPayload::Logo { .. } => AssetKind::Logo,
            GenerationPayload::Banner { .. } => AssetKind::Banner,
            GenerationPayload::Thumbnail { .. } => AssetKind::Thumbnail,
            GenerationPayload::Description { .. } => AssetKind::Description,
            GenerationPayload::About { .. } => AssetKind::About,
            GenerationPayload::Intro { .. } => AssetKind::Intro,
        }
    }

    pub fn prompt(&self) -> &str {
        match self {
            GenerationPayload::Logo { prompt, .. }
            | GenerationPayload::Banner { prompt, .. }
            | GenerationPayload::Thumbnail { prompt, .. }
            | GenerationPayload::Description { prompt }
            | GenerationPayload::About { prompt }
            | GenerationPayload::Intro { prompt, .. } => prompt,
        }
    }

    pub fn reference(&self) -> Option<&ReferenceImage> {
        match self {
            GenerationPayload::Banner { reference, .. }
            | GenerationPayload::Thumbnail { reference, .. }
            | GenerationPayload::Intro { reference, .. } => reference.as_ref(),
            GenerationPayload::Logo { .. }
            | GenerationPayload::Description { .. }
            | GenerationPayload::About { .. } => None,
        }
    }

    /// Target size for image kinds.
    pub fn size(&self) -> Option<AssetSize> {
        match self {
            GenerationPayload::Logo { size, .. }
            | GenerationPayload::Banner { size, .. }
            | GenerationPayload::Thumbnail { size, .. } => Some(*size),
            GenerationPayload::Description { .. }
            | GenerationPayload::About { .. }
            | GenerationPayload::Intro { .. } => None,
        }
    }
}

/// One submission to the generation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    payload: GenerationPayload,
    label: Option<String>,
}

impl GenerationRequest {
    pub fn new(payload: GenerationPayload) -> Self {
        Self {
            payload,
            label: None,
        }
    }

    pub fn logo(prompt: impl Into<String>) -> Self {
        Self::new(GenerationPayload::Logo {
            prompt: prompt.into(),
            size: LOGO_SIZE,
        })
    }

    pub fn banner(prompt: impl Into<String>) -> Self {
        Self::new(GenerationPayload::Banner {
            prompt: prompt.into(),
            reference: None,
            size: BANNER_SIZE,
        })
    }

    pub fn thumbnail(prompt: impl Into<String>, reference: Option<ReferenceImage>) -> Self {
        Self::new(GenerationPayload::Thumbnail {
            prompt: prompt.into(),
            reference,
            size: THUMBNAIL_SIZE,
        })
    }

    pub fn description(prompt: impl Into<String>) -> Self {
        Self::new(GenerationPayload::Description {
            prompt: prompt.into(),
        })
    }

    pub fn about(prompt: impl Into<String>) -> Self {
        Self::new(GenerationPayload::About {
            prompt: prompt.into(),
        })
    }

    pub fn intro(prompt: impl Into<String>, reference: Option<ReferenceImage>) -> Self {
        Self::new(GenerationPayload::Intro {
            prompt: prompt.into(),
            reference,
            aspect_ratio: AspectRatio::Widescreen,
            resolution: VideoResolution::P720,
        })
    }

    /// Human-readable description recorded in history instead of the prompt.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Attach a reference image. Ignored by kinds that take none.
    pub fn with_reference(mut self, image: ReferenceImage) -> Self {
        match &mut self.payload {
            GenerationPayload::Banner { reference, .. }
            | GenerationPayload::Thumbnail { reference, .. }
            | GenerationPayload::Intro { reference, .. } => *reference = Some(image),
            GenerationPayload::Logo { .. }
            | GenerationPayload::Description { .. }
            | GenerationPayload::About { .. } => {}
        }
        self
    }

    /// Override the target size. Only banners accept custom dimensions.
    pub fn with_size(mut self, custom: AssetSize) -> Self {
        if let GenerationPayload::Banner { size, .. } = &mut self.payload {
            *size = custom;
        }
        self
    }

    pub fn kind(&self) -> AssetKind {
        self.payload.kind()
    }

    pub fn payload(&self) -> &GenerationPayload {
        &self.payload
    }

    pub fn prompt(&self) -> &str {
        self.payload.prompt()
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// What history shows for this request: the label if set, else the prompt.
    pub fn history_label(&self) -> &str {
        match self.label.as_deref() {
            Some(label) if !label.trim().is_empty() => label,
            _ => self.prompt(),
        }
    }

    /// Check the required fields for this kind.
    #[track_caller]
    pub fn validate(&self) -> Result<(), ModelError> {
        let blank = |s: &str| s.trim().is_empty();

        match &self.payload {
            GenerationPayload::Logo { prompt, size } => {
                if blank(prompt) {
                    return Err(ModelError::validation(LOGO_REQUIRED_MESSAGE));
                }
                check_size(size)?;
            }
            GenerationPayload::Banner {
                prompt,
                reference,
                size,
            } => {
                if blank(prompt) {
                    return Err(ModelError::validation(BANNER_REQUIRED_MESSAGE));
                }
                if let Some(image) = reference {
                    check_image(image)?;
                }
                check_size(size)?;
            }
            GenerationPayload::Thumbnail {
                prompt,
                reference,
                size,
            } => {
                let Some(image) = reference.as_ref().filter(|_| !blank(prompt)) else {
                    return Err(ModelError::validation(THUMBNAIL_REQUIRED_MESSAGE));
                };
                check_image(image)?;
                check_size(size)?;
            }
            GenerationPayload::Description { prompt } => {
                if blank(prompt) {
                    return Err(ModelError::validation(DESCRIPTION_REQUIRED_MESSAGE));
                }
            }
            GenerationPayload::About { prompt } => {
                if blank(prompt) {
                    return Err(ModelError::validation(ABOUT_REQUIRED_MESSAGE));
                }
            }
            GenerationPayload::Intro {
                prompt, reference, ..
            } => {
                let Some(image) = reference.as_ref().filter(|_| !blank(prompt)) else {
                    return Err(ModelError::validation(INTRO_REQUIRED_MESSAGE));
                };
                check_image(image)?;
            }
        }

        Ok(())
    }
}

#[track_caller]
fn check_image(image: &ReferenceImage) -> Result<(), ModelError> {
    if image.is_valid() {
        Ok(())
    } else {
        Err(ModelError::validation(INVALID_IMAGE_MESSAGE))
    }
}

#[track_caller]
fn check_size(size: &AssetSize) -> Result<(), ModelError> {
    if size.is_empty() {
        Err(ModelError::validation(INVALID_SIZE_MESSAGE))
    } else {
        Ok(())
    }
}
