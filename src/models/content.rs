use super::image::{EncodedImage, InlineImage};
use serde::{Deserialize, Serialize};

/// One ordered piece of a multimodal request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPart {
    Image(InlineImage),
    Text(String),
}

impl ContentPart {
    pub fn image(image: &EncodedImage) -> Self {
        ContentPart::Image(InlineImage {
            mime_type: image.media_type().to_string(),
            data: image.payload().to_string(),
        })
    }

    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text(text.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Modality {
    Image,
    Text,
}

/// A part of a multimodal model response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponsePart {
    pub image: Option<InlineImage>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModalResponse {
    pub parts: Vec<ResponsePart>,
}

impl ModalResponse {
    pub fn first_image(&self) -> Option<&InlineImage> {
        self.parts
            .iter()
            .filter_map(|part| part.image.as_ref())
            .find(|image| !image.data.is_empty())
    }

    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect::<Vec<_>>()
            .join("")
    }
}

/// Inputs to one single-shot image transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub primary_image: EncodedImage,
    pub secondary_image: Option<EncodedImage>,
    pub instruction: String,
}

/// Options for a text-to-image request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageOptions {
    pub count: u32,
    pub output_format: String,
    pub aspect_ratio: String,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            count: 1,
            output_format: "image/png".to_string(),
            aspect_ratio: "1:1".to_string(),
        }
    }
}
