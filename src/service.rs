use crate::{
    error::Result,
    models::{ContentPart, ImageOptions, InlineImage, ModalResponse, Modality},
};
use async_trait::async_trait;

/// The external generative model, seen through the three request shapes the
/// studio relies on.
#[async_trait]
pub trait ModelService: Send + Sync {
    /// Ordered images and text in, ordered image/text parts out.
    async fn generate_multimodal(
        &self,
        parts: Vec<ContentPart>,
        modalities: &[Modality],
    ) -> Result<ModalResponse>;

    /// Text-only prompt answered with JSON text shaped by `schema`.
    async fn generate_structured_text(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
    ) -> Result<String>;

    async fn generate_image_from_text(
        &self,
        prompt: &str,
        options: &ImageOptions,
    ) -> Result<Vec<InlineImage>>;
}
