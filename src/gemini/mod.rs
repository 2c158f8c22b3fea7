pub mod content_client;
pub mod imagen_client;
pub mod text_client;
pub mod transport;

use crate::{
    config::GeminiConfig,
    error::Result,
    models::{ContentPart, ImageOptions, InlineImage, ModalResponse, Modality},
    service::ModelService,
};
use async_trait::async_trait;

pub use content_client::ContentClient;
pub use imagen_client::ImagenClient;
pub use text_client::TextClient;
pub use transport::GeminiTransport;

#[derive(Clone)]
pub struct GeminiClient {
    content_client: ContentClient,
    text_client: TextClient,
    imagen_client: ImagenClient,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let transport = GeminiTransport::new(config)?;

        Ok(Self {
            content_client: ContentClient::new(transport.clone(), config.image_model()),
            text_client: TextClient::new(transport.clone(), config.text_model()),
            imagen_client: ImagenClient::new(transport, config.imagen_model()),
        })
    }

    pub fn content(&self) -> &ContentClient {
        &self.content_client
    }

    pub fn text(&self) -> &TextClient {
        &self.text_client
    }

    pub fn imagen(&self) -> &ImagenClient {
        &self.imagen_client
    }
}

#[async_trait]
impl ModelService for GeminiClient {
    async fn generate_multimodal(
        &self,
        parts: Vec<ContentPart>,
        modalities: &[Modality],
    ) -> Result<ModalResponse> {
        self.content_client.generate(&parts, modalities).await
    }

    async fn generate_structured_text(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
    ) -> Result<String> {
        self.text_client.generate_structured(prompt, schema).await
    }

    async fn generate_image_from_text(
        &self,
        prompt: &str,
        options: &ImageOptions,
    ) -> Result<Vec<InlineImage>> {
        self.imagen_client.generate(prompt, options).await
    }
}
