use super::transport::GeminiTransport;
use crate::{
    error::Result,
    models::{
        ImageOptions, InlineImage, PredictInstance, PredictParameters, PredictRequest,
        PredictResponse,
    },
};

/// Text-to-image through the Imagen `predict` endpoint.
#[derive(Clone)]
pub struct ImagenClient {
    transport: GeminiTransport,
    model: String,
}

impl ImagenClient {
    pub fn new(transport: GeminiTransport, model: impl Into<String>) -> Self {
        Self {
            transport,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn generate(&self, prompt: &str, options: &ImageOptions) -> Result<Vec<InlineImage>> {
        let request = PredictRequest {
            instances: vec![PredictInstance {
                prompt: prompt.to_string(),
            }],
            parameters: PredictParameters {
                sample_count: options.count.max(1),
                output_mime_type: options.output_format.clone(),
                aspect_ratio: options.aspect_ratio.clone(),
            },
        };
        let endpoint = self.transport.model_endpoint(&self.model, "predict");

        log::info!("Generating image with model: {}", self.model);

        let response: PredictResponse = self.transport.post_json(&endpoint, &request).await?;
        let images = response.into_images(&options.output_format);

        log::debug!("Imagen returned {} image(s)", images.len());
        Ok(images)
    }
}
