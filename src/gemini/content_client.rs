use super::transport::GeminiTransport;
use crate::{
    error::Result,
    models::{
        ContentPart, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
        ModalResponse, Modality,
    },
};

/// `generateContent` on an image-capable Gemini model.
#[derive(Clone)]
pub struct ContentClient {
    transport: GeminiTransport,
    model: String,
}

impl ContentClient {
    pub fn new(transport: GeminiTransport, model: impl Into<String>) -> Self {
        Self {
            transport,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn generate(
        &self,
        parts: &[ContentPart],
        modalities: &[Modality],
    ) -> Result<ModalResponse> {
        let request = GenerateContentRequest::user(
            parts,
            GenerationConfig {
                response_modalities: Some(modalities.to_vec()),
                ..Default::default()
            },
        );
        let endpoint = self.transport.model_endpoint(&self.model, "generateContent");

        let image_parts = parts
            .iter()
            .filter(|part| matches!(part, ContentPart::Image(_)))
            .count();
        log::info!("Generating content with model: {}", self.model);
        log::debug!(
            "Content request: {} parts ({} images), modalities {:?}",
            parts.len(),
            image_parts,
            modalities
        );

        let response: GenerateContentResponse =
            self.transport.post_json(&endpoint, &request).await?;

        if let Some(feedback) = &response.prompt_feedback {
            log::warn!("Gemini prompt feedback: {}", feedback);
        }
        if let Some(reason) = response
            .candidates
            .first()
            .and_then(|candidate| candidate.finish_reason.as_deref())
        {
            log::debug!("Finish reason: {}", reason);
        }

        Ok(response.into_modal_response())
    }
}
