use super::transport::GeminiTransport;
use crate::{
    error::{Result, StudioError},
    models::{ContentPart, GenerateContentRequest, GenerateContentResponse, GenerationConfig},
};

/// Text-only `generateContent` constrained to a JSON response schema.
#[derive(Clone)]
pub struct TextClient {
    transport: GeminiTransport,
    model: String,
}

impl TextClient {
    pub fn new(transport: GeminiTransport, model: impl Into<String>) -> Self {
        Self {
            transport,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn generate_structured(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
    ) -> Result<String> {
        let request = GenerateContentRequest::user(
            &[ContentPart::text(prompt)],
            GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(schema.clone()),
                ..Default::default()
            },
        );
        let endpoint = self.transport.model_endpoint(&self.model, "generateContent");

        log::info!("Invoking model: {}", self.model);
        log::debug!("Structured text prompt: {}", prompt);

        let response: GenerateContentResponse =
            self.transport.post_json(&endpoint, &request).await?;
        let text = response.into_modal_response().text();

        if text.trim().is_empty() {
            return Err(StudioError::ResponseError("No text in response".into()));
        }

        log::debug!("Structured text response: {}", text);
        Ok(text)
    }
}
