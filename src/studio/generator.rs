use crate::{
    error::{Result, StudioError, GENERIC_GENERATION_MESSAGE, NO_IMAGE_IN_RESPONSE},
    models::{ContentPart, EncodedImage, GeneratedImage, Modality},
    service::ModelService,
};
use std::sync::Arc;

/// One or two images plus an instruction in, exactly one image out.
#[derive(Clone)]
pub struct ImageGenerator {
    service: Arc<dyn ModelService>,
}

impl ImageGenerator {
    pub fn new(service: Arc<dyn ModelService>) -> Self {
        Self { service }
    }

    pub async fn generate(
        &self,
        primary: &EncodedImage,
        secondary: Option<&EncodedImage>,
        instruction: &str,
    ) -> Result<GeneratedImage> {
        let parts = build_parts(primary, secondary, instruction);

        log::info!(
            "Generating image from {} ({} input image(s))",
            primary.name(),
            if secondary.is_some() { 2 } else { 1 }
        );

        let response = self
            .service
            .generate_multimodal(parts, &[Modality::Image, Modality::Text])
            .await
            .map_err(|e| {
                log::error!("Error calling Gemini API: {}", e);
                StudioError::GenerationFailed(GENERIC_GENERATION_MESSAGE.to_string())
            })?;

        match response.first_image() {
            Some(image) => Ok(GeneratedImage::from_inline(image)),
            None => {
                let text = response.text();
                if !text.is_empty() {
                    log::warn!("Model answered without an image: {}", text);
                }
                Err(StudioError::GenerationFailed(NO_IMAGE_IN_RESPONSE.to_string()))
            }
        }
    }
}

/// Primary image, then the optional secondary image, then the instruction.
fn build_parts(
    primary: &EncodedImage,
    secondary: Option<&EncodedImage>,
    instruction: &str,
) -> Vec<ContentPart> {
    let mut parts = vec![ContentPart::image(primary)];
    if let Some(secondary) = secondary {
        parts.push(ContentPart::image(secondary));
    }
    parts.push(ContentPart::text(instruction));
    parts
}
