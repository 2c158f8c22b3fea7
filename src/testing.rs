//! Scripted in-memory model service for unit tests.

use crate::{
    error::{Result, StudioError},
    models::{ContentPart, ImageOptions, InlineImage, ModalResponse, Modality, ResponsePart},
    service::ModelService,
};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Call {
    Multimodal {
        parts: Vec<ContentPart>,
        modalities: Vec<Modality>,
    },
    StructuredText {
        prompt: String,
        schema: serde_json::Value,
    },
    ImageFromText {
        prompt: String,
        options: ImageOptions,
    },
}

#[derive(Debug, Clone)]
enum Scripted<T> {
    Ok(T),
    Fail(String),
}

/// Per-prompt behaviour for text-to-image calls, matched by substring.
#[derive(Debug, Clone)]
enum SlideRule {
    Fail(String),
    Empty,
    Delay(Duration),
}

pub struct ScriptedModel {
    multimodal: Scripted<ModalResponse>,
    structured_text: Scripted<String>,
    slide_rules: Vec<(String, SlideRule)>,
    calls: Mutex<Vec<Call>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl Default for ScriptedModel {
    fn default() -> Self {
        Self {
            multimodal: Scripted::Ok(image_response("image/png", "cmVzdWx0")),
            structured_text: Scripted::Ok("[]".to_string()),
            slide_rules: Vec::new(),
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }
}

/// A response holding a text part followed by one image part.
pub fn image_response(mime_type: &str, data: &str) -> ModalResponse {
    ModalResponse {
        parts: vec![
            ResponsePart {
                image: None,
                text: Some("Here you go".to_string()),
            },
            ResponsePart {
                image: Some(InlineImage {
                    mime_type: mime_type.to_string(),
                    data: data.to_string(),
                }),
                text: None,
            },
        ],
    }
}

/// The image payload the scripted model returns for a text-to-image prompt.
pub fn slide_payload(prompt: &str) -> String {
    STANDARD.encode(prompt)
}

/// A JSON plan with one `imagePrompt` per entry.
pub fn plan_json(prompts: &[&str]) -> String {
    let entries: Vec<serde_json::Value> = prompts
        .iter()
        .map(|prompt| serde_json::json!({ "imagePrompt": prompt }))
        .collect();
    serde_json::Value::Array(entries).to_string()
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_multimodal_response(mut self, response: ModalResponse) -> Self {
        self.multimodal = Scripted::Ok(response);
        self
    }

    pub fn with_multimodal_failure(mut self, message: &str) -> Self {
        self.multimodal = Scripted::Fail(message.to_string());
        self
    }

    pub fn with_plan_text(mut self, text: impl Into<String>) -> Self {
        self.structured_text = Scripted::Ok(text.into());
        self
    }

    pub fn with_planning_failure(mut self, message: &str) -> Self {
        self.structured_text = Scripted::Fail(message.to_string());
        self
    }

    pub fn fail_slide(mut self, prompt_contains: &str, message: &str) -> Self {
        self.slide_rules.push((
            prompt_contains.to_string(),
            SlideRule::Fail(message.to_string()),
        ));
        self
    }

    pub fn empty_slide(mut self, prompt_contains: &str) -> Self {
        self.slide_rules
            .push((prompt_contains.to_string(), SlideRule::Empty));
        self
    }

    pub fn delay_slide(mut self, prompt_contains: &str, delay: Duration) -> Self {
        self.slide_rules
            .push((prompt_contains.to_string(), SlideRule::Delay(delay)));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn rules_for(&self, prompt: &str) -> Vec<SlideRule> {
        self.slide_rules
            .iter()
            .filter(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, rule)| rule.clone())
            .collect()
    }
}

fn service_failure(message: &str) -> StudioError {
    StudioError::ServiceError {
        status: 503,
        message: message.to_string(),
    }
}

#[async_trait]
impl ModelService for ScriptedModel {
    async fn generate_multimodal(
        &self,
        parts: Vec<ContentPart>,
        modalities: &[Modality],
    ) -> Result<ModalResponse> {
        self.record(Call::Multimodal {
            parts,
            modalities: modalities.to_vec(),
        });
        match &self.multimodal {
            Scripted::Ok(response) => Ok(response.clone()),
            Scripted::Fail(message) => Err(service_failure(message)),
        }
    }

    async fn generate_structured_text(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
    ) -> Result<String> {
        self.record(Call::StructuredText {
            prompt: prompt.to_string(),
            schema: schema.clone(),
        });
        match &self.structured_text {
            Scripted::Ok(text) => Ok(text.clone()),
            Scripted::Fail(message) => Err(service_failure(message)),
        }
    }

    async fn generate_image_from_text(
        &self,
        prompt: &str,
        options: &ImageOptions,
    ) -> Result<Vec<InlineImage>> {
        self.record(Call::ImageFromText {
            prompt: prompt.to_string(),
            options: options.clone(),
        });

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let mut outcome = Ok(vec![InlineImage {
            mime_type: options.output_format.clone(),
            data: slide_payload(prompt),
        }]);
        for rule in self.rules_for(prompt) {
            match rule {
                SlideRule::Delay(delay) => tokio::time::sleep(delay).await,
                SlideRule::Empty => outcome = Ok(Vec::new()),
                SlideRule::Fail(message) => outcome = Err(service_failure(&message)),
            }
        }
        // Yield once so sibling requests start before this one finishes.
        tokio::task::yield_now().await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        outcome
    }
}
