//! Request orchestration: validate, pick a path, run it, publish the outcome.

pub mod generator;
pub mod planner;
pub mod session;
pub mod synthesizer;

use crate::{
    config::{CarouselConfig, Config},
    error::{Result, StudioError},
    gemini::GeminiClient,
    logger,
    models::{
        Archetype, CarouselSlide, DispatchMode, EncodedImage, GeneratedImage, GenerationRequest,
        ImageOptions, IDEA_FIELD, STYLE_FIELD,
    },
    prompts::{self, PromptTemplates, Substitutions},
    service::ModelService,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;
use uuid::Uuid;

pub use generator::ImageGenerator;
pub use planner::CarouselPlanner;
pub use session::{Phase, SessionState};
pub use synthesizer::CarouselSynthesizer;

/// Shown when a request is abandoned before it finishes, e.g. by a timeout.
pub const CANCELLED_MESSAGE: &str = "The request was cancelled. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Outcome {
    Image(GeneratedImage),
    Carousel(Vec<CarouselSlide>),
}

/// What the user supplied for one request.
#[derive(Debug, Clone, Default)]
pub struct StudioInputs {
    pub primary: Option<EncodedImage>,
    pub secondary: Option<EncodedImage>,
    pub fields: HashMap<String, String>,
    pub page_count: Option<u32>,
}

impl StudioInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_primary(mut self, image: EncodedImage) -> Self {
        self.primary = Some(image);
        self
    }

    pub fn with_secondary(mut self, image: EncodedImage) -> Self {
        self.secondary = Some(image);
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn with_page_count(mut self, pages: u32) -> Self {
        self.page_count = Some(pages);
        self
    }

    /// The trimmed value of a text field, if it is not blank.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }
}

pub struct Studio {
    templates: PromptTemplates,
    carousel: CarouselConfig,
    generator: ImageGenerator,
    planner: CarouselPlanner,
    synthesizer: CarouselSynthesizer,
    state: watch::Sender<SessionState>,
}

impl Studio {
    pub fn new(service: Arc<dyn ModelService>, config: &Config) -> Self {
        let options = ImageOptions {
            count: 1,
            output_format: config.carousel.output_format.clone(),
            aspect_ratio: config.carousel.aspect_ratio.clone(),
        };
        let (state, _) = watch::channel(SessionState::idle(Archetype::Pose));

        Self {
            templates: PromptTemplates::default(),
            carousel: config.carousel.clone(),
            generator: ImageGenerator::new(service.clone()),
            planner: CarouselPlanner::new(service.clone()),
            synthesizer: CarouselSynthesizer::new(service, options),
            state,
        }
    }

    /// Builds a studio backed by the Gemini REST API.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = GeminiClient::new(&config.gemini)?;
        Ok(Self::new(Arc::new(client), config))
    }

    pub fn with_templates(mut self, templates: PromptTemplates) -> Self {
        self.templates = templates;
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Switches archetype and discards any result or error on display.
    pub fn select_archetype(&self, archetype: Archetype) {
        self.state.send_if_modified(|state| {
            if state.is_busy() {
                log::warn!("Ignoring archetype change while a generation is running");
                return false;
            }
            *state = SessionState::idle(archetype);
            true
        });
    }

    pub async fn execute(&self, archetype: Archetype, inputs: &StudioInputs) -> Result<Outcome> {
        let request_id = Uuid::new_v4().simple().to_string()[..8].to_string();

        let started = self.state.send_if_modified(|state| {
            if state.is_busy() {
                return false;
            }
            *state = state.validating(archetype, request_id.clone());
            true
        });
        if !started {
            return Err(StudioError::ValidationFailed(
                "a generation is already in progress".into(),
            ));
        }
        let cycle = CycleGuard {
            state: &self.state,
            request_id: request_id.clone(),
            done: false,
        };

        if let Err(e) = self.validate(archetype, inputs) {
            log::info!("[req:{}] {} request rejected: {}", request_id, archetype, e);
            cycle.finish(|state| state.failed(e.user_message()));
            return Err(e);
        }

        self.state.send_modify(|state| *state = state.in_flight());
        log::info!("[req:{}] Running {} request", request_id, archetype);

        let result = {
            let _timer = logger::timer(&format!("{} request {}", archetype, request_id));
            self.dispatch(archetype, inputs).await
        };

        match result {
            Ok(outcome) => {
                cycle.finish(|state| state.succeeded(outcome.clone()));
                Ok(outcome)
            }
            Err(e) => {
                if e.is_anomaly() {
                    log::error!("[req:{}] {} request failed: {}", request_id, archetype, e);
                }
                cycle.finish(|state| state.failed(e.user_message()));
                Err(e)
            }
        }
    }

    /// Checks the inputs against the archetype's descriptor. Makes no calls.
    pub fn validate(&self, archetype: Archetype, inputs: &StudioInputs) -> Result<()> {
        let descriptor = archetype.descriptor();

        let slots = [
            (descriptor.primary, inputs.primary.as_ref()),
            (descriptor.secondary, inputs.secondary.as_ref()),
        ];
        for (slot, image) in slots {
            if let Some(slot) = slot.filter(|slot| slot.required) {
                if image.is_none() {
                    return Err(StudioError::ValidationFailed(format!(
                        "missing required image: {}",
                        slot.title
                    )));
                }
            }
        }

        for field in descriptor.text_fields.iter().filter(|field| field.required) {
            if inputs.field(field.key).is_none() {
                return Err(StudioError::ValidationFailed(format!(
                    "missing required field: {}",
                    field.label
                )));
            }
        }

        if descriptor.mode == DispatchMode::Carousel {
            let pages = inputs.page_count.unwrap_or(self.carousel.default_pages);
            if pages == 0 || pages > self.carousel.max_pages {
                return Err(StudioError::ValidationFailed(format!(
                    "invalid page count: choose between 1 and {} pages",
                    self.carousel.max_pages
                )));
            }
        }

        Ok(())
    }

    async fn dispatch(&self, archetype: Archetype, inputs: &StudioInputs) -> Result<Outcome> {
        match archetype.descriptor().mode {
            DispatchMode::SingleShot => {
                let request = self.generation_request(archetype, inputs)?;
                let image = self
                    .generator
                    .generate(
                        &request.primary_image,
                        request.secondary_image.as_ref(),
                        &request.instruction,
                    )
                    .await?;
                Ok(Outcome::Image(image))
            }
            DispatchMode::Carousel => {
                let idea = inputs.field(IDEA_FIELD).unwrap_or_default();
                let style = inputs
                    .field(STYLE_FIELD)
                    .unwrap_or(&self.carousel.default_style);
                let pages = inputs.page_count.unwrap_or(self.carousel.default_pages);
                let template = self.templates.for_archetype(archetype)?;

                let plans = self.planner.plan(idea, pages, style, template).await?;
                let slides = self.synthesizer.synthesize(&plans).await?;
                Ok(Outcome::Carousel(slides))
            }
        }
    }

    fn generation_request(
        &self,
        archetype: Archetype,
        inputs: &StudioInputs,
    ) -> Result<GenerationRequest> {
        let descriptor = archetype.descriptor();
        let primary_image = inputs.primary.clone().ok_or_else(|| {
            StudioError::ValidationFailed("missing required image".into())
        })?;
        let secondary_image = descriptor
            .secondary
            .and_then(|_| inputs.secondary.clone());

        let substitutions: Substitutions = descriptor
            .text_fields
            .iter()
            .filter_map(|field| {
                let value = inputs.field(field.key).or(field.default)?;
                Some((field.placeholder.to_string(), value.to_string()))
            })
            .collect();
        let template = self.templates.for_archetype(archetype)?;

        Ok(GenerationRequest {
            primary_image,
            secondary_image,
            instruction: prompts::resolve(archetype, template, &substitutions),
        })
    }
}

/// Closes one generation cycle. If `execute` is dropped before it publishes
/// an outcome, the drop marks the cycle cancelled so the session is not left
/// busy.
struct CycleGuard<'a> {
    state: &'a watch::Sender<SessionState>,
    request_id: String,
    done: bool,
}

impl CycleGuard<'_> {
    fn finish(mut self, next: impl FnOnce(&SessionState) -> SessionState) {
        self.state.send_modify(|state| *state = next(state));
        self.done = true;
    }
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        if self.done {
            return;
        }
        log::warn!("[req:{}] Request dropped before completion", self.request_id);
        let request_id = self.request_id.as_str();
        self.state.send_if_modified(|state| {
            if !state.is_busy() || state.request_id.as_deref() != Some(request_id) {
                return false;
            }
            *state = state.failed(CANCELLED_MESSAGE);
            true
        });
    }
}
