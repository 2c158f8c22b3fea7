//! GenStudio: pose transfer, product mockups, advertisements and
//! social-media carousels on top of the Gemini and Imagen REST APIs.

pub mod config;
pub mod error;
pub mod gemini;
pub mod logger;
pub mod models;
pub mod prompts;
pub mod service;
pub mod studio;

#[cfg(test)]
mod testing;

pub use config::{CarouselConfig, Config, GeminiConfig};
pub use error::{Result, StudioError};
pub use gemini::GeminiClient;
pub use models::{
    Archetype, CarouselSlide, EncodedImage, GeneratedImage, ImageOptions, SlidePlan,
};
pub use prompts::PromptTemplates;
pub use service::ModelService;
pub use studio::{Outcome, Phase, SessionState, Studio, StudioInputs};
