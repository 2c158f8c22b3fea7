use crate::{
    error::{Result, StudioError},
    models::{Archetype, SlidePlan},
    prompts::{self, Substitutions},
    service::ModelService,
};
use serde_json::{json, Value};
use std::sync::Arc;

/// Asks the text model for an ordered list of per-slide image instructions.
#[derive(Clone)]
pub struct CarouselPlanner {
    service: Arc<dyn ModelService>,
}

impl CarouselPlanner {
    pub fn new(service: Arc<dyn ModelService>) -> Self {
        Self { service }
    }

    pub async fn plan(
        &self,
        idea: &str,
        num_pages: u32,
        style: &str,
        template: &str,
    ) -> Result<Vec<SlidePlan>> {
        let substitutions: Substitutions = [
            (prompts::CAROUSEL_IDEA, idea.to_string()),
            (prompts::NUM_PAGES, num_pages.to_string()),
            (prompts::STYLE, style.to_string()),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect();
        let prompt = prompts::resolve(Archetype::Carousel, template, &substitutions);

        log::info!("Planning {} carousel slide(s) in {} style", num_pages, style);

        let text = self
            .service
            .generate_structured_text(&prompt, &plan_schema(num_pages))
            .await
            .map_err(|e| {
                log::error!("Carousel planning request failed: {}", e);
                StudioError::PlanningFailed("the planning request failed".into())
            })?;

        let mut plans = parse_plan(&text)?;
        let requested = num_pages as usize;
        if plans.len() != requested {
            log::warn!(
                "Planner asked for {} slide(s) but the model returned {}",
                num_pages,
                plans.len()
            );
        }
        // Never render more slides than were asked for.
        plans.truncate(requested);

        Ok(plans)
    }
}

/// An array of exactly `num_pages` objects with a required `imagePrompt`.
pub fn plan_schema(num_pages: u32) -> Value {
    json!({
        "type": "ARRAY",
        "minItems": num_pages,
        "maxItems": num_pages,
        "items": {
            "type": "OBJECT",
            "properties": {
                "imagePrompt": {
                    "type": "STRING",
                    "description": "Self-contained prompt for generating this slide's image."
                },
                "title": { "type": "STRING" },
                "body": { "type": "STRING" }
            },
            "required": ["imagePrompt"],
            "propertyOrdering": ["imagePrompt", "title", "body"]
        }
    })
}

pub fn parse_plan(text: &str) -> Result<Vec<SlidePlan>> {
    let value: Value = serde_json::from_str(strip_code_fence(text)).map_err(|e| {
        log::error!("Carousel plan is not valid JSON: {}", e);
        StudioError::PlanningFailed("the plan could not be parsed".into())
    })?;

    let Value::Array(entries) = value else {
        return Err(StudioError::PlanningFailed("the plan is not a list of slides".into()));
    };
    if entries.is_empty() {
        return Err(StudioError::PlanningFailed("the plan has no slides".into()));
    }

    entries
        .into_iter()
        .enumerate()
        .map(|(idx, entry)| {
            let plan: SlidePlan = serde_json::from_value(entry).map_err(|e| {
                log::error!("Carousel plan entry {} is malformed: {}", idx + 1, e);
                StudioError::PlanningFailed(format!("slide {} is malformed", idx + 1))
            })?;
            if plan.image_instruction.trim().is_empty() {
                return Err(StudioError::PlanningFailed(format!(
                    "slide {} has no image instruction",
                    idx + 1
                )));
            }
            Ok(plan)
        })
        .collect()
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
