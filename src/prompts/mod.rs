//! Prompt templates and literal `[PLACEHOLDER]` substitution.
//!
//! Substitution is a single left-to-right pass: a bracketed token whose name
//! has a value is replaced, anything else is copied through unchanged, and
//! substituted values are never scanned again.

pub mod templates;

use crate::{
    error::{Result, StudioError},
    models::Archetype,
};
use std::collections::HashMap;

pub const PRODUCT_NAME: &str = "PRODUCT NAME HERE";
pub const NUM_PAGES: &str = "NUM_PAGES";
pub const STYLE: &str = "STYLE";
pub const CAROUSEL_IDEA: &str = "CAROUSEL_IDEA";
pub const POSE: &str = "POSE";

/// Placeholder name (without brackets) to replacement text.
pub type Substitutions = HashMap<String, String>;

pub fn substitute(raw_template: &str, substitutions: &Substitutions) -> String {
    let mut out = String::with_capacity(raw_template.len());
    let mut rest = raw_template;

    while let Some(open) = rest.find('[') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find(']') else {
            out.push_str(&rest[open..]);
            return out;
        };

        match substitutions.get(&after[..close]) {
            Some(value) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('[');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

pub fn resolve(archetype: Archetype, raw_template: &str, substitutions: &Substitutions) -> String {
    let prompt = substitute(raw_template, substitutions);
    log::debug!(
        "Resolved {} prompt ({} substitutions, {} chars)",
        archetype,
        substitutions.len(),
        prompt.len()
    );
    prompt
}

/// The raw template text for each archetype's template key.
#[derive(Debug, Clone)]
pub struct PromptTemplates {
    templates: HashMap<String, String>,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        let templates = [
            ("pose", templates::POSE),
            ("mockup", templates::MOCKUP),
            ("ad", templates::AD),
            ("carousel", templates::CAROUSEL),
        ]
        .into_iter()
        .map(|(key, text)| (key.to_string(), text.to_string()))
        .collect();

        Self { templates }
    }
}

impl PromptTemplates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_template(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.templates.insert(key.into(), text.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.templates.get(key).map(String::as_str)
    }

    pub fn for_archetype(&self, archetype: Archetype) -> Result<&str> {
        let key = archetype.descriptor().template_key;
        self.get(key).ok_or_else(|| {
            StudioError::ConfigError(format!("no prompt template registered for '{}'", key))
        })
    }
}
