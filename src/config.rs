use std::env;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_IMAGEN_MODEL: &str = "imagen-4.0-generate-001";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub api_base: Option<String>,
    pub image_model: Option<String>,
    pub text_model: Option<String>,
    pub imagen_model: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct CarouselConfig {
    pub aspect_ratio: String,
    pub output_format: String,
    pub default_style: String,
    pub default_pages: u32,
    pub max_pages: u32,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub gemini: GeminiConfig,
    pub carousel: CarouselConfig,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            api_key: None,
            api_base: None,
            image_model: None,
            text_model: None,
            imagen_model: None,
            request_timeout_secs: None,
        }
    }
}

impl GeminiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let api_key = non_empty_env("GEMINI_API_KEY").or_else(|| non_empty_env("API_KEY"));
        let api_base = non_empty_env("GEMINI_API_BASE");
        let image_model = non_empty_env("GEMINI_IMAGE_MODEL");
        let text_model = non_empty_env("GEMINI_TEXT_MODEL");
        let imagen_model = non_empty_env("IMAGEN_MODEL");
        let request_timeout_secs = env::var("GEMINI_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.trim().parse().ok());

        GeminiConfig {
            api_key,
            api_base,
            image_model,
            text_model,
            imagen_model,
            request_timeout_secs,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    pub fn with_models(
        mut self,
        image_model: impl Into<String>,
        text_model: impl Into<String>,
        imagen_model: impl Into<String>,
    ) -> Self {
        self.image_model = Some(image_model.into());
        self.text_model = Some(text_model.into());
        self.imagen_model = Some(imagen_model.into());
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = Some(seconds);
        self
    }

    pub fn api_base(&self) -> String {
        self.api_base
            .as_deref()
            .map(|base| base.trim().trim_end_matches('/'))
            .filter(|base| !base.is_empty())
            .unwrap_or(DEFAULT_API_BASE)
            .to_string()
    }

    pub fn image_model(&self) -> &str {
        self.image_model.as_deref().unwrap_or(DEFAULT_IMAGE_MODEL)
    }

    pub fn text_model(&self) -> &str {
        self.text_model.as_deref().unwrap_or(DEFAULT_TEXT_MODEL)
    }

    pub fn imagen_model(&self) -> &str {
        self.imagen_model.as_deref().unwrap_or(DEFAULT_IMAGEN_MODEL)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }
}

impl Default for CarouselConfig {
    fn default() -> Self {
        CarouselConfig {
            aspect_ratio: "1:1".to_string(),
            output_format: "image/png".to_string(),
            default_style: "Flat".to_string(),
            default_pages: 5,
            max_pages: 10,
        }
    }
}

impl CarouselConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        let max_pages = env::var("CAROUSEL_MAX_PAGES")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .filter(|pages| *pages > 0)
            .unwrap_or(defaults.max_pages);

        CarouselConfig {
            aspect_ratio: non_empty_env("CAROUSEL_ASPECT_RATIO").unwrap_or(defaults.aspect_ratio),
            output_format: non_empty_env("CAROUSEL_OUTPUT_FORMAT")
                .unwrap_or(defaults.output_format),
            default_style: non_empty_env("CAROUSEL_STYLE").unwrap_or(defaults.default_style),
            default_pages: defaults.default_pages.min(max_pages),
            max_pages,
        }
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: impl Into<String>) -> Self {
        self.aspect_ratio = aspect_ratio.into();
        self
    }

    pub fn with_output_format(mut self, output_format: impl Into<String>) -> Self {
        self.output_format = output_format.into();
        self
    }

    pub fn with_default_style(mut self, style: impl Into<String>) -> Self {
        self.default_style = style.into();
        self
    }

    pub fn with_page_limits(mut self, default_pages: u32, max_pages: u32) -> Self {
        self.max_pages = max_pages.max(1);
        self.default_pages = default_pages.clamp(1, self.max_pages);
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            gemini: GeminiConfig::default(),
            carousel: CarouselConfig::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Config {
            gemini: GeminiConfig::from_env(),
            carousel: CarouselConfig::from_env(),
        }
    }

    pub fn with_gemini(mut self, config: GeminiConfig) -> Self {
        self.gemini = config;
        self
    }

    pub fn with_carousel(mut self, config: CarouselConfig) -> Self {
        self.carousel = config;
        self
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_defaults() {
        let config = GeminiConfig::new();
        assert_eq!(config.api_base(), DEFAULT_API_BASE);
        assert_eq!(config.image_model(), "gemini-2.5-flash-image");
        assert_eq!(config.text_model(), "gemini-2.5-flash");
        assert_eq!(config.imagen_model(), "imagen-4.0-generate-001");
        assert_eq!(config.request_timeout(), Duration::from_secs(120));
    }

    #[test]
    fn test_api_base_trims_trailing_slash() {
        let config = GeminiConfig::new().with_api_base("http://localhost:8080/v1beta/");
        assert_eq!(config.api_base(), "http://localhost:8080/v1beta");
    }

    #[test]
    fn test_page_limits_are_clamped() {
        let config = CarouselConfig::new().with_page_limits(12, 8);
        assert_eq!(config.max_pages, 8);
        assert_eq!(config.default_pages, 8);

        let config = CarouselConfig::new().with_page_limits(0, 0);
        assert_eq!(config.max_pages, 1);
        assert_eq!(config.default_pages, 1);
    }
}
