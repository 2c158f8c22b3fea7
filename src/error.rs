use thiserror::Error;

/// User-safe message used whenever the model service itself fails on the
/// single-image path. The technical cause is only logged.
pub const GENERIC_GENERATION_MESSAGE: &str =
    "Failed to generate image. Please check your API key and network connection.";

pub const NO_IMAGE_IN_RESPONSE: &str = "no image in response";

#[derive(Debug, Error)]
pub enum StudioError {
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
    #[error("Image generation failed: {0}")]
    GenerationFailed(String),
    #[error("Carousel planning failed: {0}")]
    PlanningFailed(String),
    #[error("Carousel synthesis failed: {0}")]
    SynthesisFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Client error: {0}")]
    ClientError(String),
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("Response error: {0}")]
    ResponseError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Internal error: {0}")]
    InternalError(String),
    #[error("Gemini service error ({status}): {message}")]
    ServiceError { status: u16, message: String },
}

impl StudioError {
    /// The single message shown to an end user for this kind of failure.
    pub fn user_message(&self) -> String {
        match self {
            StudioError::ValidationFailed(reason) => {
                sentence(reason).unwrap_or_else(|| "Please check your input.".to_string())
            }
            StudioError::ConfigError(reason) => sentence(reason)
                .unwrap_or_else(|| "The studio is not configured correctly.".to_string()),
            StudioError::GenerationFailed(reason) if reason == NO_IMAGE_IN_RESPONSE => {
                "No image was generated in the response.".to_string()
            }
            StudioError::GenerationFailed(_) => GENERIC_GENERATION_MESSAGE.to_string(),
            StudioError::PlanningFailed(_) => {
                "Failed to plan the carousel. Please try a different idea or try again.".to_string()
            }
            StudioError::SynthesisFailed(_) => {
                "Failed to generate one or more carousel slides. Please try again.".to_string()
            }
            _ => "An unknown error occurred. Please try again.".to_string(),
        }
    }

    /// Validation failures are expected user mistakes, everything else is
    /// worth an operator's attention.
    pub fn is_anomaly(&self) -> bool {
        !matches!(self, StudioError::ValidationFailed(_))
    }
}

pub type Result<T> = std::result::Result<T, StudioError>;

/// Capitalises `reason` and ends it with a full stop.
fn sentence(reason: &str) -> Option<String> {
    let mut chars = reason.chars();
    let first = chars.next()?;
    Some(format!("{}{}.", first.to_uppercase(), chars.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_hide_technical_detail() {
        let err = StudioError::GenerationFailed("HTTP 401 from upstream".into());
        assert_eq!(err.user_message(), GENERIC_GENERATION_MESSAGE);
        assert!(!err.user_message().contains("401"));

        let err = StudioError::SynthesisFailed("slide 2: connection reset".into());
        assert!(!err.user_message().contains("connection reset"));
    }

    #[test]
    fn test_validation_message_names_the_missing_input() {
        let err = StudioError::ValidationFailed(
            "missing required image: Base Image (Person)".into(),
        );
        assert_eq!(
            err.user_message(),
            "Missing required image: Base Image (Person)."
        );
        assert!(!err.is_anomaly());
        assert!(StudioError::PlanningFailed("empty plan".into()).is_anomaly());
    }

    #[test]
    fn test_missing_api_key_message_is_shown() {
        let err = StudioError::ConfigError(
            "GEMINI_API_KEY environment variable is not set".into(),
        );
        assert_eq!(
            err.user_message(),
            "GEMINI_API_KEY environment variable is not set."
        );
        assert!(err.is_anomaly());
    }

    #[test]
    fn test_no_image_message() {
        let err = StudioError::GenerationFailed(NO_IMAGE_IN_RESPONSE.into());
        assert_eq!(
            err.user_message(),
            "No image was generated in the response."
        );
    }
}
