use crate::{
    config::GeminiConfig,
    error::{Result, StudioError},
};
use serde::{de::DeserializeOwned, Serialize};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Authenticated JSON-over-HTTPS access to the Generative Language API.
#[derive(Clone)]
pub struct GeminiTransport {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl GeminiTransport {
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                StudioError::ConfigError("GEMINI_API_KEY environment variable is not set".into())
            })?;

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| StudioError::ClientError(e.to_string()))?;

        Ok(Self {
            http,
            api_base: config.api_base(),
            api_key,
        })
    }

    pub fn model_endpoint(&self, model: &str, method: &str) -> String {
        let model = model.trim();
        let model_path = if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{}", model)
        };
        format!("{}/{}:{}", self.api_base, model_path, method)
    }

    pub async fn post_json<B, R>(&self, endpoint: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .http
            .post(endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                log::error!("Gemini transport error details: {:?}", e);
                StudioError::RequestError(format!("request to {} failed: {}", endpoint, e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            log::error!("Gemini service error code: {}", status);
            log::error!("Gemini service error message: {}", message);
            return Err(StudioError::ServiceError {
                status: status.as_u16(),
                message,
            });
        }

        let response_str = response
            .text()
            .await
            .map_err(|e| StudioError::ResponseError(e.to_string()))?;

        decode_body(&response_str)
    }
}

/// Parses a successful response body into the expected wire type.
fn decode_body<R: DeserializeOwned>(body: &str) -> Result<R> {
    serde_json::from_str(body).map_err(|e| {
        log::error!("Unexpected Gemini response body: {}", body);
        StudioError::SerializationError(format!("failed to decode response: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key_is_a_config_error() {
        let err = GeminiTransport::new(&GeminiConfig::new().with_api_key("  "))
            .err()
            .unwrap();
        assert!(matches!(err, StudioError::ConfigError(_)));
    }

    #[test]
    fn test_undecodable_body_is_a_serialization_error() {
        let err = decode_body::<serde_json::Value>("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, StudioError::SerializationError(_)));

        let value: serde_json::Value = decode_body(r#"{"candidates": []}"#).unwrap();
        assert_eq!(value["candidates"], serde_json::json!([]));
    }

    #[test]
    fn test_model_endpoint() {
        let transport = GeminiTransport::new(
            &GeminiConfig::new()
                .with_api_key("test-key")
                .with_api_base("http://localhost:9000/v1beta/"),
        )
        .unwrap();

        assert_eq!(
            transport.model_endpoint("gemini-2.5-flash", "generateContent"),
            "http://localhost:9000/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert_eq!(
            transport.model_endpoint("models/imagen-4.0-generate-001", "predict"),
            "http://localhost:9000/v1beta/models/imagen-4.0-generate-001:predict"
        );
    }
}
