use crate::error::{Result, StudioError};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// An uploaded image held as base64 text, ready to be sent to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedImage {
    name: String,
    media_type: String,
    payload: String,
}

impl EncodedImage {
    /// Encodes raw image bytes. Only `image/*` media types are accepted.
    pub fn from_bytes(
        name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: &[u8],
    ) -> Result<Self> {
        let name = name.into();
        let media_type = media_type.into();
        if !media_type.starts_with("image/") {
            return Err(StudioError::ValidationFailed(format!(
                "unsupported media type '{}' for {}",
                media_type, name
            )));
        }

        Ok(Self {
            name,
            media_type,
            payload: STANDARD.encode(bytes),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn data_url(&self) -> String {
        data_url(&self.media_type, &self.payload)
    }
}

/// Image bytes as the model service returns them: base64 data plus media type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: String,
}

/// A single generated image, self-contained as a `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub data_url: String,
}

impl GeneratedImage {
    pub fn new(media_type: &str, payload: &str) -> Self {
        Self {
            data_url: data_url(media_type, payload),
        }
    }

    pub fn from_inline(image: &InlineImage) -> Self {
        Self::new(&image.mime_type, &image.data)
    }

    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    pub fn media_type(&self) -> Option<&str> {
        self.data_url
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(';'))
            .map(|(media_type, _)| media_type)
    }

    pub fn decode(&self) -> Result<Vec<u8>> {
        let (_, payload) = self
            .data_url
            .split_once(";base64,")
            .ok_or_else(|| StudioError::ResponseError("image is not a base64 data URL".into()))?;

        STANDARD
            .decode(payload.as_bytes())
            .map_err(|e| StudioError::ResponseError(format!("invalid base64 image data: {}", e)))
    }

    /// Decodes the image and writes it to `path`, creating parent directories.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let bytes = self.decode()?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StudioError::InternalError(format!("Failed to create directory: {}", e)))?;
        }

        tokio::fs::write(path, &bytes)
            .await
            .map_err(|e| StudioError::InternalError(format!("Failed to save image: {}", e)))?;

        log::info!("Image saved to: {}", path.display());
        Ok(bytes.len())
    }
}

fn data_url(media_type: &str, payload: &str) -> String {
    format!("data:{};base64,{}", media_type, payload)
}

/// Best-effort media type for a file name, by extension.
pub fn media_type_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        _ => None,
    }
}

/// File extension to use when saving an image of the given media type.
pub fn extension_for_media_type(media_type: &str) -> &'static str {
    match media_type {
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "png",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoded_image_from_bytes() {
        let image = EncodedImage::from_bytes("person.png", "image/png", b"hello").unwrap();
        assert_eq!(image.name(), "person.png");
        assert_eq!(image.media_type(), "image/png");
        assert_eq!(image.payload(), "aGVsbG8=");
        assert_eq!(image.data_url(), "data:image/png;base64,aGVsbG8=");
    }

    #[test]
    fn test_non_image_upload_is_rejected() {
        let err = EncodedImage::from_bytes("notes.txt", "text/plain", b"hi").unwrap_err();
        assert!(matches!(err, StudioError::ValidationFailed(_)));
    }

    #[test]
    fn test_generated_image_decode() {
        let image = GeneratedImage::new("image/jpeg", "aGVsbG8=");
        assert_eq!(image.media_type(), Some("image/jpeg"));
        assert_eq!(image.decode().unwrap(), b"hello".to_vec());

        let broken = GeneratedImage {
            data_url: "https://example.com/a.png".to_string(),
        };
        assert!(broken.decode().is_err());
        assert_eq!(broken.media_type(), None);
    }

    #[tokio::test]
    async fn test_generated_image_save() {
        let dir = std::env::temp_dir().join(format!("genstudio-{}", uuid::Uuid::new_v4()));
        let path = dir.join("nested").join("out.png");
        let image = GeneratedImage::new("image/png", "aGVsbG8=");

        let written = image.save(&path).await.unwrap();
        assert_eq!(written, 5);
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"hello".to_vec());

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[test]
    fn test_media_type_guessing() {
        assert_eq!(media_type_for_path(Path::new("a/b.JPG")), Some("image/jpeg"));
        assert_eq!(media_type_for_path(Path::new("scene.webp")), Some("image/webp"));
        assert_eq!(media_type_for_path(Path::new("README")), None);
        assert_eq!(extension_for_media_type("image/jpeg"), "jpg");
        assert_eq!(extension_for_media_type("image/png"), "png");
    }
}
