use serde::{Deserialize, Serialize};

/// The planned instruction for one carousel page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlidePlan {
    #[serde(rename = "imagePrompt")]
    pub image_instruction: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl SlidePlan {
    pub fn new(image_instruction: impl Into<String>) -> Self {
        Self {
            image_instruction: image_instruction.into(),
            title: None,
            body: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarouselSlide {
    pub image_url: String,
    pub title: Option<String>,
    pub body: Option<String>,
}
