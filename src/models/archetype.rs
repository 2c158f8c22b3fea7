use crate::error::StudioError;
use crate::prompts;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kinds of request the studio understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Archetype {
    Pose,
    Mockup,
    Ad,
    Carousel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    SingleShot,
    Carousel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSlot {
    pub title: &'static str,
    pub required: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextField {
    pub key: &'static str,
    pub label: &'static str,
    /// Template placeholder (without brackets) this field fills.
    pub placeholder: &'static str,
    pub required: bool,
    /// Substituted when an optional field is left blank.
    pub default: Option<&'static str>,
}

/// Everything validation and dispatch need to know about an archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchetypeDescriptor {
    pub id: &'static str,
    pub primary: Option<ImageSlot>,
    pub secondary: Option<ImageSlot>,
    pub text_fields: &'static [TextField],
    pub template_key: &'static str,
    pub mode: DispatchMode,
}

pub const POSE_FIELD: &str = "pose";
pub const PRODUCT_NAME_FIELD: &str = "product_name";
pub const IDEA_FIELD: &str = "idea";
pub const STYLE_FIELD: &str = "style";

static POSE: ArchetypeDescriptor = ArchetypeDescriptor {
    id: "pose",
    primary: Some(ImageSlot {
        title: "Base Image (Person)",
        required: true,
    }),
    secondary: Some(ImageSlot {
        title: "Style/Reference Image (Pose)",
        required: false,
    }),
    text_fields: &[TextField {
        key: POSE_FIELD,
        label: "Pose description",
        placeholder: prompts::POSE,
        required: false,
        default: Some(
            "the pose shown in the second image, or a natural, confident standing pose if no second image is provided",
        ),
    }],
    template_key: "pose",
    mode: DispatchMode::SingleShot,
};

static MOCKUP: ArchetypeDescriptor = ArchetypeDescriptor {
    id: "mockup",
    primary: Some(ImageSlot {
        title: "Base Image (Product)",
        required: true,
    }),
    secondary: Some(ImageSlot {
        title: "Style/Reference Image (Scene)",
        required: true,
    }),
    text_fields: &[],
    template_key: "mockup",
    mode: DispatchMode::SingleShot,
};

static AD: ArchetypeDescriptor = ArchetypeDescriptor {
    id: "ad",
    primary: Some(ImageSlot {
        title: "Base Image (Subject)",
        required: true,
    }),
    secondary: Some(ImageSlot {
        title: "Style/Reference Image (Aesthetic)",
        required: true,
    }),
    text_fields: &[TextField {
        key: PRODUCT_NAME_FIELD,
        label: "Product name",
        placeholder: prompts::PRODUCT_NAME,
        required: true,
        default: None,
    }],
    template_key: "ad",
    mode: DispatchMode::SingleShot,
};

static CAROUSEL: ArchetypeDescriptor = ArchetypeDescriptor {
    id: "carousel",
    primary: None,
    secondary: None,
    text_fields: &[
        TextField {
            key: IDEA_FIELD,
            label: "Carousel idea",
            placeholder: prompts::CAROUSEL_IDEA,
            required: true,
            default: None,
        },
        TextField {
            key: STYLE_FIELD,
            label: "Illustration style",
            placeholder: prompts::STYLE,
            required: false,
            default: None,
        },
    ],
    template_key: "carousel",
    mode: DispatchMode::Carousel,
};

impl Archetype {
    pub const ALL: [Archetype; 4] = [
        Archetype::Pose,
        Archetype::Mockup,
        Archetype::Ad,
        Archetype::Carousel,
    ];

    pub fn descriptor(&self) -> &'static ArchetypeDescriptor {
        match self {
            Archetype::Pose => &POSE,
            Archetype::Mockup => &MOCKUP,
            Archetype::Ad => &AD,
            Archetype::Carousel => &CAROUSEL,
        }
    }

    pub fn id(&self) -> &'static str {
        self.descriptor().id
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Archetype {
    type Err = StudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pose" => Ok(Archetype::Pose),
            "mockup" | "product" => Ok(Archetype::Mockup),
            "ad" | "advertisement" => Ok(Archetype::Ad),
            "carousel" => Ok(Archetype::Carousel),
            other => Err(StudioError::ValidationFailed(format!(
                "unknown archetype '{}'",
                other
            ))),
        }
    }
}
