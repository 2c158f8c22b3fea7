pub mod archetype;
pub mod carousel;
pub mod content;
pub mod gemini;
pub mod image;

pub use archetype::*;
pub use carousel::*;
pub use content::*;
pub use gemini::*;
pub use image::*;
