pub const POSE: &str = "The first image is the base image of a person. Recreate the person from the base image in the following pose: [POSE]. If a second image is provided, it is a reference for the pose. Maintain the original person's appearance and clothing.";

pub const MOCKUP: &str = "The first image contains a product. The second image is a scene. Create a realistic mockup by placing the product from the first image into the scene from the second image. The product should be integrated naturally, with correct lighting and perspective.";

pub const AD: &str = "The first image is the main subject/product: [PRODUCT NAME HERE]. The second image provides the style, mood, and background. Create a dynamic and visually appealing advertisement for [PRODUCT NAME HERE] by merging the subject from the first image with the aesthetic of the second image.";

pub const CAROUSEL: &str = "You are planning a social media carousel about: [CAROUSEL_IDEA].
Write exactly [NUM_PAGES] slides. Every slide is a single square illustration in a [STYLE] illustration style, and the slides must read as one continuous story in order.
For each slide return an object with:
- \"imagePrompt\": a complete, self-contained prompt for an image generator describing the whole illustration, including any short on-image text, the [STYLE] style and a consistent colour palette and characters across slides.
- \"title\": a short caption title for the slide.
- \"body\": one or two sentences of caption text.
Every slide except the last must include a small \"continue\" cue drawn in the [STYLE] style, such as an arrow pointing right in the bottom right corner. The last slide must not include any arrow or continue cue.
Return only the JSON array.";

