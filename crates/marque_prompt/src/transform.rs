//! Single-image transform instructions
//!
//! Each transform is sent alongside exactly one image (a layer's source or a
//! flattened composite) and asks the model for a new image, SVG text or a
//! JSON layer list.

use std::borrow::Cow;
use std::fmt;

const REMOVE_BACKGROUND: &str = "**Critical Task: Precision Background Removal.** You are an expert graphic design tool. Your sole function is to identify the primary subject(s) in the provided image and completely remove the background, leaving it fully transparent.
**Instructions:**
1.  **Subject Identification:** Analyze the image to accurately distinguish the foreground subject(s) from the background. Pay close attention to fine details like hair, fur, or complex edges.
2.  **Mask Creation:** Generate a precise, anti-aliased mask around the subject(s).
3.  **Background Removal:** Erase all pixels that are part of the background.
**Output Constraints:**
- The output image **MUST** be a PNG.
- The background of the output image **MUST** be 100% transparent (alpha channel value of 0).
- **DO NOT** replace the background with white, black, a checkerboard pattern, or any other color or visual effect. The background must be empty and transparent.
- Preserve the original resolution and quality of the subject.";

const AUTO_CROP: &str = "**Critical Task: Smart Bounding Box Crop.** You are an automated cropping tool. Your function is to analyze an image with a transparent background and trim the canvas to the tightest possible bounding box around the visible content.
**Instructions:**
1. **Analyze Alpha Channel:** Scan the image's alpha channel to find the exact coordinates of the top-most, bottom-most, left-most, and right-most non-transparent pixels.
2. **Calculate Bounding Box:** Define a bounding box using these exact coordinates.
3. **Crop:** Crop the image canvas to these dimensions.
**Constraint:** The crop must be pixel-perfect. There should be **zero** extra transparent padding or margin around the subject. The output must be a PNG that preserves the original transparency.";

const UPSCALE: &str = "Upscale this image to a higher resolution. Enhance the details, sharpen the lines, and make it look crisp and high-quality, suitable for professional use. Do not change the design or composition during the upscaling process.";

const VECTORIZE: &str = "Analyze this raster logo image and convert it into a vector graphic. Provide the result as clean, optimized SVG code. The SVG code should be the only content in your response, without any surrounding text, explanations, or markdown fences. Just the raw SVG code starting with `<svg ...>` and ending with `</svg>`.";

const DECOMPOSE: &str = "Analyze the provided logo image. Deconstruct it into its fundamental components: text elements and simple shapes (rectangles, circles). Provide the result as a JSON array where each object represents a single component. For each component, specify its type ('text' or 'shape'), its position (x, y), and its size (width, height) as percentages of the total canvas. Also include specific properties: for text, include the text content, color, approximate fontSize in pixels, fontFamily (suggest a common web font like 'Arial' or 'Helvetica'), fontWeight ('normal' or 'bold'), fontStyle ('normal' or 'italic'), and textAlign ('left', 'center', or 'right'). For shapes, include the shape type ('rectangle' or 'circle') and its color. All colors must be in hex format.";

/// What the model should do with the image it is given
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transform {
    /// Cut the subject out onto full alpha transparency
    ///
    /// Transparency is requested, not verified: the returned pixels are
    /// never inspected.
    RemoveBackground,
    /// Trim to the tightest box around non-transparent content
    AutoCrop,
    Upscale,
    /// Free-form edit described by the user
    Refine(String),
    /// Place the transparent logo into a described real-world scene
    Mockup(String),
    /// Place the transparent logo onto a generated photographic background
    Background(String),
    /// Reply with SVG markup
    Vectorize,
    /// Reply with a JSON array of text and shape primitives
    Decompose,
}

impl Transform {
    /// The instruction text sent with the image
    pub fn instruction(&self) -> Cow<'static, str> {
        match self {
            Transform::RemoveBackground => Cow::Borrowed(REMOVE_BACKGROUND),
            Transform::AutoCrop => Cow::Borrowed(AUTO_CROP),
            Transform::Upscale => Cow::Borrowed(UPSCALE),
            Transform::Vectorize => Cow::Borrowed(VECTORIZE),
            Transform::Decompose => Cow::Borrowed(DECOMPOSE),
            Transform::Refine(prompt) => Cow::Owned(format!(
                "Apply the following refinement to this image: \"{}\". The output should be a single PNG image reflecting this change.",
                prompt.trim()
            )),
            Transform::Mockup(prompt) => Cow::Owned(format!(
                "Place the provided logo onto a realistic mockup. The logo has a transparent background. {}. The final image should be a high-quality, photorealistic mockup scene.",
                prompt.trim().trim_end_matches('.')
            )),
            Transform::Background(prompt) => Cow::Owned(format!(
                "Take the provided logo image (which has a transparent background) and place it onto a new background. The new background should be a high-quality, photorealistic image based on this description: \"{}\". The logo should be centered and well-integrated into the scene.",
                prompt.trim()
            )),
        }
    }

    /// Short label, used for progress and logging
    pub fn label(&self) -> &'static str {
        match self {
            Transform::RemoveBackground => "remove-background",
            Transform::AutoCrop => "auto-crop",
            Transform::Upscale => "upscale",
            Transform::Refine(_) => "refine",
            Transform::Mockup(_) => "mockup",
            Transform::Background(_) => "ai-background",
            Transform::Vectorize => "vectorize",
            Transform::Decompose => "decompose",
        }
    }

    /// Whether the reply is text (SVG or JSON) rather than an image
    pub fn expects_text(&self) -> bool {
        matches!(self, Transform::Vectorize | Transform::Decompose)
    }

    /// Whether the input should be rendered on a transparent canvas first
    pub fn wants_transparent_input(&self) -> bool {
        matches!(self, Transform::Mockup(_) | Transform::Background(_))
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refine_quotes_prompt() {
        let text = Transform::Refine("  make it blue ".into()).instruction();
        assert_eq!(
            text,
            "Apply the following refinement to this image: \"make it blue\". The output should be a single PNG image reflecting this change."
        );
    }

    #[test]
    fn test_mockup_avoids_double_period() {
        let text = Transform::Mockup("On a coffee cup.".into()).instruction();
        assert!(text.contains("transparent background. On a coffee cup. The final image"));
    }

    #[test]
    fn test_fixed_instructions() {
        assert!(Transform::RemoveBackground
            .instruction()
            .contains("100% transparent (alpha channel value of 0)"));
        assert!(Transform::AutoCrop.instruction().contains("**zero** extra transparent padding"));
        assert!(Transform::Vectorize.instruction().ends_with("ending with `</svg>`."));
    }

    #[test]
    fn test_classification() {
        assert!(Transform::Decompose.expects_text());
        assert!(!Transform::Upscale.expects_text());
        assert!(Transform::Background("beach".into()).wants_transparent_input());
        assert!(!Transform::Refine("x".into()).wants_transparent_input());
        assert_eq!(Transform::AutoCrop.to_string(), "auto-crop");
    }
}
