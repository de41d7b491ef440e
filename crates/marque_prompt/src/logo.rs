//! Logo generation prompts

use std::fmt::Write as _;

use marque_core::{non_blank, GenerationParams, LogoLayout};
use marque_image::ImagePayload;

/// Extra direction appended to each of the four concepts in a batch
pub const VARIATION_PROMPTS: [&str; 4] = [
    "A minimal and abstract icon.",
    "A detailed and illustrative icon.",
    "A modern, geometric wordmark.",
    "A classic and elegant emblem.",
];

/// Prompt text plus any images it refers to
#[derive(Clone, Debug, PartialEq)]
pub struct LogoRequest {
    pub prompt: String,
    pub images: Vec<ImagePayload>,
}

/// Build the generation prompt for one logo concept
///
/// The logo is requested on a plain white background, which gives later
/// background removal a clean matte. Text-only wordmarks skip that request.
pub fn logo_request(params: &GenerationParams) -> LogoRequest {
    let mut prompt = format!(
        "Create a professional, modern, and clean logo for a company named \"{}\".",
        params.name.trim()
    );

    if let Some(slogan) = non_blank(&params.slogan) {
        let _ = write!(prompt, " The company's slogan is \"{}\".", slogan);
    }
    if let Some(industry) = non_blank(&params.industry) {
        let _ = write!(prompt, " The industry is {}.", industry);
    }

    let colors = joined(&params.colors, " and ", true);
    if !colors.is_empty() {
        let _ = write!(prompt, " The desired color palette is {}.", colors);
    }
    let fonts = joined(&params.fonts, " or ", false);
    if !fonts.is_empty() {
        let _ = write!(prompt, " The font style should be in the style of {}.", fonts);
    }

    prompt.push_str(layout_sentence(params.layout));
    if params.layout.has_icon() {
        if let Some(icon) = non_blank(&params.icon_description) {
            let _ = write!(prompt, " The icon should depict {}.", icon.trim_end_matches('.'));
        }
    }
    if let Some(style) = non_blank(&params.style) {
        let _ = write!(prompt, " The overall visual style should be {}.", style.trim_end_matches('.'));
    }
    if let Some(extra) = non_blank(&params.prompt) {
        let _ = write!(prompt, " Additional instructions: {}.", extra.trim_end_matches('.'));
    }

    let mut images = Vec::new();
    if let Some(reference) = &params.reference_image {
        prompt.push_str(" Use the provided reference image as inspiration for the style and composition, but do not copy it.");
        images.push(reference.clone());
    }

    prompt.push_str(" The logo should be iconic, memorable, and vector-friendly.");
    if params.layout.has_icon() {
        prompt.push_str(" Provide the logo on a solid white background unless other background colors are specified.");
    }
    prompt.push_str(" The output must be a high-quality PNG.");
    if params.layout.has_text() {
        prompt.push_str(" Do not include any text other than the company name and slogan if provided.");
    } else {
        prompt.push_str(" Do not include any text.");
    }

    LogoRequest { prompt, images }
}

/// The four concept variations for a batch, in generation order
///
/// Each variation's direction is added to the user's own instructions.
pub fn variations(params: &GenerationParams) -> Vec<GenerationParams> {
    VARIATION_PROMPTS
        .iter()
        .map(|variation| {
            let prompt = match non_blank(&params.prompt) {
                Some(user) => format!("{}. {}", user.trim_end_matches('.'), variation),
                None => variation.to_string(),
            };
            GenerationParams {
                prompt: Some(prompt),
                ..params.clone()
            }
        })
        .collect()
}

fn layout_sentence(layout: LogoLayout) -> &'static str {
    match layout {
        LogoLayout::IconTop => " Place the icon above the company name.",
        LogoLayout::IconLeft => " Place the icon to the left of the company name.",
        LogoLayout::IconRight => " Place the icon to the right of the company name.",
        LogoLayout::IconOnly => " The logo should be a standalone icon without the company name.",
        LogoLayout::TextOnly => " The logo should be a text-only wordmark without any icon.",
    }
}

fn joined(values: &[String], separator: &str, lowercase: bool) -> String {
    values
        .iter()
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(|value| if lowercase { value.to_lowercase() } else { value.to_string() })
        .collect::<Vec<_>>()
        .join(separator)
}
