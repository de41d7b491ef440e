//! Logo generation parameters carried with a scene

use std::fmt;

use marque_image::ImagePayload;
use serde::{Deserialize, Serialize};

/// How the icon and wordmark are arranged
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogoLayout {
    #[default]
    IconTop,
    IconLeft,
    IconRight,
    IconOnly,
    TextOnly,
}

impl LogoLayout {
    pub const ALL: [LogoLayout; 5] = [
        LogoLayout::IconTop,
        LogoLayout::IconLeft,
        LogoLayout::IconRight,
        LogoLayout::IconOnly,
        LogoLayout::TextOnly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogoLayout::IconTop => "icon-top",
            LogoLayout::IconLeft => "icon-left",
            LogoLayout::IconRight => "icon-right",
            LogoLayout::IconOnly => "icon-only",
            LogoLayout::TextOnly => "text-only",
        }
    }

    /// Whether the logo has an icon at all
    pub fn has_icon(&self) -> bool {
        !matches!(self, LogoLayout::TextOnly)
    }

    /// Whether the logo renders the company name
    pub fn has_text(&self) -> bool {
        !matches!(self, LogoLayout::IconOnly)
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|layout| layout.as_str() == value)
    }
}

impl fmt::Display for LogoLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the user supplied when asking for a logo
///
/// Only `name` is required; empty strings and empty lists are treated the
/// same as absent values when building prompts.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationParams {
    pub name: String,
    pub slogan: Option<String>,
    pub industry: Option<String>,
    pub colors: Vec<String>,
    pub fonts: Vec<String>,
    /// Free-form additional instructions
    pub prompt: Option<String>,
    pub reference_image: Option<ImagePayload>,
    pub layout: LogoLayout,
    pub icon_description: Option<String>,
    pub style: Option<String>,
}

impl GenerationParams {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_slogan(mut self, slogan: impl Into<String>) -> Self {
        self.slogan = Some(slogan.into());
        self
    }

    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = Some(industry.into());
        self
    }

    pub fn with_colors<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.colors = colors.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_fonts<I, S>(mut self, fonts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fonts = fonts.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn with_reference_image(mut self, image: ImagePayload) -> Self {
        self.reference_image = Some(image);
        self
    }

    pub fn with_layout(mut self, layout: LogoLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_icon_description(mut self, description: impl Into<String>) -> Self {
        self.icon_description = Some(description.into());
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }
}

/// Trimmed, non-empty view of an optional text field
pub fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_serde() {
        let json = serde_json::to_string(&LogoLayout::IconLeft).unwrap();
        assert_eq!(json, "\"icon-left\"");
        assert_eq!(LogoLayout::parse("text-only"), Some(LogoLayout::TextOnly));
        assert!(!LogoLayout::TextOnly.has_icon());
        assert!(!LogoLayout::IconOnly.has_text());
    }

    #[test]
    fn test_params_defaults_from_json() {
        let params: GenerationParams = serde_json::from_str(r#"{"name":"Aura","iconDescription":"a leaf"}"#).unwrap();
        assert_eq!(params.name, "Aura");
        assert_eq!(params.layout, LogoLayout::IconTop);
        assert_eq!(params.icon_description.as_deref(), Some("a leaf"));
        assert!(params.colors.is_empty());
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(&Some("  x ".to_string())), Some("x"));
        assert_eq!(non_blank(&Some("   ".to_string())), None);
        assert_eq!(non_blank(&None), None);
    }
}
