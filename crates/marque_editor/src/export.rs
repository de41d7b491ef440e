//! Export formats and download naming

use std::fmt;

use marque_image::ImagePayload;

/// What the user asked to download
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExportKind {
    /// Composite over the scene's own background
    Png,
    /// Composite over a transparent canvas
    TransparentPng,
    /// Vectorized composite; paid plans only
    Svg,
}

impl ExportKind {
    pub const ALL: [ExportKind; 3] = [ExportKind::Png, ExportKind::TransparentPng, ExportKind::Svg];

    pub fn extension(&self) -> &'static str {
        match self {
            ExportKind::Png | ExportKind::TransparentPng => "png",
            ExportKind::Svg => "svg",
        }
    }

    pub fn requires_paid_plan(&self) -> bool {
        matches!(self, ExportKind::Svg)
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportKind::Png => "PNG",
            ExportKind::TransparentPng => "transparent PNG",
            ExportKind::Svg => "SVG",
        })
    }
}

/// Export content
#[derive(Clone, Debug, PartialEq)]
pub enum ExportPayload {
    Image(ImagePayload),
    Svg(String),
}

impl ExportPayload {
    /// Bytes to write to disk
    pub fn bytes(&self) -> &[u8] {
        match self {
            ExportPayload::Image(image) => image.bytes(),
            ExportPayload::Svg(svg) => svg.as_bytes(),
        }
    }

    pub fn mime_type(&self) -> &str {
        match self {
            ExportPayload::Image(image) => image.mime_type(),
            ExportPayload::Svg(_) => "image/svg+xml",
        }
    }
}

/// A finished export ready for download
#[derive(Clone, Debug, PartialEq)]
pub struct ExportFile {
    pub file_name: String,
    pub payload: ExportPayload,
}

/// `<stem>_logo.<ext>`, where the stem is the brand name with whitespace
/// runs collapsed to `_` and lower-cased
pub fn export_file_name(name: &str, extension: &str) -> String {
    let mut stem = String::with_capacity(name.len());
    let mut in_space = false;
    for ch in name.chars() {
        if ch.is_whitespace() {
            if !in_space {
                stem.push('_');
            }
            in_space = true;
        } else {
            stem.extend(ch.to_lowercase());
            in_space = false;
        }
    }
    format!("{}_logo.{}", stem, extension)
}
