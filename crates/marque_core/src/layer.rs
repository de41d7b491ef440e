//! Layer model
//!
//! A layer is one visual element placed on the logo canvas: a text box, a
//! simple shape, or an image. Every layer carries a percentage [`Frame`] and
//! a `z_index`; the variant-specific style lives in [`LayerKind`].
//!
//! The serialized form is a flat JSON object discriminated by `type`:
//!
//! ```json
//! { "id": "text-1", "type": "text", "x": 25, "y": 45, "width": 50,
//!   "height": 10, "zIndex": 1, "text": "Aura", "fontSize": 48, ... }
//! ```

use std::fmt;

use marque_image::ImagePayload;
use serde::{Deserialize, Serialize};

use crate::color::HexColor;
use crate::geometry::{Frame, MinimumSize};

/// Font family used for text layers added from the editor
pub const DEFAULT_FONT_FAMILY: &str = "'Inter', sans-serif";

// ─────────────────────────────────────────────────────────────────────────────
// Layer Identifiers
// ─────────────────────────────────────────────────────────────────────────────

/// Stable, unique identifier for a layer within a scene
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(String);

impl LayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LayerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Generator for `<kind>-<n>` layer ids
#[derive(Debug, Default)]
pub struct LayerIdGenerator {
    next: u64,
}

impl LayerIdGenerator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Produce the next id with the given prefix that `taken` rejects
    pub fn next_free(&mut self, prefix: &str, taken: impl Fn(&LayerId) -> bool) -> LayerId {
        loop {
            let id = LayerId(format!("{}-{}", prefix, self.next.max(1)));
            self.next = self.next.max(1) + 1;
            if !taken(&id) {
                return id;
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Style enums
// ─────────────────────────────────────────────────────────────────────────────

macro_rules! keyword_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            #[default]
            $($variant),+
        }

        impl $name {
            /// Keyword used in serialized scenes and compiled instructions
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            /// Parse a keyword, returning `None` for anything unrecognized
            pub fn from_keyword(keyword: &str) -> Option<Self> {
                match keyword {
                    $($text => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

keyword_enum!(
    /// Text weight
    FontWeight { Normal => "normal", Bold => "bold" }
);

keyword_enum!(
    /// Text slant
    FontStyle { Normal => "normal", Italic => "italic" }
);

keyword_enum!(
    /// Horizontal alignment of text within its box
    TextAlign { Left => "left", Center => "center", Right => "right" }
);

keyword_enum!(
    /// Primitive shape kinds
    ShapeKind { Rectangle => "rectangle", Circle => "circle" }
);

// ─────────────────────────────────────────────────────────────────────────────
// Layers
// ─────────────────────────────────────────────────────────────────────────────

/// Text content and typography
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub text: String,
    pub color: HexColor,
    /// Font size in pixels
    pub font_size: f32,
    pub font_family: String,
    pub font_weight: FontWeight,
    pub font_style: FontStyle,
    pub text_align: TextAlign,
}

/// Variant-specific layer content
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LayerKind {
    Text(TextStyle),
    Shape { shape: ShapeKind, color: HexColor },
    Image { src: ImagePayload },
}

impl LayerKind {
    /// Lower-case variant name, also used as the id prefix
    pub fn name(&self) -> &'static str {
        match self {
            LayerKind::Text(_) => "text",
            LayerKind::Shape { .. } => "shape",
            LayerKind::Image { .. } => "image",
        }
    }
}

/// One visual element on the canvas
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    pub id: LayerId,
    #[serde(flatten)]
    pub frame: Frame,
    /// Paint order; higher paints later. Not required to be contiguous.
    pub z_index: i32,
    #[serde(flatten)]
    pub kind: LayerKind,
}

impl Layer {
    pub fn new(id: LayerId, frame: Frame, kind: LayerKind) -> Self {
        Self {
            id,
            frame,
            z_index: 0,
            kind,
        }
    }

    /// Text box in the middle of the canvas
    pub fn text(id: LayerId, text: impl Into<String>, font_size: f32, font_weight: FontWeight) -> Self {
        Self::new(
            id,
            Frame::new(25.0, 45.0, 50.0, 10.0),
            LayerKind::Text(TextStyle {
                text: text.into(),
                color: HexColor::BLACK,
                font_size,
                font_family: DEFAULT_FONT_FAMILY.to_string(),
                font_weight,
                font_style: FontStyle::Normal,
                text_align: TextAlign::Center,
            }),
        )
    }

    /// Shape filled with the brand color
    pub fn shape(id: LayerId, shape: ShapeKind) -> Self {
        Self::new(
            id,
            Frame::new(35.0, 40.0, 30.0, 20.0),
            LayerKind::Shape {
                shape,
                color: HexColor::BRAND,
            },
        )
    }

    /// Uploaded image, centered at half the canvas size
    pub fn image(id: LayerId, src: ImagePayload) -> Self {
        Self::new(id, Frame::new(25.0, 25.0, 50.0, 50.0), LayerKind::Image { src })
    }

    /// Generated logo opened for editing, inset from the canvas edges
    pub fn placed_logo(id: LayerId, src: ImagePayload) -> Self {
        Self::new(id, Frame::new(10.0, 10.0, 80.0, 80.0), LayerKind::Image { src })
    }

    /// Flattened AI result covering the whole canvas
    pub fn full_canvas(id: LayerId, src: ImagePayload) -> Self {
        Self::new(id, Frame::FULL, LayerKind::Image { src })
    }

    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    pub fn with_frame(mut self, frame: Frame) -> Self {
        self.frame = frame;
        self
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, LayerKind::Text(_))
    }

    /// Image source, for image layers
    pub fn image_src(&self) -> Option<&ImagePayload> {
        match &self.kind {
            LayerKind::Image { src } => Some(src),
            _ => None,
        }
    }

    /// Smallest box a resize gesture may produce for this layer
    pub fn minimum_size(&self) -> MinimumSize {
        if self.is_text() {
            MinimumSize::TEXT
        } else {
            MinimumSize::GENERIC
        }
    }

    /// Merge a partial update into this layer
    ///
    /// Frame and z-index fields apply to every layer. Style fields apply only
    /// when they match this layer's variant and are otherwise ignored.
    pub fn apply(&mut self, patch: &LayerPatch) {
        let frame = &mut self.frame;
        if let Some(x) = patch.x {
            frame.x = x;
        }
        if let Some(y) = patch.y {
            frame.y = y;
        }
        if let Some(width) = patch.width {
            frame.width = width;
        }
        if let Some(height) = patch.height {
            frame.height = height;
        }
        if let Some(z_index) = patch.z_index {
            self.z_index = z_index;
        }

        match &mut self.kind {
            LayerKind::Text(style) => {
                if let Some(text) = &patch.text {
                    style.text = text.clone();
                }
                if let Some(color) = &patch.color {
                    style.color = color.clone();
                }
                if let Some(font_size) = patch.font_size {
                    style.font_size = font_size;
                }
                if let Some(font_family) = &patch.font_family {
                    style.font_family = font_family.clone();
                }
                if let Some(font_weight) = patch.font_weight {
                    style.font_weight = font_weight;
                }
                if let Some(font_style) = patch.font_style {
                    style.font_style = font_style;
                }
                if let Some(text_align) = patch.text_align {
                    style.text_align = text_align;
                }
            }
            LayerKind::Shape { shape, color } => {
                if let Some(kind) = patch.shape {
                    *shape = kind;
                }
                if let Some(new_color) = &patch.color {
                    *color = new_color.clone();
                }
            }
            LayerKind::Image { src } => {
                if let Some(new_src) = &patch.src {
                    *src = new_src.clone();
                }
            }
        }
    }
}

/// A partial layer update; `None` fields are left unchanged
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayerPatch {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub z_index: Option<i32>,
    pub text: Option<String>,
    pub color: Option<HexColor>,
    pub font_size: Option<f32>,
    pub font_family: Option<String>,
    pub font_weight: Option<FontWeight>,
    pub font_style: Option<FontStyle>,
    pub text_align: Option<TextAlign>,
    pub shape: Option<ShapeKind>,
    pub src: Option<ImagePayload>,
}

impl LayerPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole frame
    pub fn frame(mut self, frame: Frame) -> Self {
        self.x = Some(frame.x);
        self.y = Some(frame.y);
        self.width = Some(frame.width);
        self.height = Some(frame.height);
        self
    }

    /// Move without resizing
    pub fn position(mut self, x: f32, y: f32) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    pub fn z_index(mut self, z_index: i32) -> Self {
        self.z_index = Some(z_index);
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn color(mut self, color: HexColor) -> Self {
        self.color = Some(color);
        self
    }

    pub fn font_size(mut self, font_size: f32) -> Self {
        self.font_size = Some(font_size);
        self
    }

    pub fn font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = Some(family.into());
        self
    }

    pub fn font_weight(mut self, weight: FontWeight) -> Self {
        self.font_weight = Some(weight);
        self
    }

    pub fn font_style(mut self, style: FontStyle) -> Self {
        self.font_style = Some(style);
        self
    }

    pub fn text_align(mut self, align: TextAlign) -> Self {
        self.text_align = Some(align);
        self
    }

    pub fn shape(mut self, shape: ShapeKind) -> Self {
        self.shape = Some(shape);
        self
    }

    pub fn src(mut self, src: ImagePayload) -> Self {
        self.src = Some(src);
        self
    }
}
