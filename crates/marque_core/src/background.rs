//! Canvas background

use marque_image::ImagePayload;
use serde::{Deserialize, Serialize};

use crate::color::HexColor;

/// What the canvas shows beneath every layer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Background {
    Color(HexColor),
    Transparent,
    Image(ImagePayload),
}

impl Default for Background {
    fn default() -> Self {
        Background::Color(HexColor::WHITE)
    }
}

impl Background {
    pub fn is_transparent(&self) -> bool {
        matches!(self, Background::Transparent)
    }

    pub fn image(&self) -> Option<&ImagePayload> {
        match self {
            Background::Image(payload) => Some(payload),
            _ => None,
        }
    }
}

/// Remembers the last opaque background so the transparency toggle can
/// bring it back
#[derive(Clone, Debug, PartialEq)]
pub struct RestorePoint {
    saved: Background,
}

impl Default for RestorePoint {
    fn default() -> Self {
        Self {
            saved: Background::default(),
        }
    }
}

impl RestorePoint {
    pub fn new() -> Self {
        Self::default()
    }

    /// The background the next un-toggle will restore
    pub fn saved(&self) -> &Background {
        &self.saved
    }

    /// Record an opaque background; transparent ones are ignored
    pub fn remember(&mut self, background: &Background) {
        if !background.is_transparent() {
            self.saved = background.clone();
        }
    }

    /// Flip between transparent and the remembered background
    ///
    /// Returns the background the canvas should switch to.
    pub fn toggle(&mut self, current: &Background) -> Background {
        if current.is_transparent() {
            self.saved.clone()
        } else {
            self.saved = current.clone();
            Background::Transparent
        }
    }
}
