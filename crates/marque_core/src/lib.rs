//! Marque Core
//!
//! The editable logo model shared by every Marque crate:
//!
//! - **Geometry**: drag and resize gestures in canvas pixels mapped onto
//!   percentage frames, with minimum-size clamps and text font scaling
//! - **Layers**: text, shape and image elements with a z-index
//! - **Scene**: layers plus a background, with add/update/delete/reorder
//! - **History**: linear undo/redo over committed scenes
//!
//! # Example
//!
//! ```rust
//! use marque_core::{FontWeight, GenerationParams, Layer, LayerId, Scene, ZOrder};
//!
//! let mut scene = Scene::new(GenerationParams::new("Aura"));
//! let id = LayerId::new("text-1");
//! scene.add_layer(Layer::text(id.clone(), "Aura", 48.0, FontWeight::Bold)).unwrap();
//! assert_eq!(scene.reorder(&id, ZOrder::Back).unwrap(), 0);
//! ```

pub mod background;
pub mod color;
pub mod error;
pub mod geometry;
pub mod history;
pub mod layer;
pub mod metadata;
pub mod scene;

pub use background::{Background, RestorePoint};
pub use color::HexColor;
pub use error::{GeometryError, Result, SceneError};
pub use geometry::{
    drag, resize, resize_text, Frame, GestureAnchor, MinimumSize, Point, Rect, ResizeHandle, ResizeOutcome, Size,
    MIN_FONT_SIZE,
};
pub use history::EditHistory;
pub use layer::{
    FontStyle, FontWeight, Layer, LayerId, LayerIdGenerator, LayerKind, LayerPatch, ShapeKind, TextAlign, TextStyle,
    DEFAULT_FONT_FAMILY,
};
pub use metadata::{non_blank, GenerationParams, LogoLayout};
pub use scene::{Scene, ZOrder};
