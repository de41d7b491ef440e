//! Scene and geometry error types

use thiserror::Error;

use crate::layer::LayerId;

/// Errors raised by scene mutations
///
/// These indicate a caller bug (stale id, bad input) rather than a runtime
/// condition the editor is expected to recover from.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// No layer with this id exists in the scene
    #[error("Layer not found: {0}")]
    LayerNotFound(LayerId),

    /// A layer with this id already exists in the scene
    #[error("Duplicate layer id: {0}")]
    DuplicateLayerId(LayerId),

    /// The string is not a `#RGB`/`#RRGGBB`/`#RRGGBBAA` color
    #[error("Invalid hex color: {0:?}")]
    InvalidColor(String),

    /// A resize handle name outside `nw,n,ne,w,e,sw,s,se`
    #[error("Unknown resize handle: {0:?}")]
    UnknownHandle(String),

    /// Moving the layer above or below the rest would leave the `i32` range
    #[error("Z-index out of range for layer {0}")]
    ZIndexOutOfRange(LayerId),
}

/// Errors raised by the geometry engine
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum GeometryError {
    /// The canvas has a zero, negative or non-finite dimension
    #[error("Degenerate canvas: {width}x{height}")]
    DegenerateCanvas { width: f32, height: f32 },
}

/// Result type for scene operations
pub type Result<T> = std::result::Result<T, SceneError>;
