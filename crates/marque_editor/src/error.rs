//! Error types for marque_editor

use marque_ai::BridgeError;
use marque_core::{GeometryError, LayerId, SceneError};
use thiserror::Error;

/// Errors surfaced by editor operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    /// Another AI operation is still in flight
    #[error("Editor is busy: {0}")]
    Busy(String),

    /// No layer with this id in the working scene
    #[error("Layer not found: {0}")]
    LayerNotFound(LayerId),

    /// The operation needs an image layer
    #[error("Layer {0} is not an image layer")]
    NotAnImageLayer(LayerId),

    /// A required prompt was empty or whitespace
    #[error("A prompt is required for {0}")]
    EmptyPrompt(&'static str),

    /// The user's plan does not include this feature
    #[error("{0} requires a paid plan")]
    PlanRestricted(&'static str),

    /// A free user has used up their generations
    #[error("Generation limit of {limit} reached")]
    GenerationLimitReached { limit: u32 },

    /// The asset store refused a generated image
    #[error("Failed to persist asset: {0}")]
    Persistence(String),

    /// AI backend failure, unchanged
    #[error(transparent)]
    Bridge(#[from] BridgeError),

    /// Scene mutation rejected
    #[error(transparent)]
    Scene(SceneError),

    /// Gesture on an unusable canvas
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

impl From<SceneError> for EditorError {
    fn from(err: SceneError) -> Self {
        match err {
            SceneError::LayerNotFound(id) => EditorError::LayerNotFound(id),
            other => EditorError::Scene(other),
        }
    }
}

impl EditorError {
    /// Message suitable for showing to the end user
    pub fn user_message(&self) -> String {
        match self {
            EditorError::Bridge(err) => err.user_message().to_string(),
            EditorError::GenerationLimitReached { limit } => format!(
                "You've reached your generation limit of {}. Please upgrade for unlimited generations.",
                limit
            ),
            other => other.to_string(),
        }
    }
}

/// Result type for editor operations
pub type Result<T> = std::result::Result<T, EditorError>;
