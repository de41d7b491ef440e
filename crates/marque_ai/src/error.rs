//! Error types for marque_ai

use thiserror::Error;

/// Normalized failure of a generative backend call
///
/// Every backend failure maps onto one of these. Callers decide on retries
/// and user-facing wording; the bridge itself never retries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// The backend returned no result candidate
    #[error("Backend returned no candidates")]
    EmptyResponse,

    /// Generation stopped for a reason other than normal completion
    #[error("Content blocked: {reason}")]
    ContentBlocked { reason: String },

    /// Generation completed but the expected image or text was absent
    #[error("Response carried no usable payload")]
    MissingPayload,

    /// Rate limit or quota exhausted
    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Vectorization reply did not contain SVG markup
    #[error("Malformed vector output")]
    MalformedVectorOutput,

    /// Transport, status or parse failure
    #[error("Transient service error: {0}")]
    TransientServiceError(String),
}

impl BridgeError {
    pub fn transient(message: impl Into<String>) -> Self {
        BridgeError::TransientServiceError(message.into())
    }

    /// Whether repeating the same request may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BridgeError::EmptyResponse
                | BridgeError::MissingPayload
                | BridgeError::MalformedVectorOutput
                | BridgeError::TransientServiceError(_)
        )
    }

    /// Whether the failure was a safety or policy block
    pub fn is_content_block(&self) -> bool {
        matches!(self, BridgeError::ContentBlocked { .. })
    }

    /// Message suitable for showing to the end user
    pub fn user_message(&self) -> &'static str {
        match self {
            BridgeError::ContentBlocked { .. } => {
                "The request was blocked by the AI's safety settings. Please modify your prompt."
            }
            BridgeError::QuotaExceeded(_) => {
                "The AI service quota has been reached. Please check your plan or billing details and try again later."
            }
            BridgeError::EmptyResponse => {
                "The AI returned an empty or invalid response. This can happen due to safety filters or an unclear prompt."
            }
            BridgeError::MissingPayload => "No image data found in the AI response. Please try again.",
            BridgeError::MalformedVectorOutput => "Failed to vectorize logo.",
            BridgeError::TransientServiceError(_) => "Failed to process image with AI.",
        }
    }
}

/// Result type for bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;
