//! Generative backend contract
//!
//! A backend turns one [`BackendRequest`] into the raw [`BackendReply`] the
//! service produced. Backends classify only transport-level failures (quota,
//! network, status, parse); interpreting the reply is left to the bridge so
//! the same validation applies to every backend.

use std::future::Future;

use marque_image::ImagePayload;

use crate::error::Result;

/// Shape of the reply a request asks for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OutputKind {
    /// An image, produced by the image model
    Image,
    /// Free text (SVG markup), produced by the text model
    Text,
    /// A JSON array of layer primitives matching the decomposition schema
    LayerJson,
}

/// One call to the generative service
#[derive(Clone, Debug, PartialEq)]
pub struct BackendRequest {
    pub prompt: String,
    /// Images sent before the prompt, in order
    pub images: Vec<ImagePayload>,
    pub output: OutputKind,
}

impl BackendRequest {
    pub fn new(prompt: impl Into<String>, output: OutputKind) -> Self {
        Self {
            prompt: prompt.into(),
            images: Vec::new(),
            output,
        }
    }

    pub fn with_images(mut self, images: Vec<ImagePayload>) -> Self {
        self.images = images;
        self
    }

    pub fn with_image(mut self, image: ImagePayload) -> Self {
        self.images.push(image);
        self
    }
}

/// One piece of candidate content
#[derive(Clone, Debug, PartialEq)]
pub enum Part {
    Text(String),
    Image(ImagePayload),
}

/// One generated alternative
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Candidate {
    /// Completion reason as reported by the service, e.g. `STOP` or `SAFETY`
    pub finish_reason: Option<String>,
    pub parts: Vec<Part>,
}

impl Candidate {
    /// A normally completed candidate
    pub fn stop(parts: Vec<Part>) -> Self {
        Self {
            finish_reason: Some(FINISH_STOP.to_string()),
            parts,
        }
    }

    pub fn finished(reason: impl Into<String>) -> Self {
        Self {
            finish_reason: Some(reason.into()),
            parts: Vec::new(),
        }
    }
}

/// The only finish reason treated as success
pub const FINISH_STOP: &str = "STOP";

/// Unvalidated service reply
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BackendReply {
    pub candidates: Vec<Candidate>,
    /// Set when the service refused the prompt outright
    pub block_reason: Option<String>,
}

impl BackendReply {
    pub fn single(candidate: Candidate) -> Self {
        Self {
            candidates: vec![candidate],
            block_reason: None,
        }
    }

    pub fn image(payload: ImagePayload) -> Self {
        Self::single(Candidate::stop(vec![Part::Image(payload)]))
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::single(Candidate::stop(vec![Part::Text(text.into())]))
    }

    pub fn blocked(reason: impl Into<String>) -> Self {
        Self {
            candidates: Vec::new(),
            block_reason: Some(reason.into()),
        }
    }
}

/// A multimodal generation service
pub trait GenerativeBackend: Send + Sync {
    /// Issue one request and return the raw reply
    ///
    /// Implementations must resolve every failure, including hangs, to an
    /// error: `QuotaExceeded` for rate limiting, `TransientServiceError`
    /// for everything else.
    fn generate(&self, request: BackendRequest) -> impl Future<Output = Result<BackendReply>> + Send;
}
