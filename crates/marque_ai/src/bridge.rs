//! AI bridge
//!
//! [`AiBridge`] shapes requests for each editing operation, sends them
//! through a [`GenerativeBackend`], and validates the reply:
//!
//! 1. a prompt-level block reason → `ContentBlocked`
//! 2. no candidate → `EmptyResponse`
//! 3. finish reason other than `STOP` → `ContentBlocked`
//! 4. no image (or text) in the candidate → `MissingPayload`
//!
//! Composite operations render the scene first, then transform the
//! rendered image. Errors from either step propagate unchanged.

use marque_core::{GenerationParams, Layer, Scene};
use marque_image::ImagePayload;
use marque_prompt::{compile_with, logo_request, CanvasMode, Transform};

use crate::backend::{BackendReply, BackendRequest, Candidate, GenerativeBackend, OutputKind, Part, FINISH_STOP};
use crate::decompose;
use crate::error::{BridgeError, Result};
use crate::svg;

/// Editing operations over a generative backend
#[derive(Debug, Clone)]
pub struct AiBridge<B> {
    backend: B,
}

impl<B: GenerativeBackend> AiBridge<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Scene operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Flatten a scene into one image over its own background
    pub async fn composite_to_image(&self, scene: &Scene) -> Result<ImagePayload> {
        self.composite(scene, CanvasMode::SceneBackground).await
    }

    /// Flatten a scene, optionally forcing a transparent canvas
    pub async fn composite(&self, scene: &Scene, mode: CanvasMode) -> Result<ImagePayload> {
        let compiled = compile_with(scene, mode);
        let request = BackendRequest::new(compiled.prompt(), OutputKind::Image).with_images(compiled.images);
        self.request_image(request).await
    }

    /// Flatten a scene and convert the result to SVG markup
    pub async fn vectorize(&self, scene: &Scene) -> Result<String> {
        let flattened = self.composite_to_image(scene).await?;
        self.vectorize_image(&flattened).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Image operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Cut the subject out of an image
    ///
    /// Full transparency is asked for in the instruction; the returned
    /// pixels are not checked.
    pub async fn remove_background(&self, image: &ImagePayload) -> Result<ImagePayload> {
        self.transform_image(&Transform::RemoveBackground, image).await
    }

    /// Trim an image to its non-transparent content
    pub async fn auto_crop(&self, image: &ImagePayload) -> Result<ImagePayload> {
        self.transform_image(&Transform::AutoCrop, image).await
    }

    pub async fn upscale(&self, image: &ImagePayload) -> Result<ImagePayload> {
        self.transform_image(&Transform::Upscale, image).await
    }

    pub async fn refine(&self, image: &ImagePayload, instruction: &str) -> Result<ImagePayload> {
        self.transform_image(&Transform::Refine(instruction.to_string()), image)
            .await
    }

    pub async fn generate_mockup(&self, image: &ImagePayload, instruction: &str) -> Result<ImagePayload> {
        self.transform_image(&Transform::Mockup(instruction.to_string()), image)
            .await
    }

    pub async fn generate_background(&self, image: &ImagePayload, instruction: &str) -> Result<ImagePayload> {
        self.transform_image(&Transform::Background(instruction.to_string()), image)
            .await
    }

    /// Convert a raster image to SVG markup
    pub async fn vectorize_image(&self, image: &ImagePayload) -> Result<String> {
        let request = BackendRequest::new(Transform::Vectorize.instruction(), OutputKind::Text).with_image(image.clone());
        let reply = self.request_text(request).await?;
        svg::extract_svg(&reply)
    }

    /// Decompose a raster image into text and shape layers
    pub async fn vectorize_to_layers(&self, image: &ImagePayload) -> Result<Vec<Layer>> {
        let request =
            BackendRequest::new(Transform::Decompose.instruction(), OutputKind::LayerJson).with_image(image.clone());
        let reply = self.request_text(request).await?;
        decompose::parse_layers(&reply)
    }

    /// Generate one logo concept
    pub async fn generate_logo(&self, params: &GenerationParams) -> Result<ImagePayload> {
        let logo = logo_request(params);
        let request = BackendRequest::new(logo.prompt, OutputKind::Image).with_images(logo.images);
        self.request_image(request).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Request plumbing
    // ─────────────────────────────────────────────────────────────────────────

    async fn transform_image(&self, transform: &Transform, image: &ImagePayload) -> Result<ImagePayload> {
        tracing::debug!(
            "Transform {} on {} ({} bytes)",
            transform,
            image.mime_type(),
            image.byte_len()
        );
        let request = BackendRequest::new(transform.instruction(), OutputKind::Image).with_image(image.clone());
        self.request_image(request).await
    }

    async fn request_image(&self, request: BackendRequest) -> Result<ImagePayload> {
        let candidate = self.request_candidate(request).await?;
        let image = candidate
            .parts
            .into_iter()
            .find_map(|part| match part {
                Part::Image(image) => Some(image),
                Part::Text(_) => None,
            })
            .ok_or(BridgeError::MissingPayload)?;
        tracing::debug!("Received {} ({} bytes)", image.mime_type(), image.byte_len());
        Ok(image)
    }

    async fn request_text(&self, request: BackendRequest) -> Result<String> {
        let candidate = self.request_candidate(request).await?;
        let text: String = candidate
            .parts
            .into_iter()
            .filter_map(|part| match part {
                Part::Text(text) => Some(text),
                Part::Image(_) => None,
            })
            .collect();
        if text.trim().is_empty() {
            return Err(BridgeError::MissingPayload);
        }
        Ok(text)
    }

    async fn request_candidate(&self, request: BackendRequest) -> Result<Candidate> {
        let reply = self.backend.generate(request).await?;
        validate(reply)
    }
}

/// Apply the reply contract shared by every backend
pub fn validate(reply: BackendReply) -> Result<Candidate> {
    if let Some(reason) = reply.block_reason {
        tracing::warn!("Prompt blocked: {}", reason);
        return Err(BridgeError::ContentBlocked { reason });
    }

    let candidate = reply
        .candidates
        .into_iter()
        .next()
        .ok_or(BridgeError::EmptyResponse)?;

    match candidate.finish_reason.as_deref() {
        None | Some(FINISH_STOP) => Ok(candidate),
        Some(reason) => {
            tracing::warn!("Generation finished with reason {}", reason);
            Err(BridgeError::ContentBlocked {
                reason: reason.to_string(),
            })
        }
    }
}
