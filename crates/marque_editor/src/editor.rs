//! AI-mediated edit flows
//!
//! An [`Editor`] pairs a session with an [`AiBridge`]. Every flow holds the
//! processing gate for its whole duration and commits exactly once on
//! success. A failure at any step leaves the scene and history untouched.
//!
//! The session lock is only taken for short synchronous sections; scenes are
//! snapshotted before a request goes out and results are applied after it
//! returns.

use std::sync::Arc;

use marque_ai::{AiBridge, GenerativeBackend};
use marque_core::{LayerId, Scene};
use marque_image::ImagePayload;
use marque_prompt::CanvasMode;
use parking_lot::{Mutex, MutexGuard};

use crate::account::UserAccount;
use crate::error::{EditorError, Result};
use crate::export::{export_file_name, ExportFile, ExportKind, ExportPayload};
use crate::gate::ProcessingGate;
use crate::session::EditorSession;

/// Preset mockup scenes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MockupKind {
    BusinessCard,
    TShirt,
    Website,
}

impl MockupKind {
    pub const ALL: [MockupKind; 3] = [MockupKind::BusinessCard, MockupKind::TShirt, MockupKind::Website];

    /// Scene description sent with the logo
    pub fn prompt(&self) -> &'static str {
        match self {
            MockupKind::BusinessCard => "a business card",
            MockupKind::TShirt => "a black t-shirt",
            MockupKind::Website => "a modern website header",
        }
    }

    /// Short name used in progress labels
    pub fn tag(&self) -> &'static str {
        match self {
            MockupKind::BusinessCard => "card",
            MockupKind::TShirt => "tshirt",
            MockupKind::Website => "website",
        }
    }
}

/// An editor session wired to an AI backend
pub struct Editor<B> {
    session: Arc<Mutex<EditorSession>>,
    bridge: Arc<AiBridge<B>>,
    gate: ProcessingGate,
}

impl<B> Clone for Editor<B> {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
            bridge: Arc::clone(&self.bridge),
            gate: self.gate.clone(),
        }
    }
}

impl<B: GenerativeBackend> Editor<B> {
    pub fn new(bridge: AiBridge<B>, session: EditorSession) -> Self {
        Self::with_shared_bridge(Arc::new(bridge), session)
    }

    /// Share one bridge across several editors
    pub fn with_shared_bridge(bridge: Arc<AiBridge<B>>, session: EditorSession) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            bridge,
            gate: ProcessingGate::new(),
        }
    }

    /// Lock the session for synchronous edits
    ///
    /// Do not hold the guard across an `.await`.
    pub fn session(&self) -> MutexGuard<'_, EditorSession> {
        self.session.lock()
    }

    pub fn bridge(&self) -> &AiBridge<B> {
        &self.bridge
    }

    pub fn gate(&self) -> &ProcessingGate {
        &self.gate
    }

    pub fn is_processing(&self) -> bool {
        self.gate.is_busy()
    }

    /// Copy of the working scene
    pub fn snapshot(&self) -> Scene {
        self.session.lock().scene().clone()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Image layer flows
    // ─────────────────────────────────────────────────────────────────────────

    /// Cut out an image layer's subject and trim it to the content
    ///
    /// Both steps must succeed; a failed crop discards the removal. The
    /// removal only asks the backend for full transparency and the result
    /// is not inspected.
    pub async fn remove_layer_background(&self, id: &LayerId) -> Result<()> {
        let source = self.session.lock().image_source(id)?;
        let ticket = self.gate.begin("Removing background...")?;

        let removed = self.bridge.remove_background(&source).await?;
        ticket.relabel("Cropping result...");
        let cropped = self.bridge.auto_crop(&removed).await?;

        self.session
            .lock()
            .commit_layer_source(id, cropped, "Removed background from an image")
    }

    /// Trim an image layer to its visible content
    pub async fn crop_layer(&self, id: &LayerId) -> Result<()> {
        let source = self.session.lock().image_source(id)?;
        let _ticket = self.gate.begin("Auto-cropping image...")?;

        let cropped = self.bridge.auto_crop(&source).await?;
        self.session
            .lock()
            .commit_layer_source(id, cropped, "Cropped logo to content")
    }

    /// Replace an image layer with reconstructed text and shape layers
    pub async fn vectorize_layer(&self, id: &LayerId) -> Result<()> {
        let source = self.session.lock().image_source(id)?;
        let _ticket = self.gate.begin("Vectorizing logo...")?;

        let layers = self.bridge.vectorize_to_layers(&source).await?;
        tracing::debug!("Decomposed {} into {} layers", id, layers.len());
        self.session.lock().commit_decomposition(id, layers)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Whole-scene flows
    // ─────────────────────────────────────────────────────────────────────────

    /// Place the logo into a generated background scene
    pub async fn generate_ai_background(&self, prompt: &str) -> Result<()> {
        let prompt = required(prompt, "an AI background")?;
        let scene = self.snapshot();
        let _ticket = self.gate.begin("Generating background...")?;

        let logo = self.bridge.composite(&scene, CanvasMode::Transparent).await?;
        let result = self.bridge.generate_background(&logo, prompt).await?;
        self.session
            .lock()
            .commit_full_canvas(result, format!("Logo with AI background: {}", prompt));
        Ok(())
    }

    /// Apply a free-form change to the flattened logo
    pub async fn refine(&self, prompt: &str) -> Result<()> {
        let prompt = required(prompt, "refinement")?;
        let scene = self.snapshot();
        let _ticket = self.gate.begin("Applying effect...")?;

        let flattened = self.bridge.composite_to_image(&scene).await?;
        let result = self.bridge.refine(&flattened, prompt).await?;
        self.session.lock().commit_full_canvas(result, prompt);
        Ok(())
    }

    /// Re-render the flattened logo at high resolution
    pub async fn upscale(&self) -> Result<()> {
        let scene = self.snapshot();
        let _ticket = self.gate.begin("Exporting...")?;

        let flattened = self.bridge.composite_to_image(&scene).await?;
        let result = self.bridge.upscale(&flattened).await?;
        self.session.lock().commit_full_canvas(result, "Upscaled to HD");
        Ok(())
    }

    /// Render a preset mockup preview
    pub async fn mockup(&self, kind: MockupKind) -> Result<ImagePayload> {
        self.mockup_with(kind.prompt(), kind.tag()).await
    }

    /// Render a mockup preview from a custom scene description
    ///
    /// The preview is kept on the session; nothing is committed.
    pub async fn mockup_with(&self, prompt: &str, tag: &str) -> Result<ImagePayload> {
        let prompt = required(prompt, "a mockup")?;
        let scene = self.snapshot();
        let _ticket = self.gate.begin(format!("Generating {} mockup...", tag))?;
        self.session.lock().set_mockup(None);

        let logo = self.bridge.composite(&scene, CanvasMode::Transparent).await?;
        let mockup = self.bridge.generate_mockup(&logo, prompt).await?;
        self.session.lock().set_mockup(Some(mockup.clone()));
        Ok(mockup)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Export
    // ─────────────────────────────────────────────────────────────────────────

    /// Produce a downloadable file for the working scene
    pub async fn export(&self, kind: ExportKind, user: &UserAccount) -> Result<ExportFile> {
        if kind.requires_paid_plan() && user.plan.is_free() {
            return Err(EditorError::PlanRestricted("SVG export"));
        }
        let scene = self.snapshot();
        let _ticket = self.gate.begin("Exporting...")?;

        let payload = match kind {
            ExportKind::Png => ExportPayload::Image(self.bridge.composite_to_image(&scene).await?),
            ExportKind::TransparentPng => {
                ExportPayload::Image(self.bridge.composite(&scene, CanvasMode::Transparent).await?)
            }
            ExportKind::Svg => ExportPayload::Svg(self.bridge.vectorize(&scene).await?),
        };
        let file_name = export_file_name(&scene.prompt_metadata().name, kind.extension());
        tracing::info!("Exported {} as {}", kind, file_name);
        Ok(ExportFile { file_name, payload })
    }
}

fn required<'a>(prompt: &'a str, what: &'static str) -> Result<&'a str> {
    let trimmed = prompt.trim();
    if trimmed.is_empty() {
        return Err(EditorError::EmptyPrompt(what));
    }
    Ok(trimmed)
}
