//! Marque Editor
//!
//! Interactive editing on top of the Marque scene model:
//!
//! - [`EditorSession`]: working scene, committed history, selection,
//!   transparency restore point and pointer gestures
//! - [`Editor`]: AI-mediated flows (background removal, cropping,
//!   vectorization, refinement, upscaling, AI backgrounds, mockups, export)
//!   serialized through a [`ProcessingGate`]
//! - [`LogoGenerator`]: the sequential four-concept batch, gated on the
//!   user's plan and persisted through an [`AssetStore`]
//!
//! # Example
//!
//! ```ignore
//! use marque_editor::{Editor, EditorSession, ExportKind};
//!
//! let session = EditorSession::open_image(params, variation);
//! let editor = Editor::new(bridge, session);
//! editor.remove_layer_background(&"image-1".into()).await?;
//! let file = editor.export(ExportKind::Png, &user).await?;
//! ```

pub mod account;
pub mod editor;
pub mod error;
pub mod export;
pub mod gate;
pub mod generate;
pub mod gesture;
pub mod session;

pub use account::{
    AccountLedger, AssetId, AssetStore, MemoryAssetStore, PlanGate, PlanTier, StoredAsset, UserAccount,
    FREE_GENERATION_LIMIT,
};
pub use editor::{Editor, MockupKind};
pub use error::{EditorError, Result};
pub use export::{export_file_name, ExportFile, ExportKind, ExportPayload};
pub use gate::{ProcessingGate, ProcessingTicket};
pub use generate::{GeneratedLogo, LogoGenerator};
pub use gesture::{Gesture, GestureKind, GestureStep, ListenerRegistry, PointerEventKind, Subscription};
pub use session::EditorSession;
