//! Marque AI Bridge
//!
//! The contract between the editor and an external multimodal generation
//! service. A [`GenerativeBackend`] carries requests; the [`AiBridge`] shapes
//! them per operation and normalizes every reply into an image, SVG text,
//! a list of layers, or one [`BridgeError`].
//!
//! # Features
//!
//! - `gemini` (default): [`GeminiBackend`], a REST transport for the Gemini API
//! - `testing`: [`testing::ScriptedBackend`], a replaying backend for tests
//!
//! # Example
//!
//! ```ignore
//! use marque_ai::{AiBridge, BridgeConfig, GeminiBackend};
//!
//! let config = BridgeConfig::from_env().expect("GEMINI_API_KEY not set");
//! let bridge = AiBridge::new(GeminiBackend::new(config)?);
//! let svg = bridge.vectorize(&scene).await?;
//! ```

pub mod backend;
pub mod bridge;
pub mod config;
pub mod decompose;
pub mod error;
pub mod svg;

#[cfg(feature = "gemini")]
pub mod gemini;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use backend::{BackendReply, BackendRequest, Candidate, GenerativeBackend, OutputKind, Part};
pub use bridge::{validate, AiBridge};
pub use config::{api_key_from_env, BridgeConfig};
pub use error::{BridgeError, Result};
pub use svg::extract_svg;

#[cfg(feature = "gemini")]
pub use gemini::GeminiBackend;
