//! Marque Prompt Compiler
//!
//! Turns scenes and generation parameters into the natural-language
//! instructions the image model understands:
//!
//! - [`compile`]: a scene's canvas and layers, with the ordered image list
//! - [`Transform`]: single-image edits (background removal, crop, upscale, ...)
//! - [`logo_request`]: a new logo concept from brand parameters
//!
//! Everything here is deterministic and offline.

pub mod compiler;
pub mod logo;
pub mod transform;

pub use compiler::{compile, compile_with, CanvasMode, CompiledScene};
pub use logo::{logo_request, variations, LogoRequest, VARIATION_PROMPTS};
pub use transform::Transform;
