//! Image payloads for Marque
//!
//! Every image that crosses the AI boundary, sits in an image layer or is
//! used as a background is an [`ImagePayload`]: the encoded bytes plus the
//! mime type that describes them. Payloads are cheap to clone and serialize
//! as `data:` URIs so scenes round-trip through JSON unchanged.
//!
//! # Example
//!
//! ```ignore
//! use marque_image::ImagePayload;
//!
//! let logo = ImagePayload::from_file("logo.png")?;
//! assert_eq!(logo.mime_type(), "image/png");
//! let uri = logo.to_data_uri();
//! ```

mod error;
mod payload;

pub use error::{PayloadError, Result};
pub use payload::{ImagePayload, DEFAULT_MIME_TYPE};
