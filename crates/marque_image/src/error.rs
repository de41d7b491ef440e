//! Image payload error types

use thiserror::Error;

/// Errors that can occur when building or decoding an image payload
#[derive(Error, Debug)]
pub enum PayloadError {
    /// IO error when reading a file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The base64 body could not be decoded
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The string is not a `data:<mime>;base64,<body>` URI
    #[error("Invalid data URI: {0}")]
    InvalidDataUri(String),

    /// The mime type does not describe an image
    #[error("Unsupported mime type: {0}")]
    UnsupportedMime(String),

    /// The bytes are not a recognisable image
    #[error("Image probe failed: {0}")]
    Probe(#[from] image::ImageError),
}

/// Result type for payload operations
pub type Result<T> = std::result::Result<T, PayloadError>;
