//! Image payload storage and data URI codec

use std::fmt;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use base64::Engine;
use image::{ImageFormat, ImageReader};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{PayloadError, Result};

/// Mime type assumed when a data URI omits one
pub const DEFAULT_MIME_TYPE: &str = "image/png";

/// Encoded image bytes together with their mime type
///
/// The bytes are never decoded or re-encoded by this type, so whatever the
/// producer handed over (PNG, JPEG, WebP) is preserved byte-for-byte through
/// every transform.
#[derive(Clone, PartialEq, Eq)]
pub struct ImagePayload {
    bytes: Arc<[u8]>,
    mime_type: Arc<str>,
}

impl ImagePayload {
    /// Create a payload from raw bytes and an explicit mime type
    pub fn new(bytes: impl Into<Vec<u8>>, mime_type: impl AsRef<str>) -> Result<Self> {
        let mime_type = normalize_mime(mime_type.as_ref())?;
        Ok(Self {
            bytes: Arc::from(bytes.into()),
            mime_type: Arc::from(mime_type),
        })
    }

    /// Create a payload from raw bytes, sniffing the mime type from the header
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let bytes = bytes.into();
        let format = image::guess_format(&bytes)?;
        Self::new(bytes, format.to_mime_type())
    }

    /// Read a payload from disk, sniffing the mime type from the header
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        tracing::debug!("Loaded image payload from {} ({} bytes)", path.display(), bytes.len());
        Self::from_bytes(bytes)
    }

    /// Decode a bare base64 body with a known mime type
    pub fn from_base64(data: &str, mime_type: impl AsRef<str>) -> Result<Self> {
        let bytes = base64::engine::general_purpose::STANDARD.decode(data.trim())?;
        Self::new(bytes, mime_type)
    }

    /// Decode a `data:<mime>;base64,<body>` URI
    ///
    /// A URI with an empty mime segment (`data:;base64,...`) falls back to
    /// [`DEFAULT_MIME_TYPE`].
    pub fn from_data_uri(uri: &str) -> Result<Self> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| PayloadError::InvalidDataUri("missing `data:` scheme".to_string()))?;

        let marker = rest
            .find(";base64,")
            .ok_or_else(|| PayloadError::InvalidDataUri("missing `;base64,` marker".to_string()))?;

        let mime = &rest[..marker];
        let body = &rest[marker + ";base64,".len()..];
        if body.is_empty() {
            return Err(PayloadError::InvalidDataUri("empty body".to_string()));
        }

        let mime = if mime.is_empty() { DEFAULT_MIME_TYPE } else { mime };
        Self::from_base64(body, mime)
    }

    /// Get the encoded bytes
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Get the mime type, e.g. `image/png`
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Get the number of encoded bytes
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    /// Encode the bytes as standard base64 (no data URI header)
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }

    /// Encode as a `data:` URI suitable for display or JSON transport
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }

    /// Probe the image header for its pixel dimensions without decoding
    pub fn dimensions(&self) -> Result<(u32, u32)> {
        let reader = ImageReader::new(Cursor::new(self.bytes())).with_guessed_format()?;
        Ok(reader.into_dimensions()?)
    }

    /// Preferred file extension for this payload's mime type
    pub fn extension(&self) -> &'static str {
        ImageFormat::from_mime_type(self.mime_type())
            .and_then(|format| format.extensions_str().first().copied())
            .unwrap_or("png")
    }
}

fn normalize_mime(mime: &str) -> Result<String> {
    let mime = mime.trim().to_ascii_lowercase();
    if !mime.starts_with("image/") || mime.len() == "image/".len() {
        return Err(PayloadError::UnsupportedMime(mime));
    }
    Ok(mime)
}

impl fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImagePayload")
            .field("mime_type", &self.mime_type)
            .field("byte_len", &self.bytes.len())
            .finish()
    }
}

impl Serialize for ImagePayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_data_uri())
    }
}

impl<'de> Deserialize<'de> for ImagePayload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let uri = String::deserialize(deserializer)?;
        Self::from_data_uri(&uri).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1x1 red PNG
    const PNG_BASE64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8DwHwAFBQIAX8jx0gAAAABJRU5ErkJggg==";

    #[test]
    fn test_data_uri_roundtrip_preserves_mime() {
        let uri = format!("data:image/png;base64,{}", PNG_BASE64);
        let payload = ImagePayload::from_data_uri(&uri).unwrap();
        assert_eq!(payload.mime_type(), "image/png");
        assert_eq!(payload.to_data_uri(), uri);
    }

    #[test]
    fn test_data_uri_defaults_mime() {
        let uri = format!("data:;base64,{}", PNG_BASE64);
        let payload = ImagePayload::from_data_uri(&uri).unwrap();
        assert_eq!(payload.mime_type(), DEFAULT_MIME_TYPE);
    }

    #[test]
    fn test_rejects_non_image_mime() {
        let uri = format!("data:text/plain;base64,{}", PNG_BASE64);
        assert!(matches!(
            ImagePayload::from_data_uri(&uri),
            Err(PayloadError::UnsupportedMime(_))
        ));
    }

    #[test]
    fn test_rejects_malformed_uri() {
        assert!(ImagePayload::from_data_uri("not a uri").is_err());
        assert!(ImagePayload::from_data_uri("data:image/png,abc").is_err());
        assert!(ImagePayload::from_data_uri("data:image/png;base64,").is_err());
    }

    #[test]
    fn test_sniff_and_dimensions() {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(PNG_BASE64)
            .unwrap();
        let payload = ImagePayload::from_bytes(bytes).unwrap();
        assert_eq!(payload.mime_type(), "image/png");
        assert_eq!(payload.dimensions().unwrap(), (1, 1));
        assert_eq!(payload.extension(), "png");
    }

    #[test]
    fn test_serde_as_data_uri() {
        let payload = ImagePayload::from_base64(PNG_BASE64, "image/png").unwrap();
        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.starts_with("\"data:image/png;base64,"));
        let back: ImagePayload = serde_json::from_str(&json).unwrap();
        assert_eq!(back, payload);
    }
}
