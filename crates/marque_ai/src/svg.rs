//! SVG extraction from model replies

use crate::error::{BridgeError, Result};

const OPEN: &str = "<svg";
const CLOSE: &str = "</svg>";

/// Pull SVG markup out of a text reply
///
/// Returns the span from the first `<svg` through the first `</svg>` after
/// it. Without such a span, code fences are stripped and the trimmed text
/// must itself start with `<svg`.
pub fn extract_svg(reply: &str) -> Result<String> {
    if let Some(start) = reply.find(OPEN) {
        if let Some(end) = reply[start..].find(CLOSE) {
            return Ok(reply[start..start + end + CLOSE.len()].to_string());
        }
    }

    let stripped = reply.replace("```svg", "").replace("```", "");
    let stripped = stripped.trim();
    if stripped.starts_with(OPEN) {
        Ok(stripped.to_string())
    } else {
        tracing::warn!("Vectorize reply had no SVG markup ({} chars)", reply.len());
        Err(BridgeError::MalformedVectorOutput)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_from_prose_and_fences() {
        let reply = "Here you go:\n```svg\n<svg viewBox=\"0 0 10 10\"><rect/></svg>\n```\nEnjoy!";
        assert_eq!(extract_svg(reply).unwrap(), "<svg viewBox=\"0 0 10 10\"><rect/></svg>");
    }

    #[test]
    fn test_stops_at_first_close() {
        let reply = "<svg a></svg> trailing <svg b></svg>";
        assert_eq!(extract_svg(reply).unwrap(), "<svg a></svg>");
    }

    #[test]
    fn test_unterminated_svg_falls_back_to_fence_strip() {
        let reply = "```svg\n<svg width=\"1\">\n```";
        assert_eq!(extract_svg(reply).unwrap(), "<svg width=\"1\">");
    }

    #[test]
    fn test_no_svg_is_malformed() {
        assert_eq!(extract_svg("I cannot do that."), Err(BridgeError::MalformedVectorOutput));
        assert_eq!(extract_svg(""), Err(BridgeError::MalformedVectorOutput));
    }
}
