//! Gemini REST transport
//!
//! Speaks the `generateContent` endpoint directly over `reqwest`. Images are
//! sent as `inlineData` parts ahead of the text prompt, and image output is
//! requested through `responseModalities`.

use marque_image::ImagePayload;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::backend::{BackendReply, BackendRequest, Candidate, GenerativeBackend, OutputKind, Part};
use crate::config::BridgeConfig;
use crate::decompose;
use crate::error::{BridgeError, Result};

// ─────────────────────────────────────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<WireContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_modalities: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct WireContent {
    #[serde(default)]
    parts: Vec<WirePart>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePart {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(default)]
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<WireCandidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireCandidate {
    content: Option<WireContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Request / response mapping
// ─────────────────────────────────────────────────────────────────────────────

fn build_request(request: &BackendRequest) -> GenerateContentRequest {
    let mut parts: Vec<WirePart> = request
        .images
        .iter()
        .map(|image| WirePart {
            text: None,
            inline_data: Some(InlineData {
                mime_type: image.mime_type().to_string(),
                data: image.to_base64(),
            }),
        })
        .collect();
    parts.push(WirePart {
        text: Some(request.prompt.clone()),
        inline_data: None,
    });

    let generation_config = match request.output {
        OutputKind::Image => Some(GenerationConfig {
            response_modalities: Some(vec!["IMAGE"]),
            ..Default::default()
        }),
        OutputKind::Text => None,
        OutputKind::LayerJson => Some(GenerationConfig {
            response_mime_type: Some("application/json"),
            response_schema: Some(decompose::response_schema()),
            ..Default::default()
        }),
    };

    GenerateContentRequest {
        contents: vec![WireContent { parts }],
        generation_config,
    }
}

fn parse_reply(body: &str) -> Result<BackendReply> {
    let response: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| BridgeError::transient(format!("Unreadable response body: {}", e)))?;

    let block_reason = response.prompt_feedback.and_then(|feedback| feedback.block_reason);

    let candidates = response
        .candidates
        .into_iter()
        .map(|candidate| {
            let parts = candidate
                .content
                .map(|content| content.parts)
                .unwrap_or_default()
                .into_iter()
                .map(convert_part)
                .collect::<Result<Vec<_>>>()?
                .into_iter()
                .flatten()
                .collect();
            Ok(Candidate {
                finish_reason: candidate.finish_reason,
                parts,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(BackendReply {
        candidates,
        block_reason,
    })
}

fn convert_part(part: WirePart) -> Result<Option<Part>> {
    if let Some(inline) = part.inline_data {
        let mime = if inline.mime_type.is_empty() {
            marque_image::DEFAULT_MIME_TYPE
        } else {
            inline.mime_type.as_str()
        };
        let payload = ImagePayload::from_base64(&inline.data, mime)
            .map_err(|e| BridgeError::transient(format!("Undecodable inline image: {}", e)))?;
        return Ok(Some(Part::Image(payload)));
    }
    Ok(part.text.map(Part::Text))
}

fn classify_status(status: u16, body: &str) -> BridgeError {
    let detail = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error)
        .ok();

    let exhausted = detail
        .as_ref()
        .is_some_and(|error| error.status == "RESOURCE_EXHAUSTED");
    let message = detail
        .map(|error| error.message)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| format!("HTTP {}", status));

    if status == 429 || exhausted {
        BridgeError::QuotaExceeded(message)
    } else {
        BridgeError::transient(format!("HTTP {}: {}", status, message))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Backend
// ─────────────────────────────────────────────────────────────────────────────

/// [`GenerativeBackend`] backed by the Gemini REST API
#[derive(Debug, Clone)]
pub struct GeminiBackend {
    client: reqwest::Client,
    config: BridgeConfig,
}

impl GeminiBackend {
    pub fn new(config: BridgeConfig) -> Result<Self> {
        if !config.has_api_key() {
            return Err(BridgeError::transient("No API key configured"));
        }
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| BridgeError::transient(format!("HTTP client setup failed: {}", e)))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    fn model_for(&self, output: OutputKind) -> &str {
        match output {
            OutputKind::Image => &self.config.image_model,
            OutputKind::Text | OutputKind::LayerJson => &self.config.text_model,
        }
    }

    async fn send(&self, request: BackendRequest) -> Result<BackendReply> {
        let model = self.model_for(request.output);
        let url = self.config.endpoint(model);
        let body = build_request(&request);

        tracing::debug!(
            "POST {} ({} image(s), prompt {} chars)",
            url,
            request.images.len(),
            request.prompt.len()
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BridgeError::transient(format!("Request timed out after {}s", self.config.timeout_secs))
                } else {
                    BridgeError::transient(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| BridgeError::transient(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            let error = classify_status(status.as_u16(), &text);
            tracing::warn!("Gemini {} returned {}: {}", model, status, error);
            return Err(error);
        }

        parse_reply(&text)
    }
}

impl GenerativeBackend for GeminiBackend {
    fn generate(&self, request: BackendRequest) -> impl std::future::Future<Output = Result<BackendReply>> + Send {
        self.send(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMAGE_REPLY: &str = include_str!("../tests/fixtures/image_reply.json");
    const BLOCKED_REPLY: &str = include_str!("../tests/fixtures/blocked_reply.json");
    const QUOTA_ERROR: &str = include_str!("../tests/fixtures/quota_error.json");

    #[test]
    fn test_image_request_shape() {
        let image = ImagePayload::new(vec![1, 2, 3], "image/jpeg").unwrap();
        let request = BackendRequest::new("do it", OutputKind::Image).with_image(image);
        let json = serde_json::to_value(build_request(&request)).unwrap();

        let parts = &json["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(parts[0]["inlineData"]["data"], "AQID");
        assert_eq!(parts[1]["text"], "do it");
        assert_eq!(json["generationConfig"]["responseModalities"][0], "IMAGE");
    }

    #[test]
    fn test_json_request_declares_schema() {
        let request = BackendRequest::new("split", OutputKind::LayerJson);
        let json = serde_json::to_value(build_request(&request)).unwrap();
        assert_eq!(json["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(json["generationConfig"]["responseSchema"]["type"], "ARRAY");

        let text = serde_json::to_value(build_request(&BackendRequest::new("svg", OutputKind::Text))).unwrap();
        assert!(text.get("generationConfig").is_none());
    }

    #[test]
    fn test_parse_image_reply_keeps_mime() {
        let reply = parse_reply(IMAGE_REPLY).unwrap();
        assert_eq!(reply.block_reason, None);
        let candidate = &reply.candidates[0];
        assert_eq!(candidate.finish_reason.as_deref(), Some("STOP"));
        assert!(matches!(&candidate.parts[0], Part::Text(t) if t.starts_with("Here")));
        let Part::Image(image) = &candidate.parts[1] else {
            panic!("expected image part");
        };
        assert_eq!(image.mime_type(), "image/webp");
    }

    #[test]
    fn test_parse_decompose_reply() {
        let reply = parse_reply(include_str!("../tests/fixtures/decompose_reply.json")).unwrap();
        let Part::Text(json) = &reply.candidates[0].parts[0] else {
            panic!("expected text part");
        };
        let layers = decompose::parse_layers(json).unwrap();
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[1].id.as_str(), "text-2");
        assert_eq!(layers[1].frame.y, 55.0);
    }

    #[test]
    fn test_parse_blocked_reply() {
        let reply = parse_reply(BLOCKED_REPLY).unwrap();
        assert_eq!(reply.block_reason.as_deref(), Some("SAFETY"));
        assert!(reply.candidates.is_empty());
    }

    #[test]
    fn test_parse_garbage_is_transient() {
        assert!(matches!(parse_reply("<html>"), Err(BridgeError::TransientServiceError(_))));
    }

    #[test]
    fn test_status_classification() {
        assert!(matches!(classify_status(429, ""), BridgeError::QuotaExceeded(_)));
        match classify_status(400, QUOTA_ERROR) {
            BridgeError::QuotaExceeded(message) => assert!(message.contains("Quota")),
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(
            classify_status(503, "unavailable"),
            BridgeError::TransientServiceError(_)
        ));
    }

    #[test]
    fn test_missing_key_rejected() {
        assert!(GeminiBackend::new(BridgeConfig::default()).is_err());
    }
}
