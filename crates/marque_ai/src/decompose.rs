//! Image to layer decomposition
//!
//! The text model is asked for a JSON array of primitives. Each entry is
//! lenient: missing or unrecognized fields fall back to fixed defaults, and
//! entries that are neither text nor shape are dropped.

use marque_core::{
    Frame, FontStyle, FontWeight, HexColor, Layer, LayerId, LayerKind, ShapeKind, TextAlign, TextStyle,
    DEFAULT_FONT_FAMILY,
};
use serde_json::{json, Map, Value};

use crate::error::{BridgeError, Result};

const DEFAULT_X: f32 = 10.0;
const DEFAULT_Y: f32 = 10.0;
const DEFAULT_WIDTH: f32 = 20.0;
const DEFAULT_HEIGHT: f32 = 10.0;
const DEFAULT_FONT_SIZE: f32 = 16.0;

/// Response schema declared to the text model
pub fn response_schema() -> Value {
    let string = json!({ "type": "STRING" });
    let number = json!({ "type": "NUMBER" });
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "type": string,
                "x": number,
                "y": number,
                "width": number,
                "height": number,
                "color": string,
                "text": string,
                "fontSize": number,
                "fontFamily": string,
                "fontWeight": string,
                "fontStyle": string,
                "textAlign": string,
                "shape": string,
            }
        }
    })
}

/// Parse a decomposition reply into layers
///
/// Layer ids are `<kind>-<index>` placeholders; callers inserting into a
/// scene are expected to assign fresh ids. Z-indexes follow the reply order
/// starting at 1, so dropped entries leave gaps.
///
/// Only a reply that is not a JSON array fails. Entries that are not objects
/// are dropped, and a field of the wrong type reads as missing.
pub fn parse_layers(reply: &str) -> Result<Vec<Layer>> {
    let body = strip_json_fence(reply);
    let entries: Vec<Value> = serde_json::from_str(body)
        .map_err(|e| BridgeError::transient(format!("Invalid decomposition JSON: {}", e)))?;

    let total = entries.len();
    let layers: Vec<Layer> = entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| entry.as_object().and_then(|fields| component_layer(fields, index)))
        .collect();

    if layers.len() < total {
        tracing::warn!("Dropped {} malformed or unknown decomposition entries", total - layers.len());
    }
    tracing::debug!("Decomposed image into {} layers", layers.len());
    Ok(layers)
}

fn component_layer(fields: &Map<String, Value>, index: usize) -> Option<Layer> {
    let frame = Frame::new(
        number(fields, "x").unwrap_or(DEFAULT_X),
        number(fields, "y").unwrap_or(DEFAULT_Y),
        number(fields, "width").unwrap_or(DEFAULT_WIDTH),
        number(fields, "height").unwrap_or(DEFAULT_HEIGHT),
    );
    let color = color_or_black(string(fields, "color"));

    let kind = match string(fields, "type") {
        Some("text") => LayerKind::Text(TextStyle {
            text: string(fields, "text").unwrap_or_default().to_string(),
            color,
            font_size: number(fields, "fontSize")
                .filter(|size| *size > 0.0)
                .unwrap_or(DEFAULT_FONT_SIZE),
            font_family: string(fields, "fontFamily").unwrap_or(DEFAULT_FONT_FAMILY).to_string(),
            font_weight: keyword(string(fields, "fontWeight"), FontWeight::from_keyword),
            font_style: keyword(string(fields, "fontStyle"), FontStyle::from_keyword),
            text_align: keyword(string(fields, "textAlign"), TextAlign::from_keyword),
        }),
        Some("shape") => LayerKind::Shape {
            shape: keyword(string(fields, "shape"), ShapeKind::from_keyword),
            color,
        },
        _ => return None,
    };

    let id = LayerId::new(format!("{}-{}", kind.name(), index + 1));
    let z_index = i32::try_from(index + 1).unwrap_or(i32::MAX);
    Some(Layer::new(id, frame, kind).with_z_index(z_index))
}

fn number(fields: &Map<String, Value>, key: &str) -> Option<f32> {
    fields
        .get(key)
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite())
        .map(|v| v as f32)
}

fn string<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    fields.get(key).and_then(Value::as_str)
}

fn keyword<T: Default>(value: Option<&str>, parse: fn(&str) -> Option<T>) -> T {
    value.and_then(parse).unwrap_or_default()
}

fn color_or_black(value: Option<&str>) -> HexColor {
    value.and_then(|v| HexColor::parse(v).ok()).unwrap_or(HexColor::BLACK)
}

fn strip_json_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}
