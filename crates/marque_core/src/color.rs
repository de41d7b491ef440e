//! Hex color strings

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SceneError;

/// A validated CSS hex color (`#RGB`, `#RRGGBB` or `#RRGGBBAA`)
///
/// The original spelling is preserved so it is echoed verbatim into
/// compiled instructions.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(Cow<'static, str>);

impl HexColor {
    pub const WHITE: HexColor = HexColor(Cow::Borrowed("#FFFFFF"));
    pub const BLACK: HexColor = HexColor(Cow::Borrowed("#000000"));
    /// Default fill for newly added shapes
    pub const BRAND: HexColor = HexColor(Cow::Borrowed("#6336E4"));

    /// Parse and validate a hex color string
    pub fn parse(value: &str) -> Result<Self, SceneError> {
        let value = value.trim();
        let digits = value
            .strip_prefix('#')
            .ok_or_else(|| SceneError::InvalidColor(value.to_string()))?;

        let valid_len = matches!(digits.len(), 3 | 6 | 8);
        if !valid_len || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(SceneError::InvalidColor(value.to_string()));
        }

        Ok(Self(Cow::Owned(value.to_string())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for HexColor {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for HexColor {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for HexColor {
    type Error = SceneError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.0.into_owned()
    }
}
