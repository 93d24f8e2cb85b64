use std::str::FromStr;

use crate::foundation::error::{CertError, CertResult};

/// Straight (non-premultiplied) RGB color, one byte per channel.
///
/// Deserializes from either `[r, g, b]` or a `"#rrggbb"` string; serializes as `[r, g, b]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Rgb8Repr", into = "[u8; 3]")]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Opaque black, the default text color.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Construct a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Lowercase `#rrggbb` form.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb8 {
    type Err = CertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(CertError::configuration(format!(
                "invalid color '{s}', expected #rrggbb"
            )));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|e| CertError::configuration(format!("invalid color '{s}': {e}")))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl std::fmt::Display for Rgb8 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum Rgb8Repr {
    Triple([u8; 3]),
    Hex(String),
}

impl TryFrom<Rgb8Repr> for Rgb8 {
    type Error = CertError;

    fn try_from(value: Rgb8Repr) -> Result<Self, Self::Error> {
        match value {
            Rgb8Repr::Triple([r, g, b]) => Ok(Self::new(r, g, b)),
            Rgb8Repr::Hex(s) => s.parse(),
        }
    }
}

impl From<Rgb8> for [u8; 3] {
    fn from(c: Rgb8) -> Self {
        [c.r, c.g, c.b]
    }
}

/// Font request: family, point size and style flags.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FontStyle {
    /// Family name, or one of the generic names `serif`, `sans-serif`, `monospace`.
    pub family: String,
    /// Point size, used directly as the pixel size.
    pub size: u32,
    /// Select a bold face.
    #[serde(default)]
    pub bold: bool,
    /// Select an italic face.
    #[serde(default)]
    pub italic: bool,
    /// Draw the font's underline decoration.
    #[serde(default)]
    pub underline: bool,
    /// Draw a 2 px rule through the middle of the text box.
    #[serde(default)]
    pub strikethrough: bool,
}

impl FontStyle {
    /// Size used when no template height is known.
    pub const FALLBACK_SIZE: u32 = 200;

    /// Plain style for `family` at `size`.
    pub fn new(family: impl Into<String>, size: u32) -> Self {
        Self {
            family: family.into(),
            size,
            bold: false,
            italic: false,
            underline: false,
            strikethrough: false,
        }
    }

    /// Default point size for a template of the given height: one seventh of it, at least 1.
    pub fn default_size_for(template_height: Option<u32>) -> u32 {
        match template_height {
            Some(h) => (h / 7).max(1),
            None => Self::FALLBACK_SIZE,
        }
    }

    /// Reject sizes below 1 and empty family names.
    pub fn validate(&self) -> CertResult<()> {
        if self.size == 0 {
            return Err(CertError::configuration("font size must be >= 1"));
        }
        if self.family.trim().is_empty() {
            return Err(CertError::configuration("font family must be non-empty"));
        }
        Ok(())
    }
}

/// Placement of the name relative to the template center, plus its color.
///
/// Offsets are never clamped: text placed partly or fully outside the canvas is a valid result.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutSpec {
    /// Horizontal offset from center, positive moves right.
    #[serde(default)]
    pub offset_x: i32,
    /// Vertical offset from center, positive moves up.
    #[serde(default)]
    pub offset_y: i32,
    /// Text color.
    #[serde(default)]
    pub color: Rgb8,
}

/// Pixel extent of a rendered string.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TextExtent {
    /// Advance width in pixels.
    pub width: u32,
    /// Line box height in pixels.
    pub height: u32,
}

/// Top-left corner of the text box in canvas pixels. May lie outside the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DrawOrigin {
    /// Column of the left edge.
    pub x: i64,
    /// Row of the top edge.
    pub y: i64,
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
