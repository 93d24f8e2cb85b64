use std::collections::BTreeSet;

use crate::{
    foundation::{
        core::{DrawOrigin, FontStyle, Rgb8, TextExtent},
        error::{CertError, CertResult},
    },
    render::surface::Surface,
    text::layout::{FontMetrics, Rasterizer},
};

/// Deterministic fixed-width text backend.
///
/// Every character advances `size * 3 / 5` pixels (plus `size / 10` when bold) and the line box
/// is `size * 5 / 4` tall. Italic adds a `size / 5` overhang to the total width. Glyphs are drawn
/// as solid boxes, which makes pixel assertions exact without any font files.
#[derive(Clone, Debug, Default)]
pub struct FixedWidthFont {
    families: Option<BTreeSet<String>>,
}

impl FixedWidthFont {
    /// Backend that accepts any family name.
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that only resolves the listed families and reports every other one as
    /// unavailable.
    pub fn only<I, S>(families: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            families: Some(families.into_iter().map(Into::into).collect()),
        }
    }

    /// Horizontal advance of one character.
    pub fn advance(font: &FontStyle) -> u32 {
        let base = (font.size * 3 / 5).max(1);
        if font.bold { base + font.size / 10 } else { base }
    }

    /// Line box height.
    pub fn line_height(font: &FontStyle) -> u32 {
        (font.size * 5 / 4).max(1)
    }

    fn check_family(&self, font: &FontStyle) -> CertResult<()> {
        match &self.families {
            Some(known) if !known.contains(&font.family) => {
                Err(CertError::font_unavailable(font.family.clone()))
            }
            _ => Ok(()),
        }
    }
}

impl FontMetrics for FixedWidthFont {
    fn measure(&mut self, text: &str, font: &FontStyle) -> CertResult<TextExtent> {
        self.check_family(font)?;
        let chars = text.chars().count() as u32;
        let mut width = chars * Self::advance(font);
        if font.italic && chars > 0 {
            width += font.size / 5;
        }
        Ok(TextExtent {
            width,
            height: Self::line_height(font),
        })
    }
}

impl Rasterizer for FixedWidthFont {
    fn draw_text(
        &mut self,
        surface: &mut Surface,
        text: &str,
        font: &FontStyle,
        origin: DrawOrigin,
        color: Rgb8,
    ) -> CertResult<()> {
        self.check_family(font)?;
        let advance = Self::advance(font);
        let height = Self::line_height(font);
        let glyph_top = origin.y + i64::from(height / 5);
        let glyph_height = height - height / 5 - height / 5;

        for (i, ch) in text.chars().enumerate() {
            if ch.is_whitespace() {
                continue;
            }
            let left = origin.x + i64::from(advance) * i as i64;
            surface.fill_rect(
                left + 1,
                glyph_top,
                advance.saturating_sub(2),
                glyph_height,
                color,
            );
        }

        if font.underline {
            let chars = text.chars().count() as u32;
            let thickness = (font.size / 20).max(1);
            let y = origin.y + i64::from(height) - i64::from(height / 5) / 2;
            surface.fill_rect(origin.x, y, chars * advance, thickness, color);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/fixed.rs"]
mod tests;
