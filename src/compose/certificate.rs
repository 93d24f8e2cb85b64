use std::path::{Path, PathBuf};

use crate::{
    assets::decode::{decode_image, encode_png},
    foundation::{
        core::{FontStyle, LayoutSpec},
        error::{CertError, CertResult},
    },
    render::surface::Surface,
    text::layout::{Placement, TextBackend, place},
};

/// Thickness of the strikethrough rule in pixels.
pub const STRIKE_THICKNESS: u32 = 2;

/// Text rendered by [`compose_preview`].
pub const PREVIEW_TEXT: &str = "Sample text";

/// Template image on disk. Every [`Template::decode`] call reads and decodes the file into a
/// fresh surface; the file itself is never written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Template {
    path: PathBuf,
}

impl Template {
    /// Template backed by the image at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the template image.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and decode the template into a new premultiplied surface.
    pub fn decode(&self) -> CertResult<Surface> {
        let bytes = std::fs::read(&self.path).map_err(|e| {
            CertError::template_load(format!("read '{}': {e}", self.path.display()))
        })?;
        decode_image(&bytes)
    }

    /// Pixel dimensions from the image header, without decoding pixels.
    pub fn dimensions(&self) -> CertResult<(u32, u32)> {
        image::image_dimensions(&self.path).map_err(|e| {
            CertError::template_load(format!("probe '{}': {e}", self.path.display()))
        })
    }
}

/// One composed certificate, tagged with the name stamped on it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    name: String,
    image: image::RgbaImage,
}

impl Artifact {
    /// Name rendered onto the certificate.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Straight-alpha RGBA pixels.
    pub fn image(&self) -> &image::RgbaImage {
        &self.image
    }

    /// PNG encoding of the artifact.
    pub fn to_png(&self) -> CertResult<Vec<u8>> {
        encode_png(&self.image)
    }
}

/// Axis-aligned rectangle in canvas pixels, possibly outside the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rule {
    /// Left edge.
    pub x: i64,
    /// Top edge.
    pub y: i64,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Strikethrough rule for a placed string: the measured width, centered on the box's vertical
/// midpoint (rows `mid - 1` and `mid`).
pub fn strikethrough_rule(placement: Placement) -> Rule {
    let mid = placement.origin.y + i64::from(placement.extent.height / 2);
    Rule {
        x: placement.origin.x,
        y: mid - i64::from(STRIKE_THICKNESS / 2),
        width: placement.extent.width,
        height: STRIKE_THICKNESS,
    }
}

/// Stamp `name` onto a fresh copy of `template`.
///
/// Fails with [`CertError::TemplateLoad`] when the template cannot be read or decoded and with
/// [`CertError::FontUnavailable`] when the backend cannot resolve the family. Identical inputs
/// produce pixel-identical artifacts.
#[tracing::instrument(
    level = "debug",
    skip(backend, template, font, layout),
    fields(template = %template.path().display(), family = %font.family, size = font.size)
)]
pub fn compose(
    backend: &mut (impl TextBackend + ?Sized),
    template: &Template,
    name: &str,
    font: &FontStyle,
    layout: &LayoutSpec,
) -> CertResult<Artifact> {
    let mut surface = template.decode()?;
    let placement = place(
        &mut *backend,
        name,
        font,
        surface.width(),
        surface.height(),
        layout,
    )?;
    tracing::debug!(
        x = placement.origin.x,
        y = placement.origin.y,
        width = placement.extent.width,
        height = placement.extent.height,
        "placed name"
    );

    backend.draw_text(&mut surface, name, font, placement.origin, layout.color)?;

    if font.strikethrough {
        let rule = strikethrough_rule(placement);
        surface.fill_rect(rule.x, rule.y, rule.width, rule.height, layout.color);
    }

    Ok(Artifact {
        name: name.to_string(),
        image: surface.to_rgba_image()?,
    })
}

/// Compose [`PREVIEW_TEXT`] onto the template, for checking placement before a batch.
pub fn compose_preview(
    backend: &mut (impl TextBackend + ?Sized),
    template: &Template,
    font: &FontStyle,
    layout: &LayoutSpec,
) -> CertResult<Artifact> {
    compose(backend, template, PREVIEW_TEXT, font, layout)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/certificate.rs"]
mod tests;
