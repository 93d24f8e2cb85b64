//! Text layout: measuring a string under a font request and centering it on a canvas.
//!
//! Measurement and rasterization are capabilities ([`FontMetrics`], [`Rasterizer`]) so the
//! compositor never depends on a particular rendering backend. Placement math is pure.

use crate::{
    foundation::{
        core::{DrawOrigin, FontStyle, LayoutSpec, Rgb8, TextExtent},
        error::CertResult,
    },
    render::surface::Surface,
};

/// Font-metric measurement of rendered text.
pub trait FontMetrics {
    /// Pixel extent of `text` rendered with `font`.
    ///
    /// Must be deterministic for identical inputs. Strikethrough and underline never change the
    /// result; bold and italic may, since they select another face.
    fn measure(&mut self, text: &str, font: &FontStyle) -> CertResult<TextExtent>;
}

/// Rasterization of text onto a premultiplied surface.
pub trait Rasterizer {
    /// Draw `text` with its box's top-left corner at `origin`, honoring bold, italic and
    /// underline. Strikethrough is drawn by the compositor, not here.
    fn draw_text(
        &mut self,
        surface: &mut Surface,
        text: &str,
        font: &FontStyle,
        origin: DrawOrigin,
        color: Rgb8,
    ) -> CertResult<()>;
}

/// A backend that can both measure and draw.
pub trait TextBackend: FontMetrics + Rasterizer {}

impl<T: FontMetrics + Rasterizer + ?Sized> TextBackend for T {}

/// Measured extent plus the draw origin derived from it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Extent returned by the backend.
    pub extent: TextExtent,
    /// Top-left of the text box.
    pub origin: DrawOrigin,
}

/// Measure `text` after validating the font request.
pub fn measure(
    metrics: &mut (impl FontMetrics + ?Sized),
    text: &str,
    font: &FontStyle,
) -> CertResult<TextExtent> {
    font.validate()?;
    metrics.measure(text, font)
}

/// Top-left origin that centers `extent` on the canvas, then applies the offsets.
///
/// `x = cw/2 - w/2 + offset_x`, `y = ch/2 - h/2 - offset_y`; each division truncates toward
/// zero. Positive `offset_y` moves the text up. The result is not clamped.
pub fn center(
    extent: TextExtent,
    canvas_width: u32,
    canvas_height: u32,
    offset_x: i32,
    offset_y: i32,
) -> DrawOrigin {
    let x = i64::from(canvas_width) / 2 - i64::from(extent.width) / 2 + i64::from(offset_x);
    let y = i64::from(canvas_height) / 2 - i64::from(extent.height) / 2 - i64::from(offset_y);
    DrawOrigin { x, y }
}

/// Measure and center `text` on a `canvas_width` x `canvas_height` canvas.
pub fn place(
    metrics: &mut (impl FontMetrics + ?Sized),
    text: &str,
    font: &FontStyle,
    canvas_width: u32,
    canvas_height: u32,
    layout: &LayoutSpec,
) -> CertResult<Placement> {
    let extent = measure(metrics, text, font)?;
    let origin = center(
        extent,
        canvas_width,
        canvas_height,
        layout.offset_x,
        layout.offset_y,
    );
    Ok(Placement { extent, origin })
}

#[cfg(test)]
#[path = "../../tests/unit/text/layout.rs"]
mod tests;
