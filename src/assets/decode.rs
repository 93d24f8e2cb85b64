use std::io::Cursor;

use crate::{
    foundation::error::{CertError, CertResult},
    render::{composite::premultiply_rgba8_in_place, surface::Surface},
};

/// Largest template side the CPU rasterizer accepts.
pub const MAX_TEMPLATE_SIDE: u32 = u16::MAX as u32;

/// Decode encoded image bytes into a fresh premultiplied RGBA8 surface.
pub fn decode_image(bytes: &[u8]) -> CertResult<Surface> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| CertError::template_load(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(CertError::template_load("template has zero area"));
    }
    if width > MAX_TEMPLATE_SIDE || height > MAX_TEMPLATE_SIDE {
        return Err(CertError::template_load(format!(
            "template {width}x{height} exceeds {MAX_TEMPLATE_SIDE} px per side"
        )));
    }

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Surface::from_premul(width, height, rgba8_premul)
}

/// Encode a straight-alpha RGBA image as PNG bytes.
pub fn encode_png(img: &image::RgbaImage) -> CertResult<Vec<u8>> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| CertError::render(format!("encode png: {e}")))?;
    Ok(buf)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
