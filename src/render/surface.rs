use crate::{
    foundation::{
        core::Rgb8,
        error::{CertError, CertResult},
    },
    render::composite,
};

/// Owned premultiplied RGBA8 pixel buffer, row-major and tightly packed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Surface {
    /// Fully transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }

    /// Wrap existing premultiplied bytes, checking the length against the dimensions.
    pub fn from_premul(width: u32, height: u32, data: Vec<u8>) -> CertResult<Self> {
        if data.len() != width as usize * height as usize * 4 {
            return Err(CertError::render("surface byte length mismatch"));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Premultiplied pixel bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable premultiplied pixel bytes.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Premultiplied pixel at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Fill an axis-aligned rectangle with an opaque color. Parts outside the surface are
    /// dropped; a rectangle entirely outside is a no-op.
    pub fn fill_rect(&mut self, x: i64, y: i64, width: u32, height: u32, color: Rgb8) {
        let x0 = x.clamp(0, i64::from(self.width));
        let y0 = y.clamp(0, i64::from(self.height));
        let x1 = (x + i64::from(width)).clamp(0, i64::from(self.width));
        let y1 = (y + i64::from(height)).clamp(0, i64::from(self.height));

        let px = composite::opaque(color);
        for row in y0..y1 {
            let start = (row as usize * self.width as usize + x0 as usize) * 4;
            let end = (row as usize * self.width as usize + x1 as usize) * 4;
            for dst in self.data[start..end].chunks_exact_mut(4) {
                dst.copy_from_slice(&px);
            }
        }
    }

    /// Composite a same-sized premultiplied layer over this surface.
    pub fn draw_layer(&mut self, layer: &[u8]) -> CertResult<()> {
        composite::over_in_place(&mut self.data, layer)
    }

    /// Convert to a straight-alpha RGBA image for encoding.
    pub fn to_rgba_image(&self) -> CertResult<image::RgbaImage> {
        let mut straight = self.data.clone();
        composite::unpremultiply_rgba8_in_place(&mut straight);
        image::RgbaImage::from_raw(self.width, self.height, straight)
            .ok_or_else(|| CertError::render("surface byte length mismatch"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
