use std::{borrow::Cow, collections::HashMap, path::Path};

use crate::{
    foundation::{
        core::{DrawOrigin, FontStyle, Rgb8, TextExtent},
        error::{CertError, CertResult},
    },
    render::surface::Surface,
    text::layout::{FontMetrics, Rasterizer},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl From<Rgb8> for TextBrushRgba8 {
    fn from(c: Rgb8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: 255,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct FaceKey {
    family: String,
    bold: bool,
    italic: bool,
}

impl FaceKey {
    fn of(font: &FontStyle) -> Self {
        Self {
            family: font.family.trim().to_string(),
            bold: font.bold,
            italic: font.italic,
        }
    }
}

/// One resolved face with its own Parley contexts, so shaping can only ever pick this face.
struct ResolvedFace {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
    font: vello_cpu::peniko::FontData,
}

/// Production text backend.
///
/// Family names are resolved through a `fontdb` database (system fonts plus any extra font
/// directories), shaping and metrics come from Parley, and glyphs are rasterized with
/// `vello_cpu`. Bold and italic select the matching face; underline uses the face's own
/// underline metrics.
pub struct ParleyTextBackend {
    fontdb: usvg::fontdb::Database,
    faces: HashMap<FaceKey, ResolvedFace>,
}

impl Default for ParleyTextBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ParleyTextBackend {
    /// Backend over the system font collection.
    pub fn new() -> Self {
        let mut fontdb = usvg::fontdb::Database::new();
        fontdb.load_system_fonts();
        Self {
            fontdb,
            faces: HashMap::new(),
        }
    }

    /// Backend with no fonts except those in `dirs` (`.ttf`, `.otf`, `.ttc`).
    pub fn from_font_dirs<P: AsRef<Path>>(dirs: &[P]) -> Self {
        let mut fontdb = usvg::fontdb::Database::new();
        for dir in dirs {
            load_fonts_from_dir(&mut fontdb, dir.as_ref());
        }
        Self {
            fontdb,
            faces: HashMap::new(),
        }
    }

    /// Add every font file found directly inside `dir`.
    pub fn load_font_dir(&mut self, dir: &Path) {
        load_fonts_from_dir(&mut self.fontdb, dir);
    }

    /// Sorted, de-duplicated family names known to the backend.
    pub fn families(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .fontdb
            .faces()
            .filter_map(|f| f.families.first().map(|(name, _)| name.clone()))
            .collect();
        names.sort();
        names.dedup();
        names
    }

    fn resolve(&mut self, font: &FontStyle) -> CertResult<&mut ResolvedFace> {
        let key = FaceKey::of(font);
        if !self.faces.contains_key(&key) {
            let face = self.load_face(&key)?;
            tracing::debug!(
                requested = %key.family,
                resolved = %face.family_name,
                bold = key.bold,
                italic = key.italic,
                "resolved font face"
            );
            self.faces.insert(key.clone(), face);
        }
        self.faces
            .get_mut(&key)
            .ok_or_else(|| CertError::font_unavailable(font.family.clone()))
    }

    fn load_face(&self, key: &FaceKey) -> CertResult<ResolvedFace> {
        use usvg::fontdb::{Family, Query, Stretch, Style, Weight};

        let family = match key.family.to_ascii_lowercase().as_str() {
            "serif" => Family::Serif,
            "sans-serif" | "sans" => Family::SansSerif,
            "monospace" => Family::Monospace,
            "cursive" => Family::Cursive,
            "fantasy" => Family::Fantasy,
            _ => Family::Name(&key.family),
        };
        let families = [family];
        let query = Query {
            families: &families,
            weight: if key.bold { Weight::BOLD } else { Weight::NORMAL },
            stretch: Stretch::Normal,
            style: if key.italic { Style::Italic } else { Style::Normal },
        };

        let id = self
            .fontdb
            .query(&query)
            .ok_or_else(|| CertError::font_unavailable(key.family.clone()))?;
        let family_name = self
            .fontdb
            .face(id)
            .and_then(|f| f.families.first().map(|(name, _)| name.clone()))
            .ok_or_else(|| CertError::font_unavailable(key.family.clone()))?;
        let (bytes, index) = self
            .fontdb
            .with_face_data(id, |data, index| (data.to_vec(), index))
            .ok_or_else(|| CertError::font_unavailable(key.family.clone()))?;

        let mut font_ctx = parley::FontContext::default();
        let registered = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        if registered.is_empty() {
            return Err(CertError::font_unavailable(key.family.clone()));
        }

        let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), index);
        Ok(ResolvedFace {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font,
        })
    }
}

impl ResolvedFace {
    fn layout(
        &mut self,
        text: &str,
        font: &FontStyle,
        brush: TextBrushRgba8,
    ) -> parley::Layout<TextBrushRgba8> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(font.size as f32));
        if font.bold {
            builder.push_default(parley::style::StyleProperty::FontWeight(
                parley::style::FontWeight::BOLD,
            ));
        }
        if font.italic {
            builder.push_default(parley::style::StyleProperty::FontStyle(
                parley::style::FontStyle::Italic,
            ));
        }
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }
}

impl FontMetrics for ParleyTextBackend {
    fn measure(&mut self, text: &str, font: &FontStyle) -> CertResult<TextExtent> {
        let face = self.resolve(font)?;
        let layout = face.layout(text, font, TextBrushRgba8::default());
        Ok(TextExtent {
            width: layout.width().max(0.0).ceil() as u32,
            height: layout.height().max(0.0).ceil() as u32,
        })
    }
}

impl Rasterizer for ParleyTextBackend {
    fn draw_text(
        &mut self,
        surface: &mut Surface,
        text: &str,
        font: &FontStyle,
        origin: DrawOrigin,
        color: Rgb8,
    ) -> CertResult<()> {
        let width: u16 = surface
            .width()
            .try_into()
            .map_err(|_| CertError::render("surface width exceeds u16"))?;
        let height: u16 = surface
            .height()
            .try_into()
            .map_err(|_| CertError::render("surface height exceeds u16"))?;

        let face = self.resolve(font)?;
        let layout = face.layout(text, font, color.into());

        let mut ctx = vello_cpu::RenderContext::new(width, height);
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((
            origin.x as f64,
            origin.y as f64,
        )));
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, 255,
        ));

        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };

                let baseline = run.baseline();
                let mut pen_x = run.offset();
                let glyphs = run.glyphs().map(|g| {
                    let glyph = vello_cpu::Glyph {
                        id: g.id,
                        x: pen_x + g.x,
                        y: baseline - g.y,
                    };
                    pen_x += g.advance;
                    glyph
                });
                ctx.glyph_run(&face.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);

                if font.underline {
                    let metrics = run.run().metrics();
                    let top = baseline - metrics.underline_offset;
                    let thickness = metrics.underline_size.max(1.0);
                    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                        f64::from(run.offset()),
                        f64::from(top),
                        f64::from(run.offset() + run.advance()),
                        f64::from(top + thickness),
                    ));
                }
            }
        }

        ctx.flush();
        let mut layer = vello_cpu::Pixmap::new(width, height);
        ctx.render_to_pixmap(&mut layer);
        surface.draw_layer(layer.data_as_u8_slice())
    }
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        tracing::warn!(dir = %dir.display(), "font directory is not readable");
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        if let Err(e) = db.load_font_file(&path) {
            tracing::warn!(path = %path.display(), error = %e, "skipping unreadable font file");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/parley_backend.rs"]
mod tests;
