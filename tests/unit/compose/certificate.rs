use super::*;
use crate::{
    foundation::core::{DrawOrigin, Rgb8, TextExtent},
    text::fixed::FixedWidthFont,
};

const WHITE: [u8; 4] = [255, 255, 255, 255];
const BLACK: [u8; 4] = [0, 0, 0, 255];

fn white_template(dir: &Path, w: u32, h: u32) -> Template {
    let path = dir.join("template.png");
    image::RgbaImage::from_pixel(w, h, image::Rgba(WHITE))
        .save(&path)
        .unwrap();
    Template::new(path)
}

fn px(artifact: &Artifact, x: u32, y: u32) -> [u8; 4] {
    artifact.image().get_pixel(x, y).0
}

#[test]
fn strikethrough_rule_geometry() {
    let placement = Placement {
        extent: TextExtent {
            width: 48,
            height: 25,
        },
        origin: DrawOrigin { x: 76, y: 38 },
    };
    assert_eq!(
        strikethrough_rule(placement),
        Rule {
            x: 76,
            y: 49,
            width: 48,
            height: 2
        }
    );
}

#[test]
fn compose_stamps_centered_name() {
    let dir = tempfile::tempdir().unwrap();
    let template = white_template(dir.path(), 200, 100);
    let mut backend = FixedWidthFont::new();
    let font = FontStyle::new("stub", 20);

    let artifact = compose(
        &mut backend,
        &template,
        "abcd",
        &font,
        &LayoutSpec::default(),
    )
    .unwrap();

    assert_eq!(artifact.name(), "abcd");
    assert_eq!((artifact.width(), artifact.height()), (200, 100));
    // origin (76, 38); first glyph box spans x 77..87, y 43..58
    assert_eq!(px(&artifact, 80, 50), BLACK);
    assert_eq!(px(&artifact, 76, 50), WHITE);
    assert_eq!(px(&artifact, 80, 42), WHITE);
    assert_eq!(px(&artifact, 10, 10), WHITE);
}

#[test]
fn strikethrough_spans_measured_width_at_midpoint() {
    let dir = tempfile::tempdir().unwrap();
    let template = white_template(dir.path(), 200, 100);
    let mut backend = FixedWidthFont::new();
    let font = FontStyle {
        strikethrough: true,
        ..FontStyle::new("stub", 20)
    };

    let artifact = compose(
        &mut backend,
        &template,
        "abcd",
        &font,
        &LayoutSpec::default(),
    )
    .unwrap();

    // gap column between glyph boxes only carries the rule
    for y in [49, 50] {
        assert_eq!(px(&artifact, 76, y), BLACK);
        assert_eq!(px(&artifact, 123, y), BLACK);
        assert_eq!(px(&artifact, 75, y), WHITE);
        assert_eq!(px(&artifact, 124, y), WHITE);
    }
    assert_eq!(px(&artifact, 76, 48), WHITE);
    assert_eq!(px(&artifact, 76, 51), WHITE);
}

#[test]
fn compose_twice_is_pixel_identical_and_template_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let template = white_template(dir.path(), 120, 60);
    let before = std::fs::read(template.path()).unwrap();
    let mut backend = FixedWidthFont::new();
    let font = FontStyle {
        bold: true,
        underline: true,
        strikethrough: true,
        ..FontStyle::new("stub", 16)
    };
    let layout = LayoutSpec {
        offset_x: -7,
        offset_y: 9,
        color: Rgb8::new(200, 30, 30),
    };

    let a = compose(&mut backend, &template, "Bob", &font, &layout).unwrap();
    let b = compose(&mut backend, &template, "Bob", &font, &layout).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.to_png().unwrap(), b.to_png().unwrap());
    assert_eq!(std::fs::read(template.path()).unwrap(), before);
}

#[test]
fn off_canvas_offsets_are_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let template = white_template(dir.path(), 50, 50);
    let mut backend = FixedWidthFont::new();
    let font = FontStyle {
        strikethrough: true,
        ..FontStyle::new("stub", 12)
    };
    let layout = LayoutSpec {
        offset_x: 10_000,
        offset_y: -10_000,
        color: Rgb8::BLACK,
    };

    let artifact = compose(&mut backend, &template, "Far away", &font, &layout).unwrap();
    assert!(artifact.image().pixels().all(|p| p.0 == WHITE));
}

#[test]
fn missing_template_is_template_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let template = Template::new(dir.path().join("nope.png"));
    let mut backend = FixedWidthFont::new();
    let err = compose(
        &mut backend,
        &template,
        "x",
        &FontStyle::new("stub", 10),
        &LayoutSpec::default(),
    )
    .unwrap_err();
    assert!(matches!(err, CertError::TemplateLoad(_)));
}

#[test]
fn undecodable_template_is_template_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.png");
    std::fs::write(&path, b"not an image").unwrap();
    let mut backend = FixedWidthFont::new();
    let err = compose(
        &mut backend,
        &Template::new(path),
        "x",
        &FontStyle::new("stub", 10),
        &LayoutSpec::default(),
    )
    .unwrap_err();
    assert!(matches!(err, CertError::TemplateLoad(_)));
}

#[test]
fn unresolvable_family_is_font_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let template = white_template(dir.path(), 40, 40);
    let mut backend = FixedWidthFont::only(["Stub Serif"]);
    let err = compose(
        &mut backend,
        &template,
        "x",
        &FontStyle::new("Papyrus", 10),
        &LayoutSpec::default(),
    )
    .unwrap_err();
    assert!(matches!(err, CertError::FontUnavailable(_)));
}

#[test]
fn preview_uses_sample_text() {
    let dir = tempfile::tempdir().unwrap();
    let template = white_template(dir.path(), 300, 80);
    let mut backend = FixedWidthFont::new();
    let artifact = compose_preview(
        &mut backend,
        &template,
        &FontStyle::new("stub", 10),
        &LayoutSpec::default(),
    )
    .unwrap();
    assert_eq!(artifact.name(), PREVIEW_TEXT);
}

#[test]
fn dimensions_probe_header() {
    let dir = tempfile::tempdir().unwrap();
    let template = white_template(dir.path(), 31, 17);
    assert_eq!(template.dimensions().unwrap(), (31, 17));
}
