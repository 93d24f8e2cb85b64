use super::*;

#[test]
fn advance_and_height_follow_size() {
    let font = FontStyle::new("stub", 20);
    assert_eq!(FixedWidthFont::advance(&font), 12);
    assert_eq!(FixedWidthFont::line_height(&font), 25);

    let tiny = FontStyle::new("stub", 1);
    assert_eq!(FixedWidthFont::advance(&tiny), 1);
    assert_eq!(FixedWidthFont::line_height(&tiny), 1);
}

#[test]
fn bold_and_italic_change_metrics_strikethrough_does_not() {
    let mut backend = FixedWidthFont::new();
    let plain = FontStyle::new("stub", 20);
    let base = backend.measure("abc", &plain).unwrap();

    let bold = FontStyle {
        bold: true,
        ..plain.clone()
    };
    let italic = FontStyle {
        italic: true,
        ..plain.clone()
    };
    let struck = FontStyle {
        strikethrough: true,
        underline: true,
        ..plain.clone()
    };

    assert_eq!(backend.measure("abc", &bold).unwrap().width, 3 * 14);
    assert_eq!(backend.measure("abc", &italic).unwrap().width, 36 + 4);
    assert_eq!(backend.measure("abc", &struck).unwrap(), base);
}

#[test]
fn unknown_family_is_unavailable() {
    let mut backend = FixedWidthFont::only(["Stub Sans"]);
    backend.measure("x", &FontStyle::new("Stub Sans", 10)).unwrap();
    let err = backend
        .measure("x", &FontStyle::new("Missing", 10))
        .unwrap_err();
    assert!(matches!(err, CertError::FontUnavailable(f) if f == "Missing"));
}

#[test]
fn draws_boxes_and_skips_spaces() {
    let mut backend = FixedWidthFont::new();
    let font = FontStyle::new("stub", 20);
    let mut surface = Surface::new(60, 30);
    let red = Rgb8::new(255, 0, 0);
    backend
        .draw_text(&mut surface, "a b", &font, DrawOrigin { x: 0, y: 0 }, red)
        .unwrap();

    assert_eq!(surface.pixel(5, 10), Some([255, 0, 0, 255]));
    assert_eq!(surface.pixel(17, 10), Some([0, 0, 0, 0]));
    assert_eq!(surface.pixel(29, 10), Some([255, 0, 0, 255]));
    assert_eq!(surface.pixel(5, 2), Some([0, 0, 0, 0]));
}

#[test]
fn underline_spans_the_advance() {
    let mut backend = FixedWidthFont::new();
    let font = FontStyle {
        underline: true,
        ..FontStyle::new("stub", 20)
    };
    let mut surface = Surface::new(40, 30);
    backend
        .draw_text(
            &mut surface,
            "ab",
            &font,
            DrawOrigin { x: 0, y: 0 },
            Rgb8::BLACK,
        )
        .unwrap();
    assert_eq!(surface.pixel(0, 23), Some([0, 0, 0, 255]));
    assert_eq!(surface.pixel(23, 23), Some([0, 0, 0, 255]));
    assert_eq!(surface.pixel(24, 23), Some([0, 0, 0, 0]));
}
