use super::*;

const MINIMAL: &str = r#"{
    "template": "template.png",
    "csv": "people.csv",
    "output_dir": "out",
    "columns": { "name": "Name", "email": "Email" },
    "smtp": {
        "host": "smtp.example.com",
        "username": "me@example.com",
        "password": "secret",
        "sender": "me@example.com"
    }
}"#;

#[test]
fn minimal_config_takes_defaults() {
    let cfg = BatchConfig::from_json(MINIMAL).unwrap();
    assert_eq!(cfg.font, FontSpec::default());
    assert_eq!(cfg.font.family, "sans-serif");
    assert_eq!(cfg.layout, LayoutSpec::default());
    assert_eq!(cfg.email, MessageTemplate::default());
    assert_eq!(cfg.smtp.port, 587);
}

#[test]
fn unknown_fields_are_rejected() {
    let text = MINIMAL.replacen("\"csv\"", "\"colour\": 1, \"csv\"", 1);
    assert!(BatchConfig::from_json(&text).is_err());
}

#[test]
fn font_size_defaults_to_a_seventh_of_the_template_height() {
    let font = FontSpec::default();
    assert_eq!(font.resolve(Some(700)).size, 100);
    assert_eq!(font.resolve(Some(3)).size, 1);
    assert_eq!(font.resolve(None).size, FontStyle::FALLBACK_SIZE);

    let fixed = FontSpec {
        size: Some(42),
        bold: true,
        ..FontSpec::default()
    };
    let style = fixed.resolve(Some(700));
    assert_eq!(style.size, 42);
    assert!(style.bold);
}

#[test]
fn load_rebases_relative_paths_and_reads_template_height() {
    let dir = tempfile::tempdir().unwrap();
    image::RgbaImage::new(70, 140)
        .save(dir.path().join("template.png"))
        .unwrap();
    let cfg_path = dir.path().join("batch.json");
    std::fs::write(&cfg_path, MINIMAL).unwrap();

    let cfg = BatchConfig::load(&cfg_path).unwrap();
    assert_eq!(cfg.template, dir.path().join("template.png"));
    assert_eq!(cfg.csv, dir.path().join("people.csv"));
    assert_eq!(cfg.output_dir, dir.path().join("out"));
    assert_eq!(cfg.font_style().size, 20);

    let job = cfg.job();
    assert_eq!(job.output_dir(), dir.path().join("out"));
    assert_eq!(job.message().subject_prefix, "Certificate: ");
}

#[test]
fn absolute_paths_are_left_alone() {
    let mut cfg = BatchConfig::from_json(MINIMAL).unwrap();
    let abs = std::env::temp_dir().join("t.png");
    cfg.template = abs.clone();
    cfg.rebase(Path::new("/somewhere"));
    assert_eq!(cfg.template, abs);
    assert_eq!(cfg.csv, Path::new("/somewhere").join("people.csv"));
}

#[test]
fn missing_config_file_has_context() {
    let err = BatchConfig::load(Path::new("/definitely/not/here.json")).unwrap_err();
    assert!(format!("{err:#}").contains("read config"));
}
