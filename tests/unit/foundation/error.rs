use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        CertError::configuration("x")
            .to_string()
            .contains("configuration error:")
    );
    assert!(
        CertError::template_load("x")
            .to_string()
            .contains("template load error:")
    );
    assert!(
        CertError::font_unavailable("Comic")
            .to_string()
            .contains("font unavailable: Comic")
    );
    assert!(CertError::render("x").to_string().contains("render error:"));
    assert!(CertError::roster("x").to_string().contains("roster error:"));
    assert!(
        CertError::MissingColumn("Fullname".to_string())
            .to_string()
            .contains("'Fullname'")
    );
}

#[test]
fn only_configuration_errors_are_fatal() {
    assert!(CertError::configuration("x").is_fatal());
    assert!(CertError::MissingColumn("Email".to_string()).is_fatal());
    assert!(!CertError::template_load("x").is_fatal());
    assert!(!CertError::font_unavailable("x").is_fatal());
    assert!(!CertError::roster("x").is_fatal());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CertError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
