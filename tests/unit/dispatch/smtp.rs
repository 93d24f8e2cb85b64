use super::*;

#[test]
fn reply_codes_split_auth_from_protocol() {
    for code in ["530", "534", "535", "538"] {
        assert!(matches!(
            classify_reply(code, code.to_string()),
            DispatchFailure::Authentication(_)
        ));
    }
    for code in ["421", "450", "550", "554"] {
        assert!(matches!(
            classify_reply(code, code.to_string()),
            DispatchFailure::Protocol(_)
        ));
    }
}

#[test]
fn config_defaults_and_redaction() {
    let cfg: SmtpConfig = serde_json::from_str(
        r#"{"host":"smtp.example.com","username":"u","password":"hunter2","sender":"u@example.com"}"#,
    )
    .unwrap();
    assert_eq!(cfg.port, 587);
    assert_eq!(cfg.security, SmtpSecurity::StartTls);
    assert_eq!(cfg.timeout_secs, 30);

    let dbg = format!("{cfg:?}");
    assert!(!dbg.contains("hunter2"));
    assert!(dbg.contains("<redacted>"));

    let json = serde_json::to_string(&cfg).unwrap();
    assert!(!json.contains("hunter2"));
}

#[test]
fn security_reads_lowercase() {
    let cfg: SmtpConfig = serde_json::from_str(
        r#"{"host":"h","port":465,"username":"u","sender":"u@h.com","security":"tls"}"#,
    )
    .unwrap();
    assert_eq!(cfg.security, SmtpSecurity::Tls);
    assert_eq!(cfg.password, "");
}

#[test]
fn configured_password_wins_over_env() {
    let cfg = SmtpConfig::new("h", "u", "set", "u@h.com").with_env_password();
    assert_eq!(cfg.password, "set");
}

#[test]
fn unreachable_relay_is_a_protocol_failure() {
    let mut cfg = SmtpConfig::new("127.0.0.1", "u", "p", "u@example.com");
    cfg.port = 1;
    cfg.timeout_secs = 2;
    let dispatcher = SmtpDispatcher::new(cfg);

    let err = dispatcher
        .send(&Mail {
            recipient: "a@example.com",
            subject: "s",
            body: "b",
            attachment: b"png",
            attachment_name: "a_certificate.png",
        })
        .unwrap_err();
    assert!(matches!(err, DispatchFailure::Protocol(_)), "{err:?}");
}

#[test]
fn invalid_recipient_fails_before_connecting() {
    let dispatcher = SmtpDispatcher::new(SmtpConfig::new(
        "smtp.invalid",
        "u",
        "p",
        "u@example.com",
    ));
    let err = dispatcher
        .send(&Mail {
            recipient: "nope",
            subject: "s",
            body: "b",
            attachment: b"png",
            attachment_name: "x.png",
        })
        .unwrap_err();
    assert!(matches!(err, DispatchFailure::Protocol(_)));
}
