use std::{fmt, time::Duration};

use lettre::{
    SmtpTransport, Transport,
    transport::smtp::{self, authentication::Credentials},
};

use crate::dispatch::{DispatchFailure, Dispatcher, Mail, message::build_message};

/// Environment variable consulted when the configuration carries no password.
pub const PASSWORD_ENV: &str = "CERTSTAMP_SMTP_PASSWORD";

/// Reply codes that mean the credentials were not accepted.
const AUTH_REPLY_CODES: [&str; 4] = ["530", "534", "535", "538"];

fn default_port() -> u16 {
    587
}

fn default_timeout_secs() -> u64 {
    30
}

/// How the connection is secured.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmtpSecurity {
    /// Plain connection upgraded with `STARTTLS` (usually port 587).
    #[default]
    StartTls,
    /// TLS from the first byte (usually port 465).
    Tls,
}

/// Relay endpoint and credentials.
#[derive(Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SmtpConfig {
    /// Relay host name.
    pub host: String,
    /// Relay port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Login user.
    pub username: String,
    /// Login secret. Never serialized back out.
    #[serde(default, skip_serializing)]
    pub password: String,
    /// `From` address.
    pub sender: String,
    /// Connection security.
    #[serde(default)]
    pub security: SmtpSecurity,
    /// Per-send network timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("sender", &self.sender)
            .field("security", &self.security)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl SmtpConfig {
    /// Config with default port, security and timeout.
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        sender: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: default_port(),
            username: username.into(),
            password: password.into(),
            sender: sender.into(),
            security: SmtpSecurity::default(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Fill an empty password from [`PASSWORD_ENV`].
    pub fn with_env_password(mut self) -> Self {
        if self.password.is_empty()
            && let Ok(pw) = std::env::var(PASSWORD_ENV)
        {
            self.password = pw;
        }
        self
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Sends each message over a fresh authenticated SMTP session.
#[derive(Clone, Debug)]
pub struct SmtpDispatcher {
    config: SmtpConfig,
}

impl SmtpDispatcher {
    /// Dispatcher for `config`. Nothing is contacted until the first send.
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    /// Relay configuration in use.
    pub fn config(&self) -> &SmtpConfig {
        &self.config
    }

    fn transport(&self) -> Result<SmtpTransport, DispatchFailure> {
        let cfg = &self.config;
        let builder = match cfg.security {
            SmtpSecurity::StartTls => SmtpTransport::starttls_relay(&cfg.host),
            SmtpSecurity::Tls => SmtpTransport::relay(&cfg.host),
        }
        .map_err(classify_smtp_error)?;

        Ok(builder
            .port(cfg.port)
            .credentials(Credentials::new(
                cfg.username.clone(),
                cfg.password.clone(),
            ))
            .timeout(Some(cfg.timeout()))
            .build())
    }
}

impl Dispatcher for SmtpDispatcher {
    #[tracing::instrument(level = "debug", skip(self, mail), fields(recipient = mail.recipient, host = %self.config.host))]
    fn send(&self, mail: &Mail<'_>) -> Result<(), DispatchFailure> {
        let message = build_message(&self.config.sender, mail)?;
        let transport = self.transport()?;
        transport.send(&message).map_err(classify_smtp_error)?;
        tracing::debug!("message accepted by relay");
        Ok(())
    }
}

/// Map a transport error onto a [`DispatchFailure`].
pub fn classify_smtp_error(err: smtp::Error) -> DispatchFailure {
    let reason = err.to_string();
    if let Some(code) = err.status() {
        return classify_reply(&code.to_string(), reason);
    }
    if err.is_client() && reason.to_ascii_lowercase().contains("authentication") {
        return DispatchFailure::Authentication(reason);
    }
    DispatchFailure::Protocol(reason)
}

/// Classify a server reply by its three-digit code.
pub fn classify_reply(code: &str, reason: String) -> DispatchFailure {
    if AUTH_REPLY_CODES.contains(&code) {
        DispatchFailure::Authentication(reason)
    } else {
        DispatchFailure::Protocol(reason)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/dispatch/smtp.rs"]
mod tests;
