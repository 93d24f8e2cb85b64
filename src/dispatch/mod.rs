//! Email delivery of composed certificates.
//!
//! [`Dispatcher`] is the seam the batch runner sends through. [`SmtpDispatcher`] is the
//! production implementation; every failure comes back as a [`DispatchFailure`] value.

/// Subject/body templating and MIME construction.
pub mod message;
/// SMTP relay transport.
pub mod smtp;

pub use message::{MessageTemplate, build_message};
pub use smtp::{SmtpConfig, SmtpDispatcher, SmtpSecurity};

/// Everything needed to send one certificate to one recipient. Borrowed for a single send.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mail<'a> {
    /// Recipient address as read from the roster.
    pub recipient: &'a str,
    /// Rendered subject line.
    pub subject: &'a str,
    /// Rendered plain-text body.
    pub body: &'a str,
    /// Attachment bytes (PNG).
    pub attachment: &'a [u8],
    /// File name advertised in the attachment's `Content-Disposition`.
    pub attachment_name: &'a str,
}

/// Why a send failed. None of these abort a batch.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum DispatchFailure {
    /// The server rejected the credentials, or no usable auth mechanism was offered.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The SMTP exchange failed: refused recipient, connection or TLS failure, error reply.
    #[error("smtp exchange failed: {0}")]
    Protocol(String),

    /// Anything else, such as a message that could not be built.
    #[error("send failed: {0}")]
    Unknown(String),
}

/// Delivers one message per call.
pub trait Dispatcher {
    /// Send `mail`, reporting the outcome as a value.
    fn send(&self, mail: &Mail<'_>) -> Result<(), DispatchFailure>;
}

impl<T: Dispatcher + ?Sized> Dispatcher for &T {
    fn send(&self, mail: &Mail<'_>) -> Result<(), DispatchFailure> {
        (**self).send(mail)
    }
}
