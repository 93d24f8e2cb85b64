use lettre::{
    Message,
    message::{
        Attachment, Body, Mailbox, MultiPart, SinglePart,
        header::{ContentTransferEncoding, ContentType},
    },
};

use crate::dispatch::{DispatchFailure, Mail};

/// Placeholder replaced with the recipient's name in subject and body.
pub const NAME_PLACEHOLDER: &str = "{name}";

const ATTACHMENT_CONTENT_TYPE: &str = "image/png";

fn default_subject_prefix() -> String {
    "Certificate: ".to_string()
}

fn default_footer() -> Option<String> {
    Some("©Certificate Generator & Automation".to_string())
}

/// Subject and body text shared by every message of a batch.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MessageTemplate {
    /// Subject text, after the prefix.
    #[serde(default)]
    pub subject: String,
    /// Body text, before the footer.
    #[serde(default)]
    pub body: String,
    /// Prepended to every subject.
    #[serde(default = "default_subject_prefix")]
    pub subject_prefix: String,
    /// Appended after a blank line; `null` disables it.
    #[serde(default = "default_footer")]
    pub footer: Option<String>,
}

impl Default for MessageTemplate {
    fn default() -> Self {
        Self {
            subject: String::new(),
            body: String::new(),
            subject_prefix: default_subject_prefix(),
            footer: default_footer(),
        }
    }
}

impl MessageTemplate {
    /// Template with the default prefix and footer.
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
            ..Self::default()
        }
    }

    /// Subject line for `name`.
    pub fn render_subject(&self, name: &str) -> String {
        format!("{}{}", self.subject_prefix, self.subject).replace(NAME_PLACEHOLDER, name)
    }

    /// Body text for `name`.
    pub fn render_body(&self, name: &str) -> String {
        let body = self.body.replace(NAME_PLACEHOLDER, name);
        match &self.footer {
            Some(footer) => format!("{body}\n\n{footer}"),
            None => body,
        }
    }
}

/// Build a `multipart/mixed` message: a plain-text part followed by the attachment, base64
/// encoded.
///
/// An unparsable recipient is reported as [`DispatchFailure::Protocol`] (the server would refuse
/// it); any other construction problem as [`DispatchFailure::Unknown`].
pub fn build_message(sender: &str, mail: &Mail<'_>) -> Result<Message, DispatchFailure> {
    let from: Mailbox = sender
        .trim()
        .parse()
        .map_err(|e| DispatchFailure::Unknown(format!("invalid sender address '{sender}': {e}")))?;
    let to: Mailbox = mail.recipient.trim().parse().map_err(|e| {
        DispatchFailure::Protocol(format!(
            "recipient refused, invalid address '{}': {e}",
            mail.recipient
        ))
    })?;

    let content_type = ContentType::parse(ATTACHMENT_CONTENT_TYPE)
        .map_err(|e| DispatchFailure::Unknown(format!("attachment content type: {e}")))?;
    let body = Body::new_with_encoding(mail.attachment.to_vec(), ContentTransferEncoding::Base64)
        .map_err(|_| DispatchFailure::Unknown("attachment cannot be base64 encoded".to_string()))?;
    let attachment = Attachment::new(mail.attachment_name.to_string()).body(body, content_type);

    Message::builder()
        .from(from)
        .to(to)
        .subject(mail.subject)
        .multipart(
            MultiPart::mixed()
                .singlepart(SinglePart::plain(mail.body.to_string()))
                .singlepart(attachment),
        )
        .map_err(|e| DispatchFailure::Unknown(format!("build message: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/dispatch/message.rs"]
mod tests;
