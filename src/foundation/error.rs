/// Convenience result type used across certstamp.
pub type CertResult<T> = Result<T, CertError>;

/// Top-level error taxonomy used by the composition and batch APIs.
///
/// `Configuration` and `MissingColumn` are fatal and surface before a batch starts. The
/// remaining variants describe a single record and are folded into a failed outcome by the
/// batch runner.
#[derive(thiserror::Error, Debug)]
pub enum CertError {
    /// Invalid or incomplete caller configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A required roster column is absent from the CSV header row.
    #[error("missing column: '{0}' not found in CSV header")]
    MissingColumn(String),

    /// The template image could not be read or decoded.
    #[error("template load error: {0}")]
    TemplateLoad(String),

    /// The requested font family could not be resolved by the text backend.
    #[error("font unavailable: {0}")]
    FontUnavailable(String),

    /// Text shaping or rasterization failed.
    #[error("render error: {0}")]
    Render(String),

    /// A roster row could not be parsed.
    #[error("roster error: {0}")]
    Roster(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CertError {
    /// Build a [`CertError::Configuration`] value.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Build a [`CertError::TemplateLoad`] value.
    pub fn template_load(msg: impl Into<String>) -> Self {
        Self::TemplateLoad(msg.into())
    }

    /// Build a [`CertError::FontUnavailable`] value.
    pub fn font_unavailable(family: impl Into<String>) -> Self {
        Self::FontUnavailable(family.into())
    }

    /// Build a [`CertError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`CertError::Roster`] value.
    pub fn roster(msg: impl Into<String>) -> Self {
        Self::Roster(msg.into())
    }

    /// Whether this error must abort a batch before any record is processed.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::MissingColumn(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
