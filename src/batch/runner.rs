use std::{
    fmt,
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use crate::{
    compose::certificate::{Template, compose},
    dispatch::{Dispatcher, Mail, MessageTemplate},
    foundation::{
        core::{FontStyle, LayoutSpec},
        error::{CertError, CertResult},
    },
    roster::reader::Roster,
    text::layout::TextBackend,
};

/// Suffix of every transient artifact written to the output directory.
pub const ARTIFACT_SUFFIX: &str = "_certificate.png";

const UNNAMED_STEM: &str = "unnamed";

/// Immutable inputs shared by every record of one batch.
#[derive(Clone, Debug)]
pub struct BatchJob {
    template: Template,
    output_dir: PathBuf,
    font: FontStyle,
    layout: LayoutSpec,
    message: MessageTemplate,
}

impl BatchJob {
    /// Bundle the per-batch inputs. Nothing is checked until [`run_batch`] starts.
    pub fn new(
        template: Template,
        output_dir: impl Into<PathBuf>,
        font: FontStyle,
        layout: LayoutSpec,
        message: MessageTemplate,
    ) -> Self {
        Self {
            template,
            output_dir: output_dir.into(),
            font,
            layout,
            message,
        }
    }

    /// Template image.
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Directory that receives the transient PNG files.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Font request.
    pub fn font(&self) -> &FontStyle {
        &self.font
    }

    /// Placement and color.
    pub fn layout(&self) -> &LayoutSpec {
        &self.layout
    }

    /// Subject and body template.
    pub fn message(&self) -> &MessageTemplate {
        &self.message
    }

    /// Where the transient artifact for `name` is written.
    pub fn transient_path(&self, name: &str) -> PathBuf {
        self.output_dir.join(transient_file_name(name))
    }
}

/// Longest file name the output directory is expected to accept, in bytes.
pub const MAX_FILE_NAME_BYTES: usize = 255;

/// File name for the transient artifact of `name`: `<stem>_certificate.png`.
///
/// Path separators, reserved characters and control characters are stripped from the stem,
/// which is then cut on a char boundary so the whole name fits in [`MAX_FILE_NAME_BYTES`]. A
/// stem that ends up empty becomes `unnamed`.
pub fn transient_file_name(name: &str) -> String {
    let sanitized = sanitize_filename::sanitize_with_options(
        name.trim(),
        sanitize_filename::Options {
            truncate: false,
            ..sanitize_filename::Options::default()
        },
    );

    let budget = MAX_FILE_NAME_BYTES - ARTIFACT_SUFFIX.len();
    let mut end = sanitized.len().min(budget);
    while !sanitized.is_char_boundary(end) {
        end -= 1;
    }
    let stem = sanitized[..end].trim();
    let stem = if stem.is_empty() || stem.chars().all(|c| c == '.') {
        UNNAMED_STEM
    } else {
        stem
    };
    format!("{stem}{ARTIFACT_SUFFIX}")
}

/// Per-record pipeline stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStage {
    /// Parsing the roster row.
    Reading,
    /// Rendering the name onto the template.
    Composing,
    /// Writing the PNG to the output directory.
    Persisting,
    /// Reading the PNG back and handing it to the dispatcher.
    Dispatching,
    /// Removing the transient file.
    Cleaning,
    /// Outcome appended to the report.
    Recorded,
}

impl fmt::Display for RecordStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Reading => "reading",
            Self::Composing => "composing",
            Self::Persisting => "persisting",
            Self::Dispatching => "dispatching",
            Self::Cleaning => "cleaning",
            Self::Recorded => "recorded",
        })
    }
}

/// Result of processing one roster record.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DispatchOutcome {
    /// Name stamped on the certificate.
    pub name: String,
    /// Recipient address.
    pub recipient: String,
    /// Whether the message was accepted by the relay.
    pub success: bool,
    /// Failure description; `None` on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Stage that failed; `None` on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<RecordStage>,
}

impl DispatchOutcome {
    /// Successful delivery.
    pub fn sent(name: impl Into<String>, recipient: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            recipient: recipient.into(),
            success: true,
            reason: None,
            stage: None,
        }
    }

    /// Failure at `stage`.
    pub fn failed(
        name: impl Into<String>,
        recipient: impl Into<String>,
        stage: RecordStage,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            recipient: recipient.into(),
            success: false,
            reason: Some(reason.into()),
            stage: Some(stage),
        }
    }
}

impl fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.success {
            write!(f, "Email sent to {}", self.recipient)
        } else {
            write!(
                f,
                "Failed to send email to {}: {}",
                self.recipient,
                self.reason.as_deref().unwrap_or("unknown error")
            )
        }
    }
}

/// Ordered outcomes of one batch.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StatusReport {
    outcomes: Vec<DispatchOutcome>,
    succeeded: usize,
    failed: usize,
    cancelled: bool,
}

impl StatusReport {
    /// Outcomes in roster order.
    pub fn outcomes(&self) -> &[DispatchOutcome] {
        &self.outcomes
    }

    /// Number of successful records.
    pub fn succeeded(&self) -> usize {
        self.succeeded
    }

    /// Number of failed records.
    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Whether the batch stopped early on request.
    pub fn cancelled(&self) -> bool {
        self.cancelled
    }

    /// True when every processed record succeeded.
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }

    fn push(&mut self, outcome: DispatchOutcome) {
        if outcome.success {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        self.outcomes.push(outcome);
    }
}

/// Shared stop flag, checked between records.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Token that has not been cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the batch to stop after the current record.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether [`CancelToken::cancel`] has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Run the batch and return every outcome.
///
/// Configuration problems (columns, template path, output directory, font request) are returned
/// as `Err` before the first record. Per-record failures, including a font family the backend
/// cannot resolve, never abort the loop; they become failed outcomes.
pub fn run_batch(
    job: &BatchJob,
    roster: &Roster,
    backend: &mut (impl TextBackend + ?Sized),
    dispatcher: &(impl Dispatcher + ?Sized),
    cancel: &CancelToken,
) -> CertResult<StatusReport> {
    run_batch_with(job, roster, backend, dispatcher, cancel, |_| {})
}

/// [`run_batch`], calling `on_outcome` as each record is recorded.
#[tracing::instrument(
    skip_all,
    fields(
        csv = %roster.path().display(),
        template = %job.template.path().display(),
        output_dir = %job.output_dir.display()
    )
)]
pub fn run_batch_with(
    job: &BatchJob,
    roster: &Roster,
    backend: &mut (impl TextBackend + ?Sized),
    dispatcher: &(impl Dispatcher + ?Sized),
    cancel: &CancelToken,
    mut on_outcome: impl FnMut(&DispatchOutcome),
) -> CertResult<StatusReport> {
    preflight(job, roster)?;

    let columns = roster.columns();
    let mut report = StatusReport::default();

    for item in roster.records()? {
        if cancel.is_cancelled() {
            tracing::info!(processed = report.outcomes.len(), "batch cancelled");
            report.cancelled = true;
            break;
        }

        let outcome = match item {
            Ok(record) => process_record(
                job,
                &mut *backend,
                dispatcher,
                record.get_or_empty(&columns.name),
                record.get_or_empty(&columns.email),
            ),
            Err(e) => DispatchOutcome::failed("", "", RecordStage::Reading, e.to_string()),
        };

        if outcome.success {
            tracing::info!(recipient = %outcome.recipient, "certificate sent");
        } else {
            tracing::warn!(
                recipient = %outcome.recipient,
                stage = ?outcome.stage,
                reason = outcome.reason.as_deref().unwrap_or_default(),
                "record failed"
            );
        }
        tracing::debug!(stage = %RecordStage::Recorded, index = report.outcomes.len());
        on_outcome(&outcome);
        report.push(outcome);
    }

    tracing::info!(
        succeeded = report.succeeded,
        failed = report.failed,
        cancelled = report.cancelled,
        "batch finished"
    );
    Ok(report)
}

fn preflight(job: &BatchJob, roster: &Roster) -> CertResult<()> {
    let columns = roster.columns();
    if columns.name.trim().is_empty() || columns.email.trim().is_empty() {
        return Err(CertError::configuration(
            "name and email column names must be non-empty",
        ));
    }

    if !job.template.path().is_file() {
        return Err(CertError::configuration(format!(
            "template '{}' does not exist",
            job.template.path().display()
        )));
    }

    let dir = &job.output_dir;
    if dir.exists() {
        if !dir.is_dir() {
            return Err(CertError::configuration(format!(
                "output path '{}' is not a directory",
                dir.display()
            )));
        }
    } else {
        std::fs::create_dir_all(dir).map_err(|e| {
            CertError::configuration(format!(
                "cannot create output directory '{}': {e}",
                dir.display()
            ))
        })?;
    }

    job.font.validate()
}

fn process_record(
    job: &BatchJob,
    backend: &mut (impl TextBackend + ?Sized),
    dispatcher: &(impl Dispatcher + ?Sized),
    name: &str,
    recipient: &str,
) -> DispatchOutcome {
    let path = job.transient_path(name);
    let delivered = deliver(job, &mut *backend, dispatcher, name, recipient, &path);

    tracing::debug!(stage = %RecordStage::Cleaning, path = %path.display());
    if let Err(e) = std::fs::remove_file(&path)
        && e.kind() != std::io::ErrorKind::NotFound
    {
        tracing::warn!(path = %path.display(), error = %e, "failed to remove transient file");
    }

    match delivered {
        Ok(()) => DispatchOutcome::sent(name, recipient),
        Err((stage, reason)) => DispatchOutcome::failed(name, recipient, stage, reason),
    }
}

fn deliver(
    job: &BatchJob,
    backend: &mut (impl TextBackend + ?Sized),
    dispatcher: &(impl Dispatcher + ?Sized),
    name: &str,
    recipient: &str,
    path: &Path,
) -> Result<(), (RecordStage, String)> {
    tracing::debug!(stage = %RecordStage::Composing, name);
    let artifact = compose(&mut *backend, &job.template, name, &job.font, &job.layout)
        .map_err(|e| (RecordStage::Composing, e.to_string()))?;

    tracing::debug!(stage = %RecordStage::Persisting, path = %path.display());
    let png = artifact
        .to_png()
        .map_err(|e| (RecordStage::Persisting, e.to_string()))?;
    std::fs::write(path, &png).map_err(|e| {
        (
            RecordStage::Persisting,
            format!("write '{}': {e}", path.display()),
        )
    })?;

    tracing::debug!(stage = %RecordStage::Dispatching, recipient);
    let attachment = std::fs::read(path).map_err(|e| {
        (
            RecordStage::Dispatching,
            format!("read back '{}': {e}", path.display()),
        )
    })?;
    let attachment_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| transient_file_name(name));
    let subject = job.message.render_subject(name);
    let body = job.message.render_body(name);

    dispatcher
        .send(&Mail {
            recipient,
            subject: &subject,
            body: &body,
            attachment: &attachment,
            attachment_name: &attachment_name,
        })
        .map_err(|e| (RecordStage::Dispatching, e.to_string()))
}

#[cfg(test)]
#[path = "../../tests/unit/batch/runner.rs"]
mod tests;
