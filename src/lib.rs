//! `certstamp` stamps a name from each row of a CSV roster onto a certificate template and
//! emails the result to the row's address.
//!
//! The pipeline is split into small layers:
//!
//! - [`text`]: font measurement and rasterization behind the [`FontMetrics`] / [`Rasterizer`]
//!   traits, with a parley + vello_cpu backend and a deterministic fixed-width one
//! - [`compose`]: template decoding and centered text placement, producing an [`Artifact`]
//! - [`roster`]: streaming CSV reader with up-front column validation
//! - [`dispatch`]: MIME message building and SMTP delivery with typed failures
//! - [`batch`]: the sequential per-record runner that ties them together
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Images from disk.
pub mod assets;
/// Per-batch configuration and the record runner.
pub mod batch;
/// Certificate composition.
pub mod compose;
/// Email delivery.
pub mod dispatch;
/// Shared value types and errors.
pub mod foundation;
/// Pixel surfaces and compositing.
pub mod render;
/// CSV roster input.
pub mod roster;
/// Text measurement and drawing.
pub mod text;

pub use batch::{
    config::{BatchConfig, FontSpec},
    runner::{
        BatchJob, CancelToken, DispatchOutcome, RecordStage, StatusReport, run_batch,
        run_batch_with, transient_file_name,
    },
};
pub use compose::certificate::{Artifact, PREVIEW_TEXT, Template, compose, compose_preview};
pub use dispatch::{
    DispatchFailure, Dispatcher, Mail, MessageTemplate, SmtpConfig, SmtpDispatcher,
    SmtpSecurity,
};
pub use foundation::{
    core::{DrawOrigin, FontStyle, LayoutSpec, Rgb8, TextExtent},
    error::{CertError, CertResult},
};
pub use roster::reader::{Roster, RosterColumns, RosterRecord, read_headers};
pub use text::{
    fixed::FixedWidthFont,
    layout::{FontMetrics, Placement, Rasterizer, TextBackend},
    parley_backend::ParleyTextBackend,
};
