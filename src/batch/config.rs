use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    batch::runner::BatchJob,
    compose::certificate::Template,
    dispatch::{MessageTemplate, SmtpConfig, SmtpDispatcher},
    foundation::{
        core::{FontStyle, LayoutSpec},
        error::CertResult,
    },
    roster::reader::{Roster, RosterColumns},
};

fn default_family() -> String {
    "sans-serif".to_string()
}

/// Font request as written in a config file. `size` may be left out and is then derived from
/// the template height.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FontSpec {
    /// Family name.
    #[serde(default = "default_family")]
    pub family: String,
    /// Point size.
    #[serde(default)]
    pub size: Option<u32>,
    /// Bold face.
    #[serde(default)]
    pub bold: bool,
    /// Italic face.
    #[serde(default)]
    pub italic: bool,
    /// Underline.
    #[serde(default)]
    pub underline: bool,
    /// Strikethrough.
    #[serde(default)]
    pub strikethrough: bool,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: default_family(),
            size: None,
            bold: false,
            italic: false,
            underline: false,
            strikethrough: false,
        }
    }
}

impl FontSpec {
    /// Concrete style for a template of the given height.
    pub fn resolve(&self, template_height: Option<u32>) -> FontStyle {
        FontStyle {
            family: self.family.clone(),
            size: self
                .size
                .unwrap_or_else(|| FontStyle::default_size_for(template_height)),
            bold: self.bold,
            italic: self.italic,
            underline: self.underline,
            strikethrough: self.strikethrough,
        }
    }
}

/// Everything one `send` run needs, as loaded from a JSON file.
///
/// Relative paths are resolved against the directory holding the config file.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatchConfig {
    /// Template image.
    pub template: PathBuf,
    /// Roster CSV.
    pub csv: PathBuf,
    /// Directory for transient artifacts.
    pub output_dir: PathBuf,
    /// Name and email column headers.
    pub columns: RosterColumns,
    /// Font request.
    #[serde(default)]
    pub font: FontSpec,
    /// Placement and color.
    #[serde(default)]
    pub layout: LayoutSpec,
    /// Subject and body.
    #[serde(default)]
    pub email: MessageTemplate,
    /// Relay settings.
    pub smtp: SmtpConfig,
}

impl BatchConfig {
    /// Parse a config from JSON text. Paths are kept as written.
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        serde_json::from_str(text).context("parse batch config JSON")
    }

    /// Load a config file, rebase its relative paths onto the file's directory, and fill an
    /// empty SMTP password from the environment.
    #[tracing::instrument(level = "debug")]
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let mut cfg = Self::from_json(&text)
            .with_context(|| format!("load config '{}'", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        cfg.rebase(base);
        cfg.smtp = cfg.smtp.with_env_password();
        Ok(cfg)
    }

    /// Join every relative path onto `base`.
    pub fn rebase(&mut self, base: &Path) {
        for p in [&mut self.template, &mut self.csv, &mut self.output_dir] {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        }
    }

    /// Template referenced by the config.
    pub fn template(&self) -> Template {
        Template::new(&self.template)
    }

    /// Font style with the size resolved against the template height.
    pub fn font_style(&self) -> FontStyle {
        let height = self.template().dimensions().ok().map(|(_, h)| h);
        self.font.resolve(height)
    }

    /// Immutable job description for [`crate::batch::runner::run_batch`].
    pub fn job(&self) -> BatchJob {
        BatchJob::new(
            self.template(),
            &self.output_dir,
            self.font_style(),
            self.layout,
            self.email.clone(),
        )
    }

    /// Open the roster and check its required columns.
    pub fn roster(&self) -> CertResult<Roster> {
        Roster::open(&self.csv, self.columns.clone())
    }

    /// SMTP dispatcher for the configured relay.
    pub fn dispatcher(&self) -> SmtpDispatcher {
        SmtpDispatcher::new(self.smtp.clone())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/batch/config.rs"]
mod tests;
