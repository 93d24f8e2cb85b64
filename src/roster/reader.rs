use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;

use crate::foundation::error::{CertError, CertResult};

/// Names of the two columns a batch needs.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RosterColumns {
    /// Column holding the name stamped on the certificate.
    pub name: String,
    /// Column holding the recipient address.
    pub email: String,
}

impl RosterColumns {
    /// Column pair from two header names.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// One data row: the file's trimmed headers paired with the raw field values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RosterRecord {
    headers: Arc<[String]>,
    values: Vec<String>,
}

impl RosterRecord {
    /// Raw value for `column`, or `None` when the column is unknown or the row is short.
    pub fn get(&self, column: &str) -> Option<&str> {
        let idx = self.headers.iter().position(|h| h == column)?;
        self.values.get(idx).map(String::as_str)
    }

    /// Value for `column`, with absent fields read as empty.
    pub fn get_or_empty(&self, column: &str) -> &str {
        self.get(column).unwrap_or("")
    }

    /// `(header, value)` pairs in file order. Trailing headers missing from a short row are
    /// skipped; fields beyond the header row are dropped.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .zip(self.values.iter())
            .map(|(h, v)| (h.as_str(), v.as_str()))
    }
}

/// A validated CSV roster. Holds only the path and header row; records are streamed from disk.
#[derive(Clone, Debug)]
pub struct Roster {
    path: PathBuf,
    headers: Arc<[String]>,
    columns: RosterColumns,
}

impl Roster {
    /// Read the header row and check that both required columns are present.
    ///
    /// Fails with [`CertError::MissingColumn`] before any record is read.
    pub fn open(path: impl Into<PathBuf>, columns: RosterColumns) -> CertResult<Self> {
        let path = path.into();
        let headers: Arc<[String]> = read_headers(&path)?.into();
        for required in [&columns.name, &columns.email] {
            if !headers.iter().any(|h| h == required) {
                return Err(CertError::MissingColumn(required.clone()));
            }
        }
        Ok(Self {
            path,
            headers,
            columns,
        })
    }

    /// Path of the CSV file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Trimmed header names in file order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Column pair validated by [`Roster::open`].
    pub fn columns(&self) -> &RosterColumns {
        &self.columns
    }

    /// Stream the data rows from the start of the file. Each call re-opens the file.
    ///
    /// A malformed row yields an `Err` item and iteration continues with the next row.
    pub fn records(&self) -> CertResult<RosterRecords> {
        let reader = csv_reader(&self.path)?;
        Ok(RosterRecords {
            headers: self.headers.clone(),
            inner: reader.into_records(),
            row: 1,
        })
    }
}

/// Lazy iterator over roster rows.
pub struct RosterRecords {
    headers: Arc<[String]>,
    inner: csv::StringRecordsIntoIter<std::fs::File>,
    row: u64,
}

impl Iterator for RosterRecords {
    type Item = CertResult<RosterRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.inner.next()?;
        self.row += 1;
        Some(match item {
            Ok(record) => Ok(RosterRecord {
                headers: self.headers.clone(),
                values: record.iter().map(str::to_string).collect(),
            }),
            Err(e) => Err(CertError::roster(format!("row {}: {e}", self.row))),
        })
    }
}

/// Trimmed header names of the CSV at `path`.
pub fn read_headers(path: &Path) -> CertResult<Vec<String>> {
    let mut reader = csv_reader(path)?;
    let headers = reader
        .headers()
        .with_context(|| format!("read CSV header from '{}'", path.display()))?;
    if headers.is_empty() {
        return Err(CertError::configuration(format!(
            "CSV '{}' has no header row",
            path.display()
        )));
    }
    Ok(headers.iter().map(str::to_string).collect())
}

fn csv_reader(path: &Path) -> CertResult<csv::Reader<std::fs::File>> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_path(path)
        .with_context(|| format!("open CSV '{}'", path.display()))
        .map_err(CertError::from)
}

#[cfg(test)]
#[path = "../../tests/unit/roster/reader.rs"]
mod tests;
