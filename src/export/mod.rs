pub mod csv;
pub mod fasta;
pub mod table;
pub mod xml;

use crate::config::schemes::ColorScheme;
use crate::core::{ResidueRange, RowSelection, ViewState};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Nothing to export: no visible sequences")]
    NothingToExport,
    #[error("Invalid region {label}: {start}-{stop} is outside an alignment of length {length}")]
    InvalidRegion {
        label: String,
        start: usize,
        stop: usize,
        length: usize,
    },
    #[error("Failed to write spreadsheet XML: {0}")]
    Xml(String),
    #[error("Failed to write CSV: {0}")]
    Csv(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Output formats supported by the exporters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Fasta,
    Csv,
    Xml,
}

impl ExportFormat {
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Fasta => "fasta",
            ExportFormat::Csv => "csv",
            ExportFormat::Xml => "xml",
        }
    }

    #[must_use]
    pub fn default_file_name(self) -> String {
        format!("msaview_export.{}", self.extension())
    }
}

/// A named alignment slice, 1-based and inclusive (e.g. CDR-H1 at 26-32).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegionDefinition {
    pub label: String,
    pub start: usize,
    pub stop: usize,
}

impl RegionDefinition {
    /// Converts to a 0-based range, checking it lies inside the alignment.
    pub fn to_range(&self, length: usize) -> Result<ResidueRange, ExportError> {
        if self.start == 0 {
            return Err(self.invalid(length));
        }
        ResidueRange::new(self.start - 1, self.stop.saturating_sub(1), length)
            .map_err(|_| self.invalid(length))
    }

    fn invalid(&self, length: usize) -> ExportError {
        ExportError::InvalidRegion {
            label: self.label.clone(),
            start: self.start,
            stop: self.stop,
            length,
        }
    }
}

/// Everything an export needs besides the view itself.
#[derive(Debug, Clone, Copy)]
pub struct ExportContext<'a> {
    pub selection: &'a RowSelection,
    pub scheme: ColorScheme,
    pub regions: &'a [RegionDefinition],
}

/// Renders the current view in `format`.
pub fn render_export(
    format: ExportFormat,
    view: &ViewState,
    context: ExportContext<'_>,
) -> Result<String, ExportError> {
    let contents = match format {
        ExportFormat::Fasta => fasta::export_fasta(view, context.selection)?,
        ExportFormat::Csv => csv::export_csv(view)?,
        ExportFormat::Xml => xml::export_xml(view, context.scheme, context.regions)?,
    };
    debug!(
        format = ?format,
        byte_count = contents.len(),
        "rendered export"
    );
    Ok(contents)
}

/// Renders and writes an export to `path`.
pub fn write_export(
    path: &Path,
    format: ExportFormat,
    view: &ViewState,
    context: ExportContext<'_>,
) -> Result<(), ExportError> {
    let contents = render_export(format, view, context)?;
    std::fs::write(path, contents)?;
    info!(path = ?path, format = ?format, "wrote export");
    Ok(())
}
