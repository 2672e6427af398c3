use crate::config::schemes::ColorScheme;
use crate::core::ColumnOptions;
use crate::core::columns::SortDirection;
use crate::export::{ExportFormat, RegionDefinition};
use color_eyre::{Result, eyre::eyre};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Optional JSON view configuration: which columns start visible, which search terms
/// hide columns, and the regions used by the spreadsheet export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    #[serde(flatten)]
    pub columns: ColumnOptions,
    pub regions: Vec<RegionDefinition>,
}

impl ViewConfig {
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| eyre!("Invalid view config: {}", e))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            error!(path = ?path, error = %e, "failed to read view config");
            eyre!("Failed to read config file: {}", e)
        })?;
        let config = Self::from_json(&content)?;
        debug!(
            path = ?path,
            default_visible_count = config.columns.default_visible.len(),
            search_term_count = config.columns.search_terms.len(),
            region_count = config.regions.len(),
            "loaded view config"
        );
        Ok(config)
    }
}

/// Sort applied before a headless export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadlessSort {
    /// 1-based inclusive residue window, `None` for the whole alignment.
    Cluster { range: Option<(usize, usize)> },
    Column {
        field: String,
        direction: SortDirection,
    },
}

/// Actions for a non-interactive run that writes a single export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessOptions {
    pub format: ExportFormat,
    pub output: PathBuf,
    pub sort: Option<HeadlessSort>,
    pub hide: Vec<String>,
    pub select: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Options {
    /// Input file path
    pub file_path: PathBuf,
    /// Initial position in the alignment to jump to
    pub initial_position: usize,
    /// fps
    pub fps: f32,
    /// Residue colour scheme; picked from the sequence type when unset
    pub color_scheme: Option<ColorScheme>,
    /// Start with residues running down the screen
    pub transposed: bool,
    pub view: ViewConfig,
    /// Set when running without the terminal viewer
    pub headless: Option<HeadlessOptions>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            file_path: PathBuf::new(),
            initial_position: 0,
            fps: 25.0,
            color_scheme: None,
            transposed: false,
            view: ViewConfig::default(),
            headless: None,
        }
    }
}
