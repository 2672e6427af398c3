use crate::config::options::{HeadlessOptions, HeadlessSort, Options, ViewConfig};
use crate::config::schemes::ColorScheme;
use crate::core::SortDirection;
use crate::export::ExportFormat;
use clap::Parser;
use color_eyre::{Result, eyre::eyre};
use regex::Regex;
use std::path::PathBuf;

const RANGE_PATTERN: &str = r"^\s*(\d+)\s*[-:]\s*(\d+)\s*$";

/// Parses a 1-based inclusive `START-STOP` residue window.
fn parse_range(value: &str) -> Result<(usize, usize), String> {
    let pattern = Regex::new(RANGE_PATTERN).map_err(|e| e.to_string())?;
    let captures = pattern
        .captures(value)
        .ok_or_else(|| format!("expected START-STOP, got '{value}'"))?;
    let start: usize = captures[1]
        .parse()
        .map_err(|e| format!("invalid start: {e}"))?;
    let stop: usize = captures[2]
        .parse()
        .map_err(|e| format!("invalid stop: {e}"))?;
    if start == 0 || stop < start {
        return Err(format!(
            "range must be 1-based with START <= STOP, got {start}-{stop}"
        ));
    }
    Ok((start, stop))
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the alignment (JSON records or FASTA)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Initial position in the alignment to jump to (1-based index)
    #[arg(short, long, default_value_t = 1)]
    pub position: usize,

    /// JSON view config with default columns, search terms and regions
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write a debug log to msaview.log
    #[arg(long)]
    pub debug: bool,

    /// Start with residues running down the screen
    #[arg(long)]
    pub transposed: bool,

    /// Residue colour scheme (defaults from the sequence type)
    #[arg(long, value_enum)]
    pub color_scheme: Option<ColorScheme>,

    /// Write an export and exit instead of opening the viewer
    #[arg(long, value_enum, value_name = "FORMAT")]
    pub export: Option<ExportFormat>,

    /// Export destination, `-` for stdout
    #[arg(short, long, requires = "export")]
    pub output: Option<PathBuf>,

    /// Cluster sort before exporting
    #[arg(long, requires = "export", conflicts_with = "sort_column")]
    pub cluster: bool,

    /// Residue window for --cluster (1-based, inclusive)
    #[arg(long, value_name = "START-STOP", value_parser = parse_range, requires = "cluster")]
    pub range: Option<(usize, usize)>,

    /// Sort rows by a metadata column before exporting
    #[arg(long, value_name = "FIELD", requires = "export")]
    pub sort_column: Option<String>,

    /// Sort --sort-column in descending order
    #[arg(long, requires = "sort_column")]
    pub descending: bool,

    /// Hide these sequence ids before exporting
    #[arg(long, value_name = "ID", num_args = 1.., requires = "export")]
    pub hide: Vec<String>,

    /// Restrict a FASTA export to these sequence ids
    #[arg(long, value_name = "ID", num_args = 1.., requires = "export")]
    pub select: Vec<String>,
}

impl Cli {
    fn headless_sort(&self) -> Option<HeadlessSort> {
        if self.cluster {
            return Some(HeadlessSort::Cluster { range: self.range });
        }
        self.sort_column.as_ref().map(|field| HeadlessSort::Column {
            field: field.clone(),
            direction: if self.descending {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            },
        })
    }

    pub fn to_options(&self) -> Result<Options> {
        let mut options = Options::default();

        if let Some(path) = &self.file {
            options.file_path.clone_from(path);
        } else {
            return Err(eyre!(
                "No input file provided. Please specify a JSON or FASTA alignment."
            ));
        }
        options.initial_position = self.position.saturating_sub(1);
        options.color_scheme = self.color_scheme;
        options.transposed = self.transposed;

        if let Some(config_path) = &self.config {
            options.view = ViewConfig::load(config_path)?;
        }

        if let Some(format) = self.export {
            options.headless = Some(HeadlessOptions {
                format,
                output: self
                    .output
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(format.default_file_name())),
                sort: self.headless_sort(),
                hide: self.hide.clone(),
                select: self.select.clone(),
            });
        } else if self.cluster || self.sort_column.is_some() || !self.hide.is_empty() {
            return Err(eyre!("Sorting and hiding on the command line require --export"));
        }
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["msaview"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_to_options() {
        let options = cli(&["idontexist.json"]).to_options().unwrap();
        assert_eq!(options.file_path, PathBuf::from("idontexist.json"));
        assert_eq!(options.initial_position, 0);
        assert_eq!(options.fps, 25.0);
        assert_eq!(options.color_scheme, None);
        assert!(!options.transposed);
        assert!(options.headless.is_none());
    }

    #[test]
    fn test_no_file() {
        assert!(cli(&[]).to_options().is_err());
    }

    #[test]
    fn test_position_conversion() {
        let options = cli(&["test.fasta", "-p", "10"]).to_options().unwrap();
        assert_eq!(options.initial_position, 9);
    }

    #[test]
    fn test_headless_cluster_with_range() {
        let options = cli(&[
            "test.json",
            "--export",
            "fasta",
            "--cluster",
            "--range",
            "26-32",
            "--hide",
            "a",
            "b",
        ])
        .to_options()
        .unwrap();
        let headless = options.headless.unwrap();
        assert_eq!(headless.format, ExportFormat::Fasta);
        assert_eq!(headless.output, PathBuf::from("msaview_export.fasta"));
        assert_eq!(
            headless.sort,
            Some(HeadlessSort::Cluster {
                range: Some((26, 32))
            })
        );
        assert_eq!(headless.hide, vec!["a", "b"]);
    }

    #[test]
    fn test_headless_column_sort() {
        let options = cli(&[
            "test.json",
            "--export",
            "csv",
            "-o",
            "-",
            "--sort-column",
            "heavy.General.length",
            "--descending",
        ])
        .to_options()
        .unwrap();
        let headless = options.headless.unwrap();
        assert_eq!(headless.output, PathBuf::from("-"));
        assert_eq!(
            headless.sort,
            Some(HeadlessSort::Column {
                field: "heavy.General.length".to_string(),
                direction: SortDirection::Descending,
            })
        );
    }

    #[test]
    fn test_flag_requirements() {
        let parse = |args: &[&str]| {
            let mut argv = vec!["msaview", "test.json"];
            argv.extend_from_slice(args);
            Cli::try_parse_from(argv)
        };
        assert!(parse(&["--cluster"]).is_err());
        assert!(parse(&["--export", "csv", "--range", "1-5"]).is_err());
        assert!(parse(&["--export", "csv", "--cluster", "--sort-column", "x"]).is_err());
        assert!(parse(&["--export", "xml", "--cluster", "--range", "5-1"]).is_err());
    }

    #[test]
    fn test_parse_range() {
        assert_eq!(parse_range("1-10"), Ok((1, 10)));
        assert_eq!(parse_range(" 3 : 4 "), Ok((3, 4)));
        assert!(parse_range("0-4").is_err());
        assert!(parse_range("4").is_err());
        assert!(parse_range("a-b").is_err());
    }

    #[test]
    fn test_config_is_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"default_visible": ["species"]}}"#).unwrap();
        let path = file.path().to_string_lossy().to_string();

        let options = cli(&["test.json", "--config", &path]).to_options().unwrap();
        assert_eq!(options.view.columns.default_visible, vec!["species"]);
    }
}
