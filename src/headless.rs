use crate::config::options::{HeadlessOptions, HeadlessSort, Options};
use crate::config::schemes::ColorScheme;
use crate::core::parser::{detect_sequence_type, load_store};
use crate::core::{ResidueRange, RowSelection, ViewState};
use crate::export::{ExportContext, render_export, write_export};
use color_eyre::Result;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

fn to_ids(values: &[String]) -> Vec<Arc<str>> {
    values.iter().map(|value| Arc::from(value.as_str())).collect()
}

/// Applies the command-line hide and sort requests to `view`.
pub fn apply_headless_actions(view: &mut ViewState, headless: &HeadlessOptions) -> Result<()> {
    if !headless.hide.is_empty() {
        view.hide(&to_ids(&headless.hide))?;
    }

    match &headless.sort {
        Some(HeadlessSort::Cluster { range }) => {
            let length = view.store().sequence_length();
            let range = match *range {
                Some((start, stop)) => Some(ResidueRange::new(
                    start.saturating_sub(1),
                    stop.saturating_sub(1),
                    length,
                )?),
                None => None,
            };
            view.cluster_sort(range)?;
        }
        Some(HeadlessSort::Column { field, direction }) => {
            view.sort_by_column(field, *direction)?;
        }
        None => {}
    }
    Ok(())
}

/// Loads the input, applies the requested actions and writes one export.
pub fn run(options: &Options, headless: &HeadlessOptions) -> Result<()> {
    let store = load_store(&options.file_path)?;
    let mut view = ViewState::new(store, options.view.columns.clone());
    apply_headless_actions(&mut view, headless)?;

    let scheme = options.color_scheme.unwrap_or_else(|| {
        ColorScheme::get_default_scheme(detect_sequence_type(view.store().records()))
    });
    let selection: RowSelection = to_ids(&headless.select).into_iter().collect();
    let context = ExportContext {
        selection: &selection,
        scheme,
        regions: &options.view.regions,
    };

    if headless.output == Path::new("-") {
        let contents = render_export(headless.format, &view, context)?;
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(contents.as_bytes())?;
        stdout.flush()?;
    } else {
        write_export(&headless.output, headless.format, &view, context)?;
    }
    info!(
        format = ?headless.format,
        output = ?headless.output,
        visible_count = view.store().visible_count(),
        "headless export finished"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SortDirection;
    use crate::export::ExportFormat;
    use std::path::PathBuf;

    const RECORDS: &str = r#"[
        {"id": "a", "sequence": "AAAAA", "score": 3},
        {"id": "b", "sequence": "CCCCC", "score": 1},
        {"id": "c", "sequence": "AAAAC", "score": 2}
    ]"#;

    fn input_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(RECORDS.as_bytes()).unwrap();
        file
    }

    fn headless(output: PathBuf, sort: Option<HeadlessSort>) -> HeadlessOptions {
        HeadlessOptions {
            format: ExportFormat::Fasta,
            output,
            sort,
            hide: Vec::new(),
            select: Vec::new(),
        }
    }

    #[test]
    fn column_sort_then_fasta() {
        let input = input_file();
        let directory = tempfile::tempdir().unwrap();
        let output = directory.path().join("out.fasta");
        let options = Options {
            file_path: input.path().to_path_buf(),
            ..Options::default()
        };
        let sort = HeadlessSort::Column {
            field: "combined.General.score".to_string(),
            direction: SortDirection::Ascending,
        };

        run(&options, &headless(output.clone(), Some(sort))).unwrap();

        let written = std::fs::read_to_string(output).unwrap();
        assert_eq!(written, ">b\nCCCCC\n>c\nAAAAC\n>a\nAAAAA\n");
    }

    #[test]
    fn hide_and_select_filter_rows() {
        let input = input_file();
        let directory = tempfile::tempdir().unwrap();
        let output = directory.path().join("out.fasta");
        let options = Options {
            file_path: input.path().to_path_buf(),
            ..Options::default()
        };
        let mut request = headless(output.clone(), None);
        request.hide = vec!["b".to_string()];
        request.select = vec!["c".to_string()];

        run(&options, &request).unwrap();

        let written = std::fs::read_to_string(output).unwrap();
        assert_eq!(written, ">c\nAAAAC\n");
    }

    #[test]
    fn cluster_range_is_one_based() {
        let parsed = crate::core::parser::parse_json_str(RECORDS).unwrap();
        let store = crate::core::SequenceStore::new(parsed.records).unwrap();
        let mut view = ViewState::new(store, crate::core::ColumnOptions::default());

        let sort = HeadlessSort::Cluster {
            range: Some((1, 5)),
        };
        apply_headless_actions(&mut view, &headless(PathBuf::from("-"), Some(sort))).unwrap();
        assert!(view.last_sort().is_some());

        let out_of_bounds = HeadlessSort::Cluster {
            range: Some((2, 6)),
        };
        let result =
            apply_headless_actions(&mut view, &headless(PathBuf::from("-"), Some(out_of_bounds)));
        assert!(result.is_err());
    }

    #[test]
    fn unknown_hide_id_fails() {
        let input = input_file();
        let options = Options {
            file_path: input.path().to_path_buf(),
            ..Options::default()
        };
        let mut request = headless(PathBuf::from("unused.fasta"), None);
        request.hide = vec!["missing".to_string()];
        assert!(run(&options, &request).is_err());
    }
}
