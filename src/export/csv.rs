use crate::core::ViewState;
use crate::export::ExportError;
use crate::export::table::AlignmentTable;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use tracing::debug;

/// Ids, chain names, column names and values are quoted here rather than by the writer,
/// whose quote style applies to every field and would otherwise quote residues too.
fn quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn csv_error(error: impl std::fmt::Display) -> ExportError {
    ExportError::Csv(error.to_string())
}

/// Renders the visible view as CSV.
///
/// The first row carries the chain of each metadata column, the second the column
/// names and residue labels. Ids and metadata values are quoted, residues are not.
pub fn export_csv(view: &ViewState) -> Result<String, ExportError> {
    let table = AlignmentTable::from_view(view)?;
    let residue_count = table.residue_labels.len();
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::CRLF)
        .from_writer(Vec::new());

    let mut chain_row = Vec::with_capacity(1 + table.columns.len() + residue_count);
    chain_row.push(quoted(""));
    chain_row.extend(table.columns.iter().map(|column| quoted(&column.chain)));
    chain_row.extend(std::iter::repeat_n(quoted(""), residue_count));
    writer.write_record(&chain_row).map_err(csv_error)?;

    let mut header_row = Vec::with_capacity(1 + table.columns.len() + residue_count);
    header_row.push(quoted("ID"));
    header_row.extend(table.columns.iter().map(|column| quoted(&column.name)));
    header_row.extend(table.residue_labels.iter().map(|label| quoted(label)));
    writer.write_record(&header_row).map_err(csv_error)?;

    for row in &table.rows {
        let mut cells = Vec::with_capacity(1 + row.values.len() + row.residues.len());
        cells.push(quoted(&row.id));
        cells.extend(row.values.iter().map(|value| {
            value
                .as_ref()
                .map_or_else(|| quoted(""), |value| quoted(&value.as_text()))
        }));
        cells.extend(row.residues.iter().map(|&residue| char::from(residue).to_string()));
        writer.write_record(&cells).map_err(csv_error)?;
    }

    let bytes = writer.into_inner().map_err(csv_error)?;
    let output = String::from_utf8(bytes).map_err(csv_error)?;
    debug!(
        row_count = table.rows.len(),
        column_count = table.columns.len(),
        residue_count,
        "exported csv"
    );
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        ColumnOptions, MetadataField, MetadataValue, SequenceRecord, SequenceStore,
    };
    use std::sync::Arc;

    fn record(id: &str, sequence: &[u8], species: &str, length: f64) -> SequenceRecord {
        let mut record = SequenceRecord::new(id, sequence);
        record.metadata = vec![
            MetadataField {
                name: "heavy.General.species".to_string(),
                value: MetadataValue::Text(species.to_string()),
            },
            MetadataField {
                name: "heavy.General.length".to_string(),
                value: MetadataValue::Number(length),
            },
            MetadataField {
                name: "heavy.General.note".to_string(),
                value: MetadataValue::Text("hidden".to_string()),
            },
        ];
        record
    }

    fn view() -> ViewState {
        let records = vec![
            record("mab \"1\"", b"EV", "human", 121.0),
            record("mab2", b"E-", "mouse", 118.5),
        ];
        let options = ColumnOptions {
            default_visible: vec!["species".to_string(), "length".to_string()],
            search_terms: Vec::new(),
        };
        ViewState::new(SequenceStore::new(records).unwrap(), options)
    }

    #[test]
    fn writes_two_header_rows_and_data() {
        let output = export_csv(&view()).unwrap();
        let expected = concat!(
            "\"\",\"heavy\",\"heavy\",\"\",\"\"\r\n",
            "\"ID\",\"species\",\"length\",\"1\",\"2\"\r\n",
            "\"mab \"\"1\"\"\",\"human\",\"121\",E,V\r\n",
            "\"mab2\",\"mouse\",\"118.5\",E,-\r\n",
        );
        assert_eq!(output, expected);
    }

    #[test]
    fn output_reads_back_with_quotes_unescaped() {
        let output = export_csv(&view()).unwrap();
        let mut reader = ::csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(output.as_bytes());
        let rows: Vec<Vec<String>> = reader
            .records()
            .map(|record| record.unwrap().iter().map(str::to_string).collect())
            .collect();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[1], vec!["ID", "species", "length", "1", "2"]);
        assert_eq!(rows[2], vec!["mab \"1\"", "human", "121", "E", "V"]);
    }

    #[test]
    fn hidden_rows_are_skipped() {
        let mut view = view();
        view.hide(&[Arc::from("mab2")]).unwrap();
        let output = export_csv(&view).unwrap();
        assert_eq!(output.lines().count(), 3);
        assert!(!output.contains("mouse"));
    }

    #[test]
    fn empty_view_is_an_error() {
        let mut view = view();
        view.hide(&[Arc::from("mab2"), Arc::from("mab \"1\"")]).unwrap();
        assert!(matches!(export_csv(&view), Err(ExportError::NothingToExport)));
    }
}
