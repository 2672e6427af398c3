use crate::core::{RowSelection, SequenceRecord, ViewState};
use crate::export::ExportError;
use tracing::debug;

/// Visible records in display order, narrowed to `selection` when it picks a strict
/// subset of them.
fn records_to_export<'a>(
    view: &'a ViewState,
    selection: &RowSelection,
) -> Vec<&'a SequenceRecord> {
    let visible: Vec<&SequenceRecord> = view.visible_records().collect();
    let covers_all = visible.iter().all(|record| selection.contains(&record.id));
    if selection.is_empty() || covers_all {
        return visible;
    }
    visible
        .into_iter()
        .filter(|record| selection.contains(&record.id))
        .collect()
}

/// Writes `>id` / sequence pairs for the exported records.
pub fn export_fasta(view: &ViewState, selection: &RowSelection) -> Result<String, ExportError> {
    let records = records_to_export(view, selection);
    if records.is_empty() {
        return Err(ExportError::NothingToExport);
    }

    let mut output = String::new();
    for record in &records {
        output.push('>');
        output.push_str(&record.id);
        output.push('\n');
        output.push_str(&String::from_utf8_lossy(&record.sequence));
        output.push('\n');
    }
    debug!(record_count = records.len(), "exported fasta");
    Ok(output)
}
