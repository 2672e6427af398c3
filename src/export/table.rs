use crate::core::{MetadataValue, ViewState};
use crate::export::ExportError;

/// One visible metadata column of the export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableColumn {
    pub chain: String,
    pub field: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub id: String,
    pub values: Vec<Option<MetadataValue>>,
    pub residues: Vec<u8>,
}

/// The cells shared by the CSV and spreadsheet exports: visible columns, residue
/// labels and one row per visible record in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentTable {
    pub columns: Vec<TableColumn>,
    pub residue_labels: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl AlignmentTable {
    pub fn from_view(view: &ViewState) -> Result<Self, ExportError> {
        let columns: Vec<TableColumn> = view
            .columns()
            .visible_columns()
            .map(|(chain, entry)| TableColumn {
                chain: chain.to_string(),
                field: entry.field.clone(),
                name: entry.bare_name().to_string(),
            })
            .collect();

        let rows: Vec<TableRow> = view
            .visible_records()
            .map(|record| TableRow {
                id: record.id.to_string(),
                values: columns
                    .iter()
                    .map(|column| record.field(&column.field).cloned())
                    .collect(),
                residues: record.sequence.to_vec(),
            })
            .collect();
        if rows.is_empty() {
            return Err(ExportError::NothingToExport);
        }

        let store = view.store();
        let residue_labels = (0..store.sequence_length())
            .map(|position| store.residue_label(position).into_owned())
            .collect();

        Ok(Self {
            columns,
            residue_labels,
            rows,
        })
    }
}
