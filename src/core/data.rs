use crate::core::error::CoreError;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Record fields that are never treated as metadata columns.
pub const FIXED_FIELDS: [&str; 4] = ["sequence", "id", "visible", "chain"];
/// chain namespace used when a record does not declare one.
pub const DEFAULT_CHAIN: &str = "combined";
/// category used for namespaced fields that only carry a bare name.
pub const DEFAULT_CATEGORY: &str = "General";

/// A single metadata value, as it appeared in the input.
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    Text(String),
    Number(f64),
}

impl MetadataValue {
    /// Returns the value as a number, parsing text when it holds one.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            MetadataValue::Number(value) => Some(*value),
            MetadataValue::Text(text) => text.trim().parse::<f64>().ok(),
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            MetadataValue::Text(text) => Cow::Borrowed(text.as_str()),
            MetadataValue::Number(value) => Cow::Owned(value.to_string()),
        }
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::Text(text) => f.write_str(text),
            MetadataValue::Number(value) => write!(f, "{value}"),
        }
    }
}

/// One namespaced metadata field, e.g. `heavy.CDRs.H1`.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataField {
    pub name: String,
    pub value: MetadataValue,
}

/// Splits a namespaced field name into `(chain, category, bare name)`.
///
/// Names with fewer than three segments fall back to `DEFAULT_CATEGORY`, and a single
/// segment is treated as a bare name in the default chain.
#[must_use]
pub fn split_field_name(field: &str) -> (&str, &str, &str) {
    let mut parts = field.splitn(3, '.');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(chain), Some(category), Some(name)) => (chain, category, name),
        (Some(chain), Some(name), None) => (chain, DEFAULT_CATEGORY, name),
        (Some(name), None, _) => (DEFAULT_CHAIN, DEFAULT_CATEGORY, name),
        _ => (DEFAULT_CHAIN, DEFAULT_CATEGORY, field),
    }
}

#[must_use]
pub fn bare_field_name(field: &str) -> &str {
    split_field_name(field).2
}

#[must_use]
pub fn field_category(field: &str) -> &str {
    split_field_name(field).1
}

#[must_use]
pub fn field_chain(field: &str) -> &str {
    split_field_name(field).0
}

/// Represents one alignment row plus metadata.
#[derive(Debug, Clone)]
pub struct SequenceRecord {
    /// External key used by selections and exports.
    pub id: Arc<str>,
    /// Residue and gap bytes.
    pub sequence: Arc<[u8]>,
    /// Chain-type namespace of this record's metadata.
    pub chain: Arc<str>,
    /// Cleared by hide operations, never by deletion.
    pub visible: bool,
    /// Namespaced metadata in input order.
    pub metadata: Vec<MetadataField>,
}

impl SequenceRecord {
    #[must_use]
    pub fn new(id: &str, sequence: &[u8]) -> Self {
        Self {
            id: Arc::from(id),
            sequence: Arc::from(sequence),
            chain: Arc::from(DEFAULT_CHAIN),
            visible: true,
            metadata: Vec::new(),
        }
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&MetadataValue> {
        self.metadata
            .iter()
            .find(|field| field.name == name)
            .map(|field| &field.value)
    }
}

/// Owns the canonical record array for one view.
///
/// Record order here is the load order and is never changed by sorting; only
/// deletion removes entries.
#[derive(Debug, Clone, Default)]
pub struct SequenceStore {
    records: Vec<SequenceRecord>,
    sequence_length: usize,
    residue_labels: Vec<String>,
    max_id_len: usize,
}

impl SequenceStore {
    /// Builds a store, rejecting records whose sequence length differs from the first.
    pub fn new(records: Vec<SequenceRecord>) -> Result<Self, CoreError> {
        let sequence_length = records.first().map_or(0, |record| record.sequence.len());
        if let Some(record) = records
            .iter()
            .find(|record| record.sequence.len() != sequence_length)
        {
            warn!(
                id = %record.id,
                expected_length = sequence_length,
                found_length = record.sequence.len(),
                "rejected store with unequal sequence lengths"
            );
            return Err(CoreError::LengthMismatch {
                id: record.id.to_string(),
                expected: sequence_length,
                found: record.sequence.len(),
            });
        }

        let max_id_len = records
            .iter()
            .map(|record| record.id.chars().count())
            .max()
            .unwrap_or(0);
        debug!(
            record_count = records.len(),
            sequence_length, "built sequence store"
        );

        Ok(Self {
            records,
            sequence_length,
            residue_labels: Vec::new(),
            max_id_len,
        })
    }

    /// Attaches residue labels (alignment numbering); ignored unless one per position.
    #[must_use]
    pub fn with_residue_labels(mut self, labels: Vec<String>) -> Self {
        if labels.len() == self.sequence_length {
            self.residue_labels = labels;
        } else if !labels.is_empty() {
            warn!(
                label_count = labels.len(),
                sequence_length = self.sequence_length,
                "ignored residue labels that do not cover the alignment"
            );
        }
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn sequence_length(&self) -> usize {
        self.sequence_length
    }

    #[must_use]
    pub fn max_id_len(&self) -> usize {
        self.max_id_len
    }

    #[must_use]
    pub fn records(&self) -> &[SequenceRecord] {
        &self.records
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&SequenceRecord> {
        self.records.get(index)
    }

    /// Index of the first record with `id`.
    #[must_use]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.records
            .iter()
            .position(|record| record.id.as_ref() == id)
    }

    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.records.iter().filter(|record| record.visible).count()
    }

    /// Label for an alignment column, falling back to its 1-based position.
    #[must_use]
    pub fn residue_label(&self, position: usize) -> Cow<'_, str> {
        self.residue_labels
            .get(position)
            .map_or_else(|| Cow::Owned((position + 1).to_string()), |label| {
                Cow::Borrowed(label.as_str())
            })
    }

    pub(crate) fn set_visible(&mut self, index: usize, visible: bool) {
        if let Some(record) = self.records.get_mut(index) {
            record.visible = visible;
        }
    }

    pub(crate) fn show_all(&mut self) {
        for record in &mut self.records {
            record.visible = true;
        }
    }

    /// Removes the given record indices; indices must be distinct and in bounds.
    pub(crate) fn remove_indices(&mut self, indices: &[usize]) {
        let mut index = 0usize;
        self.records.retain(|_| {
            let keep = !indices.contains(&index);
            index += 1;
            keep
        });
        self.max_id_len = self
            .records
            .iter()
            .map(|record| record.id.chars().count())
            .max()
            .unwrap_or(0);
    }
}
