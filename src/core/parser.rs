use crate::core::data::{SequenceRecord, SequenceStore};
use crate::core::normalize::{RawRecord, normalize_record};
use color_eyre::{Result, eyre::eyre};
use needletail::parser::parse_fastx_file;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, error, info, warn};

/// minimum amino-acid character fraction required to classify input as amino acid.
const AMINO_ACID_CLASSIFICATION_THRESHOLD: f32 = 0.5;
/// number of records inspected when classifying the alignment.
const SEQUENCE_TYPE_SAMPLE_SIZE: usize = 100;

/// Type of sequences in the alignment: either DNA or amino acid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceType {
    Dna,
    AminoAcid,
}

/// Input file flavour, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Fasta,
}

impl InputFormat {
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|extension| extension.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("json") => InputFormat::Json,
            _ => InputFormat::Fasta,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonInput {
    Records(Vec<RawRecord>),
    Document {
        #[serde(default)]
        numbering: Vec<Value>,
        records: Vec<RawRecord>,
    },
}

/// Records parsed from an input file plus optional residue labels.
#[derive(Debug, Clone, Default)]
pub struct ParsedInput {
    pub records: Vec<SequenceRecord>,
    pub residue_labels: Vec<String>,
}

/// Tries to classify records as DNA or amino acid.
///
/// Looks at the first 100 records, counts suspected amino acid chars, and returns `AminoAcid`
/// when their fraction is at least `AMINO_ACID_CLASSIFICATION_THRESHOLD`, otherwise falls back to `Dna`.
#[must_use]
pub fn detect_sequence_type(records: &[SequenceRecord]) -> SequenceType {
    let amino_acid_chars = b"DEFHIKLMNPQRSVWY";
    let (sampled_count, amino_acid_count, total_count) = records
        .iter()
        .take(SEQUENCE_TYPE_SAMPLE_SIZE)
        .fold((0, 0, 0), |(sampled, amino_acids, total), record| {
            let amino_acid_in_sequence = record
                .sequence
                .iter()
                .filter(|&&byte| amino_acid_chars.contains(&byte.to_ascii_uppercase()))
                .count();
            (
                sampled + 1,
                amino_acids + amino_acid_in_sequence,
                total + record.sequence.len(),
            )
        });

    if total_count == 0 {
        debug!(
            sampled_count,
            sequence_type = ?SequenceType::Dna,
            "defaulted sequence type to DNA because sampled sequences had zero total length"
        );
        return SequenceType::Dna;
    }

    let amino_acid_fraction = amino_acid_count as f32 / total_count as f32;
    let sequence_type = if amino_acid_fraction >= AMINO_ACID_CLASSIFICATION_THRESHOLD {
        SequenceType::AminoAcid
    } else {
        SequenceType::Dna
    };
    debug!(
        sampled_count,
        amino_acid_count,
        total_count,
        amino_acid_fraction,
        sequence_type = ?sequence_type,
        "detected sequence type"
    );
    sequence_type
}

fn numbering_label(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Parses JSON input: either an array of records or `{"numbering": [...], "records": [...]}`.
pub fn parse_json_str(content: &str) -> Result<ParsedInput> {
    let input: JsonInput = serde_json::from_str(content).map_err(|e| {
        error!(error = %e, "failed to parse json input");
        eyre!("Failed to parse JSON input: {}", e)
    })?;

    let (raw_records, numbering) = match input {
        JsonInput::Records(records) => (records, Vec::new()),
        JsonInput::Document { numbering, records } => (records, numbering),
    };
    if raw_records.is_empty() {
        return Err(eyre!("Input contains no sequence records"));
    }

    let records: Vec<SequenceRecord> = raw_records.into_iter().map(normalize_record).collect();
    let residue_labels = numbering.iter().map(numbering_label).collect();
    debug!(record_count = records.len(), "completed json parse");
    Ok(ParsedInput {
        records,
        residue_labels,
    })
}

pub fn parse_json_file(path: &Path) -> Result<ParsedInput> {
    info!(path = ?path, "starting json parse");
    let content = std::fs::read_to_string(path).map_err(|e| {
        error!(path = ?path, error = %e, "failed to read json input");
        eyre!("Failed to read file: {}", e)
    })?;
    parse_json_str(&content)
}

/// Parses a fasta file into records without metadata.
///
/// Returns an error when the file is missing, a record is invalid, or sequence lengths differ.
pub fn parse_fasta_file(path: &Path) -> Result<ParsedInput> {
    info!(path = ?path, "starting fasta parse");
    let mut parser = parse_fastx_file(path).map_err(|e| {
        error!(path = ?path, error = %e, "failed to initialise fastx parser");
        eyre!("Failed to parse file: {}", e)
    })?;
    let mut records = Vec::new();
    let mut expected_length: Option<usize> = None;

    while let Some(record) = parser.next() {
        let record = record.map_err(|e| {
            error!(path = ?path, error = %e, "error reading fasta record");
            eyre!("Error reading record: {}", e)
        })?;
        let id = std::str::from_utf8(record.id()).map_err(|e| {
            error!(path = ?path, error = %e, "invalid fasta sequence id");
            eyre!("Invalid sequence ID: {}", e)
        })?;
        let id = id.split_whitespace().next().unwrap_or(id);

        let sequence = record.seq();
        if let Some(length) = expected_length {
            if sequence.len() != length {
                warn!(
                    path = ?path,
                    expected_length = length,
                    found_length = sequence.len(),
                    id = %id,
                    "sequence length mismatch while parsing fasta"
                );
                return Err(eyre!(
                    "Sequence length mismatch: expected {}, found {} for id {}",
                    length,
                    sequence.len(),
                    id
                ));
            }
        } else {
            expected_length = Some(sequence.len());
        }

        records.push(SequenceRecord::new(id, &sequence));
    }

    if records.is_empty() {
        return Err(eyre!("Input contains no sequence records"));
    }
    debug!(
        path = ?path,
        record_count = records.len(),
        expected_length = expected_length.unwrap_or(0),
        "completed fasta parse"
    );
    Ok(ParsedInput {
        records,
        residue_labels: Vec::new(),
    })
}

/// Loads an input file and builds the store used by a view.
pub fn load_store(path: &Path) -> Result<SequenceStore> {
    let parsed = match InputFormat::from_path(path) {
        InputFormat::Json => parse_json_file(path)?,
        InputFormat::Fasta => parse_fasta_file(path)?,
    };
    let store = SequenceStore::new(parsed.records)?.with_residue_labels(parsed.residue_labels);
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::data::MetadataValue;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    fn create_temp_file(content: &str, suffix: &str) -> NamedTempFile {
        let mut temp_file = Builder::new().suffix(suffix).tempfile().unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();
        temp_file
    }

    #[test]
    fn test_parse_valid_fasta() {
        let temp_file = create_temp_file(">seq1 first\nA-CG\n>seq2\nTGCA\n", ".fasta");
        let parsed = parse_fasta_file(temp_file.path()).unwrap();
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.records[0].id.as_ref(), "seq1");
        assert_eq!(parsed.records[0].sequence.as_ref(), b"A-CG");
        assert_eq!(parsed.records[1].sequence.as_ref(), b"TGCA");
        assert!(parsed.records[0].metadata.is_empty());
    }

    #[test]
    fn test_parse_nonexistant() {
        assert!(parse_fasta_file(Path::new("idontexist.fasta")).is_err());
        assert!(load_store(Path::new("idontexist.json")).is_err());
    }

    #[test]
    fn test_parse_empty() {
        let temp_file = create_temp_file("", ".fasta");
        assert!(parse_fasta_file(temp_file.path()).is_err());
    }

    #[test]
    fn test_parse_length_mismatch() {
        let temp_file = create_temp_file(">seq1\nATCG\n>seq2\nTGCAAA\n", ".fasta");
        assert!(parse_fasta_file(temp_file.path()).is_err());
    }

    #[test]
    fn test_parse_invalid() {
        let temp_file = create_temp_file("imaninvalidfasta\nfile\n", ".fasta");
        assert!(parse_fasta_file(temp_file.path()).is_err());
    }

    #[test]
    fn test_parse_json_array() {
        let parsed = parse_json_str(
            r#"[
                {"id": "a", "sequence": "EVQL", "chain": "heavy", "species": "human"},
                {"id": "b", "sequence": "EVKL", "chain": "heavy", "species": "mouse"}
            ]"#,
        )
        .unwrap();
        assert_eq!(parsed.records.len(), 2);
        assert!(parsed.residue_labels.is_empty());
        assert_eq!(
            parsed.records[1].field("heavy.General.species"),
            Some(&MetadataValue::Text("mouse".to_string()))
        );
    }

    #[test]
    fn test_parse_json_document_with_numbering() {
        let parsed = parse_json_str(
            r#"{"numbering": [1, "1A", 2], "records": [{"id": "a", "sequence": "EVQ"}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.residue_labels, vec!["1", "1A", "2"]);
    }

    #[test]
    fn test_parse_json_rejects_bad_input() {
        assert!(parse_json_str("[]").is_err());
        assert!(parse_json_str(r#"[{"sequence": "AC"}]"#).is_err());
        assert!(parse_json_str("not json").is_err());
    }

    #[test]
    fn test_load_store_from_json_file() {
        let temp_file = create_temp_file(
            r#"{"numbering": ["1", "2"], "records": [{"id": "a", "sequence": "AC"}]}"#,
            ".json",
        );
        let store = load_store(temp_file.path()).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.residue_label(1), "2");
    }

    #[test]
    fn test_load_store_rejects_unequal_json_lengths() {
        let temp_file = create_temp_file(
            r#"[{"id": "a", "sequence": "AC"}, {"id": "b", "sequence": "ACG"}]"#,
            ".json",
        );
        assert!(load_store(temp_file.path()).is_err());
    }

    #[test]
    fn test_detect_sequence_type() {
        let dna = vec![
            SequenceRecord::new("seq1", b"ACGTACGT"),
            SequenceRecord::new("seq2", b"TGCA"),
        ];
        assert_eq!(detect_sequence_type(&dna), SequenceType::Dna);

        let protein = vec![SequenceRecord::new("seq1", b"ACDEFGHIKLMNPQRSTVWY")];
        assert_eq!(detect_sequence_type(&protein), SequenceType::AminoAcid);

        let empty = vec![SequenceRecord::new("seq1", b"")];
        assert_eq!(detect_sequence_type(&empty), SequenceType::Dna);
    }
}
