use thiserror::Error;

/// Errors raised by core view operations.
///
/// Validation errors (`NoSelection`, `DeleteAll`) are user facing; the rest are
/// precondition violations in the data handed to the core. Every operation that
/// returns one of these leaves the view untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("No sequences selected")]
    NoSelection,
    #[error("Cannot delete every sequence in the alignment")]
    DeleteAll,
    #[error("Sequence length mismatch: expected {expected}, found {found} for id {id}")]
    LengthMismatch {
        id: String,
        expected: usize,
        found: usize,
    },
    #[error("Sequence not found: {0}")]
    UnknownSequence(String),
    #[error("Column not found: {0}")]
    UnknownColumn(String),
    #[error("Invalid residue range {start}-{stop} for an alignment of length {length}")]
    InvalidRange {
        start: usize,
        stop: usize,
        length: usize,
    },
    #[error("Display order is not a permutation of {expected} rows")]
    InvalidPermutation { expected: usize },
    #[error("No visible residues to build a consensus at position {}", .position + 1)]
    EmptyConsensusColumn { position: usize },
}
