use crate::core::data::SequenceRecord;
use crate::core::error::CoreError;
use tracing::{debug, trace};

/// An inclusive, 0-based window of alignment columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResidueRange {
    pub start: usize,
    pub stop: usize,
}

impl ResidueRange {
    /// Validates `start <= stop < length`.
    pub fn new(start: usize, stop: usize, length: usize) -> Result<Self, CoreError> {
        if start > stop || stop >= length {
            return Err(CoreError::InvalidRange {
                start,
                stop,
                length,
            });
        }
        Ok(Self { start, stop })
    }

    /// Builds a range from two unordered drag endpoints.
    #[must_use]
    pub fn spanning(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            stop: a.max(b),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stop - self.start + 1
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// True if the range already covers every column of an alignment of `length`.
    #[must_use]
    pub fn covers(&self, length: usize) -> bool {
        self.start == 0 && self.stop + 1 >= length
    }

    #[must_use]
    pub fn fits(&self, length: usize) -> bool {
        self.start <= self.stop && self.stop < length
    }
}

/// N x N pairwise difference counts. Symmetric with a zero diagonal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DifferenceMatrix {
    size: usize,
    cells: Vec<u32>,
}

impl DifferenceMatrix {
    fn zeroed(size: usize) -> Self {
        Self {
            size,
            cells: vec![0; size * size],
        }
    }

    #[cfg(test)]
    pub(crate) fn from_cells(size: usize, cells: Vec<u32>) -> Self {
        assert_eq!(cells.len(), size * size);
        Self { size, cells }
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> u32 {
        self.cells[i * self.size + j]
    }

    #[must_use]
    pub fn row(&self, i: usize) -> &[u32] {
        &self.cells[i * self.size..(i + 1) * self.size]
    }

    /// Sum of the distances from `i` to every record.
    #[must_use]
    pub fn row_sum(&self, i: usize) -> u64 {
        self.row(i).iter().map(|&cell| u64::from(cell)).sum()
    }

    fn set_pair(&mut self, i: usize, j: usize, value: u32) {
        self.cells[i * self.size + j] = value;
        self.cells[j * self.size + i] = value;
    }
}

/// Gap or blank characters that are stripped from sequence ends.
#[inline]
#[must_use]
pub fn is_gap(byte: u8) -> bool {
    matches!(byte, b'-' | b'.' | b' ')
}

/// First and last non-gap positions, or `None` for an all-gap sequence.
#[must_use]
pub fn real_span(sequence: &[u8]) -> Option<(usize, usize)> {
    let first = sequence.iter().position(|&byte| !is_gap(byte))?;
    let last = sequence.iter().rposition(|&byte| !is_gap(byte))?;
    Some((first, last))
}

/// Whether a comparison over `range` must ignore terminal gaps.
///
/// Whole-alignment comparisons (no range, or a range covering every column) always do;
/// explicit partial ranges are compared literally.
#[must_use]
pub fn ignore_ends_for(range: Option<ResidueRange>, length: usize) -> bool {
    range.is_none_or(|range| range.covers(length))
}

/// Counts differing positions between every pair of records.
///
/// `range` of `None` means the whole alignment. With `ignore_ends`, each pair is clipped
/// to the overlap of both sequences' real spans, so terminal gap runs never count.
#[must_use]
pub fn compute_matrix(
    records: &[SequenceRecord],
    range: Option<ResidueRange>,
    ignore_ends: bool,
) -> DifferenceMatrix {
    let size = records.len();
    let mut matrix = DifferenceMatrix::zeroed(size);
    let length = records.first().map_or(0, |record| record.sequence.len());
    if length == 0 {
        trace!(record_count = size, "skipping difference matrix for empty alignment");
        return matrix;
    }

    let (start, stop) = range.map_or((0, length - 1), |range| {
        (range.start, range.stop.min(length - 1))
    });
    let spans: Vec<Option<(usize, usize)>> = if ignore_ends {
        records
            .iter()
            .map(|record| real_span(&record.sequence))
            .collect()
    } else {
        Vec::new()
    };

    for i in 0..size {
        for j in (i + 1)..size {
            let (lo, hi) = if ignore_ends {
                match (spans[i], spans[j]) {
                    (Some((start_i, end_i)), Some((start_j, end_j))) => (
                        start.max(start_i).max(start_j),
                        stop.min(end_i).min(end_j),
                    ),
                    _ => continue,
                }
            } else {
                (start, stop)
            };
            if lo > hi {
                continue;
            }

            let first = &records[i].sequence[lo..=hi];
            let second = &records[j].sequence[lo..=hi];
            let differences = first
                .iter()
                .zip(second)
                .filter(|(a, b)| a != b)
                .count() as u32;
            matrix.set_pair(i, j, differences);
        }
    }

    debug!(
        record_count = size,
        start,
        stop,
        ignore_ends,
        "computed difference matrix"
    );
    matrix
}
