use crate::core::data::SequenceRecord;
use crate::core::distance::{DifferenceMatrix, ResidueRange, compute_matrix, ignore_ends_for};
use tracing::debug;

/// Index with the smallest total distance to all other records.
///
/// Ties go to the first index in ascending order.
#[must_use]
pub fn representative(matrix: &DifferenceMatrix) -> Option<usize> {
    let mut best: Option<(usize, u64)> = None;
    for index in 0..matrix.size() {
        let total = matrix.row_sum(index);
        if best.is_none_or(|(_, best_total)| total < best_total) {
            best = Some((index, total));
        }
    }
    best.map(|(index, _)| index)
}

/// Orders records so similar sequences sit next to each other.
///
/// Starts from the representative, then repeatedly appends the unused record closest to
/// the last placed one. Ties are narrowed by distance to the representative (which never
/// changes during the walk), then by lowest index.
#[must_use]
pub fn cluster_order(matrix: &DifferenceMatrix) -> Vec<usize> {
    let size = matrix.size();
    let Some(seed) = representative(matrix) else {
        return Vec::new();
    };

    let mut used = vec![false; size];
    let mut order = Vec::with_capacity(size);
    used[seed] = true;
    order.push(seed);

    while order.len() < size {
        let last = order[order.len() - 1];
        let unused = (0..size).filter(|&index| !used[index]);

        let Some(nearest_to_last) = unused.clone().map(|index| matrix.get(last, index)).min()
        else {
            break;
        };
        let closest: Vec<usize> = unused
            .filter(|&index| matrix.get(last, index) == nearest_to_last)
            .collect();

        let nearest_to_seed = closest
            .iter()
            .map(|&index| matrix.get(seed, index))
            .min()
            .unwrap_or(0);
        let Some(&next) = closest
            .iter()
            .find(|&&index| matrix.get(seed, index) == nearest_to_seed)
        else {
            break;
        };

        used[next] = true;
        order.push(next);
    }

    order
}

/// Computes the cluster order for `records` over `range` (`None` for the whole alignment).
#[must_use]
pub fn cluster_sort(records: &[SequenceRecord], range: Option<ResidueRange>) -> Vec<usize> {
    let length = records.first().map_or(0, |record| record.sequence.len());
    let ignore_ends = ignore_ends_for(range, length);
    let matrix = compute_matrix(records, range, ignore_ends);
    let order = cluster_order(&matrix);
    debug!(
        record_count = records.len(),
        range = ?range,
        ignore_ends,
        representative = ?order.first(),
        "completed cluster sort"
    );
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::order::is_permutation;

    fn records(sequences: &[&str]) -> Vec<SequenceRecord> {
        sequences
            .iter()
            .enumerate()
            .map(|(index, sequence)| SequenceRecord::new(&format!("s{index}"), sequence.as_bytes()))
            .collect()
    }

    #[test]
    fn groups_similar_sequences() {
        let records = records(&["AAAAA", "CCCCC", "AAAAC", "CCCCA", "AAACC"]);
        let order = cluster_sort(&records, None);
        assert_eq!(order, vec![4, 2, 0, 3, 1]);
    }

    #[test]
    fn representative_tie_takes_first_index() {
        let records = records(&["AC", "AG", "AT"]);
        let matrix = compute_matrix(&records, None, true);
        assert_eq!(representative(&matrix), Some(0));
    }

    #[test]
    fn ties_broken_by_distance_to_representative() {
        // 1 is the representative and 3 is its only nearest neighbour. From 3, records 0
        // and 2 tie, and 2 wins because it is closer to the representative.
        #[rustfmt::skip]
        let matrix = DifferenceMatrix::from_cells(4, vec![
            0, 3, 1, 3,
            3, 0, 2, 1,
            1, 2, 0, 3,
            3, 1, 3, 0,
        ]);
        assert_eq!(representative(&matrix), Some(1));
        assert_eq!(cluster_order(&matrix), vec![1, 3, 2, 0]);
    }

    #[test]
    fn cluster_sort_is_deterministic() {
        let records = records(&["ACDE-", "ACDF-", "-CDEF", "WCDEF", "ACDEF", "YYYYY"]);
        let first = cluster_sort(&records, None);
        for _ in 0..5 {
            assert_eq!(cluster_sort(&records, None), first);
        }
        assert!(is_permutation(&first, records.len()));
    }

    #[test]
    fn partial_range_only_compares_window() {
        let records = records(&["AAAA", "ACCC", "AAAA"]);
        let range = ResidueRange::new(0, 0, 4).unwrap();
        assert_eq!(cluster_sort(&records, Some(range)), vec![0, 1, 2]);
    }

    #[test]
    fn single_and_empty_inputs() {
        assert_eq!(cluster_sort(&records(&["ACGT"]), None), vec![0]);
        assert!(cluster_sort(&[], None).is_empty());
    }
}
