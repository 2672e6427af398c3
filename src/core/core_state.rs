use crate::core::cluster;
use crate::core::columns::{ColumnOptions, ColumnState, SortDirection, sort_rows};
use crate::core::command::{CoreAction, LastSort};
use crate::core::consensus::compute_consensus;
use crate::core::data::{SequenceRecord, SequenceStore};
use crate::core::distance::ResidueRange;
use crate::core::error::CoreError;
use crate::core::order::DisplayOrder;
use std::sync::Arc;
use tracing::{debug, warn};

/// Callback invoked when a row is activated (e.g. double click or enter on an id).
pub trait RowActivation {
    fn activate(&mut self, record: &SequenceRecord);
}

impl<F: FnMut(&SequenceRecord)> RowActivation for F {
    fn activate(&mut self, record: &SequenceRecord) {
        self(record);
    }
}

/// The per-view aggregate: records, display order, column codes and consensus.
///
/// Every action validates its input before writing, so a rejected action leaves the
/// view exactly as it was.
#[derive(Debug, Clone)]
pub struct ViewState {
    store: SequenceStore,
    order: DisplayOrder,
    columns: ColumnState,
    consensus: Result<Vec<u8>, CoreError>,
    last_sort: Option<LastSort>,
    column_options: ColumnOptions,
}

impl ViewState {
    #[must_use]
    pub fn new(store: SequenceStore, column_options: ColumnOptions) -> Self {
        let order = DisplayOrder::identity(store.len());
        let columns = ColumnState::init(
            store.records(),
            &column_options.default_visible,
            &column_options.search_terms,
            None,
        );
        let consensus = compute_consensus(store.records(), store.sequence_length());
        Self {
            store,
            order,
            columns,
            consensus,
            last_sort: None,
            column_options,
        }
    }

    /// Applies a single [`CoreAction`].
    pub fn apply_action(&mut self, action: CoreAction) -> Result<(), CoreError> {
        match action {
            CoreAction::ClusterSort { range } => self.cluster_sort(range),
            CoreAction::HideSequences { ids } => self.hide(&ids),
            CoreAction::ShowAll => {
                self.show_all();
                Ok(())
            }
            CoreAction::DeleteSequences { ids } => self.delete(&ids),
            CoreAction::ToggleColumn { field } => self.toggle_column(&field).map(|_| ()),
            CoreAction::SortColumn { field, direction } => self.sort_by_column(&field, direction),
        }
    }

    #[must_use]
    pub fn store(&self) -> &SequenceStore {
        &self.store
    }

    #[must_use]
    pub fn order(&self) -> &DisplayOrder {
        &self.order
    }

    #[must_use]
    pub fn columns(&self) -> &ColumnState {
        &self.columns
    }

    /// The consensus for the visible rows, or why it could not be built.
    pub fn consensus(&self) -> Result<&[u8], &CoreError> {
        self.consensus.as_deref()
    }

    #[must_use]
    pub fn last_sort(&self) -> Option<&LastSort> {
        self.last_sort.as_ref()
    }

    #[must_use]
    pub fn is_visible(&self, id: &str) -> Option<bool> {
        self.store
            .position(id)
            .and_then(|index| self.store.get(index))
            .map(|record| record.visible)
    }

    /// Record indices of visible rows in display order.
    pub fn visible_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.order
            .get()
            .iter()
            .copied()
            .filter(|&index| self.store.records()[index].visible)
    }

    /// Visible records in display order.
    pub fn visible_records(&self) -> impl Iterator<Item = &SequenceRecord> {
        self.visible_indices()
            .map(|index| &self.store.records()[index])
    }

    /// Reorders rows by sequence similarity over `range` (`None` for the whole alignment).
    ///
    /// Only visible rows take part; hidden rows keep their relative order after them.
    pub fn cluster_sort(&mut self, range: Option<ResidueRange>) -> Result<(), CoreError> {
        let length = self.store.sequence_length();
        if let Some(range) = range
            && !range.fits(length)
        {
            return Err(CoreError::InvalidRange {
                start: range.start,
                stop: range.stop,
                length,
            });
        }

        let permutation = self.cluster_permutation(range);
        self.order.apply_permutation(permutation)?;
        self.last_sort = Some(LastSort::Cluster { range });
        Ok(())
    }

    fn cluster_permutation(&self, range: Option<ResidueRange>) -> Vec<usize> {
        let visible: Vec<usize> = (0..self.store.len())
            .filter(|&index| self.store.records()[index].visible)
            .collect();
        let visible_records: Vec<SequenceRecord> = visible
            .iter()
            .map(|&index| self.store.records()[index].clone())
            .collect();

        let mut permutation: Vec<usize> = cluster::cluster_sort(&visible_records, range)
            .into_iter()
            .map(|position| visible[position])
            .collect();
        permutation.extend(
            self.order
                .get()
                .iter()
                .copied()
                .filter(|&index| !self.store.records()[index].visible),
        );
        permutation
    }

    /// Orders rows by the values of `field` and marks it as the sorted column.
    pub fn sort_by_column(
        &mut self,
        field: &str,
        direction: SortDirection,
    ) -> Result<(), CoreError> {
        if self.columns.code(field).is_none() {
            return Err(CoreError::UnknownColumn(field.to_string()));
        }
        let permutation = sort_rows(self.store.records(), field, direction);
        self.order.apply_permutation(permutation)?;
        self.columns.sort_by(field, direction)?;
        self.last_sort = Some(LastSort::Column {
            field: field.to_string(),
            direction,
        });
        Ok(())
    }

    pub fn toggle_column(&mut self, field: &str) -> Result<(), CoreError> {
        let code = self.columns.toggle(field)?;
        debug!(field, code = ?code, "toggled column");
        Ok(())
    }

    fn resolve_ids(&self, ids: &[Arc<str>]) -> Result<Vec<usize>, CoreError> {
        if ids.is_empty() {
            return Err(CoreError::NoSelection);
        }
        let mut indices = Vec::with_capacity(ids.len());
        for id in ids {
            let index = self.store.position(id).ok_or_else(|| {
                warn!(id = %id, "rejected unknown sequence id");
                CoreError::UnknownSequence(id.to_string())
            })?;
            if !indices.contains(&index) {
                indices.push(index);
            }
        }
        Ok(indices)
    }

    /// Hides the given rows, then refreshes the consensus and the active sort.
    pub fn hide(&mut self, ids: &[Arc<str>]) -> Result<(), CoreError> {
        let indices = self.resolve_ids(ids)?;
        for &index in &indices {
            self.store.set_visible(index, false);
        }
        self.refresh_consensus();
        self.reapply_last_sort();
        debug!(
            hidden_count = indices.len(),
            visible_count = self.store.visible_count(),
            "hid sequences"
        );
        Ok(())
    }

    pub fn show_all(&mut self) {
        self.store.show_all();
        self.refresh_consensus();
        self.reapply_last_sort();
        debug!(visible_count = self.store.visible_count(), "showed all sequences");
    }

    /// Removes the given rows. Columns are rebuilt (keeping existing codes, minus any
    /// sort marker) and the display order returns to load order.
    pub fn delete(&mut self, ids: &[Arc<str>]) -> Result<(), CoreError> {
        let indices = self.resolve_ids(ids)?;
        if indices.len() >= self.store.len() {
            return Err(CoreError::DeleteAll);
        }

        self.store.remove_indices(&indices);
        self.refresh_consensus();
        self.columns = ColumnState::init(
            self.store.records(),
            &self.column_options.default_visible,
            &self.column_options.search_terms,
            Some(&self.columns),
        );
        self.columns.clear_sort();
        self.order.init_identity(self.store.len());
        self.last_sort = None;
        debug!(
            deleted_count = indices.len(),
            record_count = self.store.len(),
            "deleted sequences"
        );
        Ok(())
    }

    /// Hands the record with `id` to `handler`.
    pub fn activate_row(
        &self,
        id: &str,
        handler: &mut impl RowActivation,
    ) -> Result<(), CoreError> {
        let record = self
            .store
            .position(id)
            .and_then(|index| self.store.get(index))
            .ok_or_else(|| CoreError::UnknownSequence(id.to_string()))?;
        handler.activate(record);
        Ok(())
    }

    fn refresh_consensus(&mut self) {
        self.consensus = compute_consensus(self.store.records(), self.store.sequence_length());
        if let Err(error) = &self.consensus {
            warn!(error = %error, "consensus unavailable");
        }
    }

    fn reapply_last_sort(&mut self) {
        let Some(last_sort) = self.last_sort.clone() else {
            return;
        };
        let result = match last_sort {
            LastSort::Cluster { range } => self.cluster_sort(range),
            LastSort::Column { field, direction } => self.sort_by_column(&field, direction),
        };
        if let Err(error) = result {
            warn!(error = %error, "failed to re-apply last sort");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::columns::ColumnCode;
    use crate::core::data::{MetadataField, MetadataValue};
    use crate::core::order::is_permutation;

    fn ids(values: &[&str]) -> Vec<Arc<str>> {
        values.iter().map(|&id| Arc::from(id)).collect()
    }

    fn view(sequences: &[(&str, &str, f64)]) -> ViewState {
        let records = sequences
            .iter()
            .map(|&(id, sequence, score)| {
                let mut record = SequenceRecord::new(id, sequence.as_bytes());
                record.metadata.push(MetadataField {
                    name: "combined.General.score".to_string(),
                    value: MetadataValue::Number(score),
                });
                record
            })
            .collect();
        let options = ColumnOptions {
            default_visible: vec!["score".to_string()],
            search_terms: Vec::new(),
        };
        ViewState::new(SequenceStore::new(records).unwrap(), options)
    }

    fn sample() -> ViewState {
        view(&[
            ("a", "AAAAA", 3.0),
            ("b", "CCCCC", 1.0),
            ("c", "AAAAC", 5.0),
            ("d", "CCCCA", 2.0),
            ("e", "AAACC", 4.0),
        ])
    }

    fn visible_ids(view: &ViewState) -> Vec<String> {
        view.visible_records().map(|r| r.id.to_string()).collect()
    }

    #[test]
    fn cluster_sort_action_reorders_rows() {
        let mut view = sample();
        view.apply_action(CoreAction::ClusterSort { range: None }).unwrap();
        assert_eq!(visible_ids(&view), vec!["e", "c", "a", "d", "b"]);
        assert_eq!(view.last_sort(), Some(&LastSort::Cluster { range: None }));
        assert!(is_permutation(view.order().get(), 5));
    }

    #[test]
    fn cluster_sort_rejects_out_of_bounds_range() {
        let mut view = sample();
        let range = ResidueRange { start: 2, stop: 9 };
        assert!(view.cluster_sort(Some(range)).is_err());
        assert!(view.order().is_identity());
        assert!(view.last_sort().is_none());
    }

    #[test]
    fn hide_and_show_round_trip() {
        let mut view = sample();
        let before = view.order().clone();
        view.hide(&ids(&["b", "d"])).unwrap();
        assert_eq!(visible_ids(&view), vec!["a", "c", "e"]);
        assert_eq!(view.consensus().unwrap(), b"AAAAC".as_slice());
        assert_eq!(view.is_visible("b"), Some(false));

        view.show_all();
        assert_eq!(view.order(), &before);
        assert_eq!(view.store().visible_count(), 5);
    }

    #[test]
    fn hide_re_applies_column_sort() {
        let mut view = sample();
        view.sort_by_column("combined.General.score", SortDirection::Descending)
            .unwrap();
        view.hide(&ids(&["c"])).unwrap();
        assert_eq!(visible_ids(&view), vec!["e", "a", "d", "b"]);
        assert!(is_permutation(view.order().get(), 5));
    }

    #[test]
    fn hide_rejects_bad_selections_without_changes() {
        let mut view = sample();
        assert_eq!(view.hide(&[]), Err(CoreError::NoSelection));
        assert_eq!(
            view.hide(&ids(&["a", "zzz"])),
            Err(CoreError::UnknownSequence("zzz".to_string()))
        );
        assert_eq!(view.store().visible_count(), 5);
    }

    #[test]
    fn delete_shrinks_and_resets_order() {
        let mut view = sample();
        view.cluster_sort(None).unwrap();
        view.delete(&ids(&["a", "e"])).unwrap();
        assert_eq!(view.store().len(), 3);
        assert!(view.order().is_identity());
        assert!(view.last_sort().is_none());
        assert_eq!(visible_ids(&view), vec!["b", "c", "d"]);
        assert_eq!(
            view.columns().code("combined.General.score"),
            Some(ColumnCode::Visible)
        );
    }

    #[test]
    fn delete_drops_column_sort_marker() {
        let mut view = sample();
        view.sort_by_column("combined.General.score", SortDirection::Descending)
            .unwrap();
        view.delete(&ids(&["c"])).unwrap();
        assert!(view.order().is_identity());
        assert!(view.last_sort().is_none());
        assert!(view.columns().active_sort().is_none());
        assert_eq!(
            view.columns().code("combined.General.score"),
            Some(ColumnCode::Visible)
        );
    }

    #[test]
    fn delete_keeps_prior_column_codes() {
        let mut view = sample();
        view.toggle_column("combined.General.score").unwrap();
        view.delete(&ids(&["a"])).unwrap();
        assert_eq!(
            view.columns().code("combined.General.score"),
            Some(ColumnCode::Hidden)
        );
    }

    #[test]
    fn delete_rejects_every_record() {
        let mut view = sample();
        assert_eq!(
            view.delete(&ids(&["a", "b", "c", "d", "e"])),
            Err(CoreError::DeleteAll)
        );
        assert_eq!(view.delete(&[]), Err(CoreError::NoSelection));
        assert_eq!(view.store().len(), 5);
    }

    #[test]
    fn single_sorted_column_after_sorts() {
        let mut view = sample();
        view.apply_action(CoreAction::SortColumn {
            field: "combined.General.score".to_string(),
            direction: SortDirection::Ascending,
        })
        .unwrap();
        assert_eq!(visible_ids(&view), vec!["b", "d", "a", "e", "c"]);
        assert_eq!(
            view.columns().active_sort(),
            Some(("combined.General.score", SortDirection::Ascending))
        );
        assert!(
            view.apply_action(CoreAction::SortColumn {
                field: "missing".to_string(),
                direction: SortDirection::Ascending,
            })
            .is_err()
        );
    }

    #[test]
    fn hiding_every_row_stores_consensus_error() {
        let mut view = sample();
        view.hide(&ids(&["a", "b", "c", "d", "e"])).unwrap();
        assert_eq!(
            view.consensus(),
            Err(&CoreError::EmptyConsensusColumn { position: 0 })
        );
        view.show_all();
        assert!(view.consensus().is_ok());
    }

    #[test]
    fn activate_row_passes_record_to_handler() {
        let view = sample();
        let mut seen = Vec::new();
        let mut handler = |record: &SequenceRecord| seen.push(record.id.to_string());
        view.activate_row("c", &mut handler).unwrap();
        assert!(view.activate_row("missing", &mut handler).is_err());
        assert_eq!(seen, vec!["c"]);
    }
}
