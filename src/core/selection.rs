use crate::core::distance::ResidueRange;
use std::sync::Arc;
use tracing::trace;

/// Residue-range drag gesture state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Pressed {
        anchor: usize,
    },
    Dragging {
        anchor: usize,
        current: usize,
    },
}

/// Tracks a mouse drag across alignment columns and yields the selected range.
#[derive(Debug, Clone, Default)]
pub struct RangeSelector {
    state: DragState,
    last_range: Option<ResidueRange>,
}

impl RangeSelector {
    #[must_use]
    pub fn state(&self) -> DragState {
        self.state
    }

    /// Range of the last completed drag, `None` meaning the whole alignment.
    #[must_use]
    pub fn range(&self) -> Option<ResidueRange> {
        self.last_range
    }

    /// Range currently under the pointer, for highlighting while dragging.
    #[must_use]
    pub fn pending(&self) -> Option<ResidueRange> {
        match self.state {
            DragState::Idle => None,
            DragState::Pressed { anchor } => Some(ResidueRange::spanning(anchor, anchor)),
            DragState::Dragging { anchor, current } => {
                Some(ResidueRange::spanning(anchor, current))
            }
        }
    }

    pub fn mouse_down(&mut self, column: usize) {
        self.state = DragState::Pressed { anchor: column };
    }

    pub fn mouse_drag(&mut self, column: usize) {
        self.state = match self.state {
            DragState::Idle => DragState::Idle,
            DragState::Pressed { anchor } | DragState::Dragging { anchor, .. } => {
                DragState::Dragging {
                    anchor,
                    current: column,
                }
            }
        };
    }

    /// Ends the gesture. A click without movement clears the range back to the whole
    /// alignment; a drag stores and returns the spanned columns.
    pub fn mouse_up(&mut self) -> Option<ResidueRange> {
        let finished = std::mem::take(&mut self.state);
        self.last_range = match finished {
            DragState::Dragging { anchor, current } => Some(ResidueRange::spanning(anchor, current)),
            DragState::Pressed { .. } => None,
            DragState::Idle => self.last_range,
        };
        trace!(range = ?self.last_range, "finished range selection");
        self.last_range
    }

    pub fn clear(&mut self) {
        self.state = DragState::Idle;
        self.last_range = None;
    }
}

/// Ids of the rows currently selected, in selection order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSelection {
    ids: Vec<Arc<str>>,
}

impl RowSelection {
    /// Adds `id` if absent, removes it otherwise. Returns whether it is now selected.
    pub fn toggle(&mut self, id: &Arc<str>) -> bool {
        if let Some(position) = self.ids.iter().position(|selected| selected == id) {
            self.ids.remove(position);
            false
        } else {
            self.ids.push(Arc::clone(id));
            true
        }
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|selected| selected.as_ref() == id)
    }

    #[must_use]
    pub fn ids(&self) -> &[Arc<str>] {
        &self.ids
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Drops ids that no longer exist, e.g. after a delete.
    pub fn retain_known(&mut self, known: impl Fn(&str) -> bool) {
        self.ids.retain(|id| known(id));
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

impl FromIterator<Arc<str>> for RowSelection {
    fn from_iter<T: IntoIterator<Item = Arc<str>>>(iter: T) -> Self {
        let mut selection = RowSelection::default();
        for id in iter {
            if !selection.contains(&id) {
                selection.ids.push(id);
            }
        }
        selection
    }
}
