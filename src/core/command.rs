use crate::core::columns::SortDirection;
use crate::core::distance::ResidueRange;
use std::sync::Arc;

/// Represents an action that changes the view state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreAction {
    /// `None` clusters over the whole alignment.
    ClusterSort { range: Option<ResidueRange> },
    HideSequences { ids: Vec<Arc<str>> },
    ShowAll,
    DeleteSequences { ids: Vec<Arc<str>> },
    ToggleColumn { field: String },
    SortColumn {
        field: String,
        direction: SortDirection,
    },
}

/// The sort that produced the current display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LastSort {
    Cluster { range: Option<ResidueRange> },
    Column {
        field: String,
        direction: SortDirection,
    },
}
