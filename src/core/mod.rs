pub mod cluster;
pub mod columns;
pub mod command;
pub mod consensus;
pub mod core_state;
pub mod data;
pub mod distance;
pub mod error;
pub mod normalize;
pub mod order;
pub mod parser;
pub mod selection;
pub mod viewport;

pub use columns::{ColumnCode, ColumnOptions, ColumnState, SearchTerm, SortDirection};
pub use command::{CoreAction, LastSort};
pub use core_state::{RowActivation, ViewState};
pub use data::{MetadataField, MetadataValue, SequenceRecord, SequenceStore};
pub use distance::ResidueRange;
pub use error::CoreError;
pub use order::DisplayOrder;
pub use selection::{RangeSelector, RowSelection};
pub use viewport::Viewport;
