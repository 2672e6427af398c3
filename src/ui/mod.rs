pub mod alignment_pane;
pub mod consensus_pane;
pub mod data_table_pane;
pub mod frame;
pub mod layout;
pub mod render;
pub mod sequence_id_pane;
pub mod shade;
pub mod state;
pub mod transposed;
pub mod utils;

pub use alignment_pane::render_alignment_pane;
pub use consensus_pane::render_consensus_pane;
pub use data_table_pane::render_data_table_pane;
pub use frame::render_frame;
pub use render::render;
pub use sequence_id_pane::render_sequence_id_pane;
pub use state::{LoadingState, StatusMessage, UiState};
