use crate::core::ViewState;
use crate::core::viewport::Viewport;
use crate::ui::UiState;
use crate::ui::alignment_pane::render_alignment_pane;
use crate::ui::consensus_pane::render_consensus_pane;
use crate::ui::data_table_pane::{columns_that_fit, render_data_table_pane};
use crate::ui::frame::render_frame;
use crate::ui::layout::{AppLayout, FrameLayout};
use crate::ui::sequence_id_pane::render_sequence_id_pane;
use crate::ui::state::LoadingState;
use crate::ui::transposed::render_transposed_pane;
use ratatui::Frame;
use ratatui::layout::{HorizontalAlignment, Rect};
use ratatui::macros::vertical;
use ratatui::style::Styled;
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph};
use std::path::Path;

/// Builds the pane layout for this frame and sizes the viewport to it.
pub fn layout_view(area: Rect, view: &ViewState, ui: &UiState, viewport: &mut Viewport) -> AppLayout {
    let visible_columns = view.columns().visible_columns().count();
    let row_count = view.visible_indices().count();
    let sequence_length = view.store().sequence_length();

    if ui.transposed {
        let layout = AppLayout::transposed(area);
        let grid = layout.alignment_rows_area();
        viewport.update_max_size(row_count, sequence_length, 0);
        viewport.update_dimensions(grid.width as usize, grid.height as usize, 0);
        return layout;
    }

    let layout = AppLayout::new(area, visible_columns > 0);
    let rows_area = layout.alignment_rows_area();
    let fields = columns_that_fit(layout.data_table_rows_area().width as usize);
    viewport.update_max_size(row_count, sequence_length, visible_columns);
    viewport.update_dimensions(rows_area.height as usize, rows_area.width as usize, fields);
    layout
}

fn render_message(f: &mut Frame, area: Rect, ui: &UiState, message: Line<'static>) {
    let theme = &ui.theme_styles;
    let block = Block::bordered()
        .border_style(theme.border)
        .style(theme.base_block);
    let inner_area = block.inner(area);
    f.render_widget(block, area);
    let [_, message_area, _] = inner_area.layout(&vertical![*=1, ==1, *=1]);
    let paragraph = Paragraph::new(message)
        .alignment(HorizontalAlignment::Center)
        .style(theme.base_block);
    f.render_widget(paragraph, message_area);
}

/// Draws one frame and returns the pane layout used, for mouse hit testing.
pub fn render(
    f: &mut Frame,
    view: Option<&ViewState>,
    ui: &UiState,
    viewport: &mut Viewport,
    loading_state: &LoadingState,
    file_path: &Path,
) -> Option<AppLayout> {
    let full_area = f.area();
    if full_area.height == 0 {
        return None;
    }
    let frame_layout = FrameLayout::new(full_area);
    render_frame(
        f,
        frame_layout.top_status_area,
        frame_layout.bottom_status_area,
        view,
        loading_state,
        file_path,
        ui,
    );

    let Some(view) = view else {
        let message = match loading_state {
            LoadingState::Failed(error) => Line::from(
                format!("Failed to load sequences: {error}").set_style(ui.theme_styles.error),
            ),
            _ => Line::from("Loading sequences...".set_style(ui.theme_styles.text_dim)),
        };
        render_message(f, frame_layout.content_area, ui, message);
        return None;
    };

    let layout = layout_view(frame_layout.content_area, view, ui, viewport);
    let window = viewport.window();
    let rows: Vec<usize> = view
        .visible_indices()
        .skip(window.row_range.start)
        .take(window.row_range.len())
        .collect();

    if ui.transposed {
        render_transposed_pane(f, &layout, view, viewport, ui, &rows);
        return Some(layout);
    }

    // sequence ID pane (left pane).
    render_sequence_id_pane(f, &layout, view, ui, window.row_range.start, &rows);
    // data table (middle pane, absent when every column is hidden).
    render_data_table_pane(f, &layout, view, ui, &window.field_range, &rows);
    // alignment pane (top-right pane).
    render_alignment_pane(f, &layout, view, viewport, ui, &rows);
    // consensus pane (bottom pane).
    render_consensus_pane(f, &layout, view, &window, ui);
    Some(layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ColumnOptions, MetadataField, MetadataValue, SequenceRecord, SequenceStore};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn view() -> ViewState {
        let mut first = SequenceRecord::new("mab1", b"EVQLVESGGG");
        first.metadata.push(MetadataField {
            name: "heavy.General.species".to_string(),
            value: MetadataValue::Text("human".to_string()),
        });
        let second = SequenceRecord::new("mab2", b"EVQLQQSGAE");
        let options = ColumnOptions {
            default_visible: vec!["species".to_string()],
            search_terms: Vec::new(),
        };
        ViewState::new(SequenceStore::new(vec![first, second]).unwrap(), options)
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn renders_all_panes() {
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        let view = view();
        let ui = UiState::default();
        let mut viewport = Viewport::default();
        terminal
            .draw(|f| {
                render(f, Some(&view), &ui, &mut viewport, &LoadingState::Loaded, Path::new("abs.json"));
            })
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Sequence Name"));
        assert!(text.contains("mab2"));
        assert!(text.contains("species"));
        assert!(text.contains("human"));
        assert!(text.contains("EVQLVESGGG"));
        assert!(text.contains("Consensus:"));
        assert!(text.contains("File: abs.json"));
        assert_eq!(viewport.max_size.rows, 2);
        assert_eq!(viewport.max_size.fields, 1);
    }

    #[test]
    fn renders_transposed_grid() {
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        let view = view();
        let ui = UiState {
            transposed: true,
            ..UiState::default()
        };
        let mut viewport = Viewport::default();
        terminal
            .draw(|f| {
                render(f, Some(&view), &ui, &mut viewport, &LoadingState::Loaded, Path::new("abs.json"));
            })
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Alignment (transposed)"));
        assert!(text.contains("QQ"));
        assert_eq!(viewport.dims.residues, 20 - 2 - 2 - 2);
    }

    #[test]
    fn loading_failure_is_shown() {
        let mut terminal = Terminal::new(TestBackend::new(80, 10)).unwrap();
        let ui = UiState::default();
        let mut viewport = Viewport::default();
        let state = LoadingState::Failed("bad file".to_string());
        terminal
            .draw(|f| {
                render(f, None, &ui, &mut viewport, &state, Path::new("abs.json"));
            })
            .unwrap();

        assert!(buffer_text(&terminal).contains("Failed to load sequences: bad file"));
    }
}
