use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use color_eyre::{Result, eyre::eyre};
use crossterm::event::{Event, EventStream, MouseButton, MouseEvent, MouseEventKind};

use crate::config::keybindings::{self, KeyAction};
use crate::config::options::Options;
use crate::config::schemes::ColorScheme;
use crate::core::parser::{detect_sequence_type, load_store};
use crate::core::selection::DragState;
use crate::core::viewport::Viewport;
use crate::core::{CoreAction, SequenceRecord, SequenceStore, SortDirection, ViewState};
use crate::export::{ExportContext, ExportFormat, write_export};
use crate::ui::layout::{AppLayout, clamped_index_at, index_at};
use crate::ui::{LoadingState, StatusMessage, UiState, render};
use ratatui::layout::Position;
use ratatui::{DefaultTerminal, Frame};
use tokio_stream::StreamExt;
use tracing::{debug, error, info, warn};

const SCROLL_AMOUNT: usize = 1;
const SKIP_SCROLL_AMOUNT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScrollDirection {
    Up,
    Down,
    Left,
    Right,
}

impl ScrollDirection {
    /// Residues run down the screen when transposed, so the axes swap.
    fn transposed(self) -> Self {
        match self {
            ScrollDirection::Up => ScrollDirection::Left,
            ScrollDirection::Down => ScrollDirection::Right,
            ScrollDirection::Left => ScrollDirection::Up,
            ScrollDirection::Right => ScrollDirection::Down,
        }
    }
}

/// Id of the row shown at display `position` among visible rows.
fn row_id(view: &ViewState, position: usize) -> Option<Arc<str>> {
    view.visible_indices()
        .nth(position)
        .and_then(|index| view.store().get(index))
        .map(|record| Arc::clone(&record.id))
}

fn focused_field(view: &ViewState, ui: &UiState) -> Result<String> {
    view.columns()
        .columns()
        .nth(ui.focused_column)
        .map(|(_, entry)| entry.field.clone())
        .ok_or_else(|| eyre!("No metadata columns"))
}

fn describe_record(record: &SequenceRecord) -> String {
    format!(
        "{}: {} residues, chain {}, {} fields",
        record.id,
        record.sequence.len(),
        record.chain,
        record.metadata.len()
    )
}

#[derive(Debug)]
pub struct App {
    should_quit: bool,
    options: Options,
    view: Option<ViewState>,
    ui: UiState,
    viewport: Viewport,
    loading_state: LoadingState,
    loading_receiver: Option<tokio::sync::oneshot::Receiver<Result<SequenceStore>>>,
    layout: Option<AppLayout>,
}

impl App {
    pub fn new(options: Options) -> Self {
        let ui = UiState {
            transposed: options.transposed,
            ..UiState::default()
        };
        Self {
            should_quit: false,
            options,
            view: None,
            ui,
            viewport: Viewport::default(),
            loading_state: LoadingState::Loading,
            loading_receiver: None,
            layout: None,
        }
    }

    fn load_sequences(&mut self) {
        self.loading_state = LoadingState::Loading;
        let (tx, rx) = tokio::sync::oneshot::channel();
        self.loading_receiver = Some(rx);

        let file_path = self.options.file_path.clone();
        tokio::task::spawn_blocking(move || {
            let _ = tx.send(load_store(&file_path));
        });
    }

    fn on_load_success(&mut self, store: SequenceStore) {
        let sequence_type = detect_sequence_type(store.records());
        let view = ViewState::new(store, self.options.view.columns.clone());

        self.ui.scheme = self
            .options
            .color_scheme
            .unwrap_or_else(|| ColorScheme::get_default_scheme(sequence_type));
        // max size is set ahead of the first render so the jump is not clamped to zero.
        self.viewport.update_max_size(
            view.visible_indices().count(),
            view.store().sequence_length(),
            view.columns().visible_columns().count(),
        );
        self.viewport
            .jump_to_position(self.options.initial_position);

        info!(
            sequence_count = view.store().len(),
            sequence_length = view.store().sequence_length(),
            sequence_type = ?sequence_type,
            scheme = self.ui.scheme.name(),
            "sequences loaded"
        );
        self.view = Some(view);
        self.loading_state = LoadingState::Loaded;
    }

    fn on_load_failure(&mut self, message: String) {
        error!(error = %message, "failed to load sequences");
        self.loading_state = LoadingState::Failed(message);
    }

    fn scroll(&mut self, direction: ScrollDirection, amount: usize) {
        let direction = if self.ui.transposed {
            direction.transposed()
        } else {
            direction
        };
        match direction {
            ScrollDirection::Up => self.viewport.scroll_up(amount),
            ScrollDirection::Down => self.viewport.scroll_down(amount),
            ScrollDirection::Left => self.viewport.scroll_left(amount),
            ScrollDirection::Right => self.viewport.scroll_right(amount),
        }
    }

    fn execute_action(&mut self, action: KeyAction) {
        self.ui.status = None;
        match action {
            KeyAction::Quit => self.should_quit = true,
            KeyAction::CycleColorScheme => self.ui.scheme = ColorScheme::cycle(self.ui.scheme),
            KeyAction::ToggleTransposed => self.ui.transposed = !self.ui.transposed,
            KeyAction::ScrollDown => self.scroll(ScrollDirection::Down, SCROLL_AMOUNT),
            KeyAction::SkipDown => self.scroll(ScrollDirection::Down, SKIP_SCROLL_AMOUNT),
            KeyAction::ScrollUp => self.scroll(ScrollDirection::Up, SCROLL_AMOUNT),
            KeyAction::SkipUp => self.scroll(ScrollDirection::Up, SKIP_SCROLL_AMOUNT),
            KeyAction::ScrollLeft => self.scroll(ScrollDirection::Left, SCROLL_AMOUNT),
            KeyAction::SkipLeft => self.scroll(ScrollDirection::Left, SKIP_SCROLL_AMOUNT),
            KeyAction::ScrollRight => self.scroll(ScrollDirection::Right, SCROLL_AMOUNT),
            KeyAction::SkipRight => self.scroll(ScrollDirection::Right, SKIP_SCROLL_AMOUNT),
            KeyAction::ScrollFieldsLeft => self.viewport.scroll_fields_left(SCROLL_AMOUNT),
            KeyAction::ScrollFieldsRight => self.viewport.scroll_fields_right(SCROLL_AMOUNT),
            KeyAction::JumpToStart => self.viewport.jump_to_position(0),
            KeyAction::JumpToEnd => self.viewport.jump_to_position(usize::MAX),
            KeyAction::ClearRange => self.ui.range.clear(),
            KeyAction::ClearSelection => self.ui.selection.clear(),
            _ => {
                if let Err(e) = self.execute_view_action(action) {
                    warn!(action = ?action, error = %e, "action failed");
                    self.ui.set_status(StatusMessage::error(e.to_string()));
                }
            }
        }
    }

    fn execute_view_action(&mut self, action: KeyAction) -> Result<()> {
        let Some(view) = self.view.as_mut() else {
            return Ok(());
        };

        match action {
            KeyAction::ClusterSort => {
                let range = self.ui.range.range();
                view.apply_action(CoreAction::ClusterSort { range })?;
                let label = match range {
                    Some(range) => format!("{}-{}", range.start + 1, range.stop + 1),
                    None => "all residues".to_string(),
                };
                self.ui
                    .set_status(StatusMessage::info(format!("Clustered over {label}")));
            }
            KeyAction::HideSelected => {
                if self.ui.selection.is_empty() {
                    return Err(eyre!("No sequences selected"));
                }
                let ids = self.ui.selection.ids().to_vec();
                view.apply_action(CoreAction::HideSequences { ids })?;
                self.ui.selection.clear();
            }
            KeyAction::ShowAll => view.apply_action(CoreAction::ShowAll)?,
            KeyAction::DeleteSelected => {
                if self.ui.selection.is_empty() {
                    return Err(eyre!("No sequences selected"));
                }
                let ids = self.ui.selection.ids().to_vec();
                let count = ids.len();
                view.apply_action(CoreAction::DeleteSequences { ids })?;
                self.ui.selection.clear();
                self.ui
                    .set_status(StatusMessage::info(format!("Deleted {count} sequences")));
            }
            KeyAction::ToggleRowSelection => {
                if let Some(id) = row_id(view, self.ui.cursor) {
                    self.ui.selection.toggle(&id);
                }
            }
            KeyAction::ActivateRow => {
                let id = row_id(view, self.ui.cursor)
                    .ok_or_else(|| eyre!("No sequence under the cursor"))?;
                let mut details = String::new();
                view.activate_row(&id, &mut |record: &SequenceRecord| {
                    details = describe_record(record);
                })?;
                self.ui.set_status(StatusMessage::info(details));
            }
            KeyAction::CursorUp => self.ui.move_cursor(-1, view.visible_indices().count()),
            KeyAction::CursorDown => self.ui.move_cursor(1, view.visible_indices().count()),
            KeyAction::FocusPreviousColumn => {
                self.ui
                    .move_focused_column(-1, view.columns().columns().count());
            }
            KeyAction::FocusNextColumn => {
                self.ui
                    .move_focused_column(1, view.columns().columns().count());
            }
            KeyAction::ToggleFocusedColumn => {
                let field = focused_field(view, &self.ui)?;
                view.apply_action(CoreAction::ToggleColumn { field })?;
            }
            KeyAction::SortAscending | KeyAction::SortDescending => {
                let field = focused_field(view, &self.ui)?;
                let direction = if action == KeyAction::SortAscending {
                    SortDirection::Ascending
                } else {
                    SortDirection::Descending
                };
                view.apply_action(CoreAction::SortColumn { field, direction })?;
            }
            KeyAction::ExportFasta | KeyAction::ExportCsv | KeyAction::ExportXml => {
                let format = match action {
                    KeyAction::ExportCsv => ExportFormat::Csv,
                    KeyAction::ExportXml => ExportFormat::Xml,
                    _ => ExportFormat::Fasta,
                };
                let path = PathBuf::from(format.default_file_name());
                let context = ExportContext {
                    selection: &self.ui.selection,
                    scheme: self.ui.scheme,
                    regions: &self.options.view.regions,
                };
                write_export(&path, format, view, context)?;
                self.ui.set_status(StatusMessage::info(format!(
                    "Exported to {}",
                    path.display()
                )));
            }
            _ => {}
        }

        let row_count = view.visible_indices().count();
        self.ui.clamp_cursor(row_count);
        self.viewport.scroll_to_row(self.ui.cursor);
        Ok(())
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let wheel = match mouse.kind {
            MouseEventKind::ScrollDown => Some(ScrollDirection::Down),
            MouseEventKind::ScrollUp => Some(ScrollDirection::Up),
            _ => None,
        };
        if let Some(direction) = wheel {
            self.scroll(direction, SCROLL_AMOUNT);
            return;
        }
        let (Some(view), Some(layout)) = (self.view.as_ref(), self.layout) else {
            return;
        };

        let position = Position::new(mouse.column, mouse.row);
        let window = self.viewport.window();
        let row_count = self.viewport.max_size.rows;
        let residue_count = self.viewport.max_size.residues;
        // residues run along x normally and along y when transposed; rows are the other axis.
        let (range_area, row_area) = if layout.transposed {
            (layout.transposed_label_area(), layout.alignment_rows_area())
        } else {
            (layout.alignment_rows_area(), layout.sequence_id_rows_area())
        };
        let residues_along_x = !layout.transposed;

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(column) = index_at(
                    range_area,
                    position,
                    residues_along_x,
                    window.residue_range.start,
                    residue_count,
                ) {
                    self.ui.range.mouse_down(column);
                } else if let Some(row) = index_at(
                    row_area,
                    position,
                    !residues_along_x,
                    window.row_range.start,
                    row_count,
                ) {
                    if let Some(id) = row_id(view, row) {
                        self.ui.selection.toggle(&id);
                    }
                    self.ui.cursor = row;
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(column) = clamped_index_at(
                    range_area,
                    position,
                    residues_along_x,
                    window.residue_range.start,
                    residue_count,
                ) {
                    self.ui.range.mouse_drag(column);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if self.ui.range.state() == DragState::Idle {
                    return;
                }
                let message = match self.ui.range.mouse_up() {
                    Some(range) => format!("Range {}-{} selected", range.start + 1, range.stop + 1),
                    None => "Range cleared".to_string(),
                };
                debug!(range = ?self.ui.range.range(), "range gesture finished");
                self.ui.set_status(StatusMessage::info(message));
            }
            _ => {}
        }
    }

    fn handle_event(&mut self, event: &Event) {
        if let Some(key) = event.as_key_press_event() {
            if let Some(action) = keybindings::lookup(key.code, key.modifiers) {
                self.execute_action(action);
            }
            return;
        }
        if let Event::Mouse(mouse) = event {
            self.handle_mouse(*mouse);
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        self.layout = render(
            frame,
            self.view.as_ref(),
            &self.ui,
            &mut self.viewport,
            &self.loading_state,
            &self.options.file_path,
        );
    }

    pub async fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        self.load_sequences();

        let period = Duration::from_secs_f32(1.0 / self.options.fps);
        let mut interval = tokio::time::interval(period);
        let mut events = EventStream::new();

        while !self.should_quit {
            tokio::select! {
                _ = interval.tick() => { terminal.draw(|frame| { self.render(frame) })?; },
                Some(Ok(event)) = events.next() => self.handle_event(&event),
                result = async {
                    if let Some(receiver) = &mut self.loading_receiver {
                        receiver.await
                    } else {
                        std::future::pending().await
                    }
                } => {
                    self.loading_receiver = None;
                    match result {
                        Ok(Ok(store)) => self.on_load_success(store),
                        Ok(Err(e)) => self.on_load_failure(e.to_string()),
                        Err(_) => self.on_load_failure("loader stopped before finishing".to_string()),
                    }
                },
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{MetadataField, MetadataValue};

    fn record(id: &str, sequence: &[u8], score: f64) -> SequenceRecord {
        let mut record = SequenceRecord::new(id, sequence);
        record.metadata.push(MetadataField {
            name: "combined.General.score".to_string(),
            value: MetadataValue::Number(score),
        });
        record
    }

    fn loaded_app() -> App {
        let mut app = App::new(Options::default());
        let store = SequenceStore::new(vec![
            record("a", b"AAAAA", 3.0),
            record("b", b"CCCCC", 1.0),
            record("c", b"AAAAC", 2.0),
        ])
        .unwrap();
        app.on_load_success(store);
        app.viewport.update_dimensions(2, 5, 1);
        app
    }

    fn visible_ids(app: &App) -> Vec<String> {
        let view = app.view.as_ref().unwrap();
        view.visible_records()
            .map(|record| record.id.to_string())
            .collect()
    }

    #[test]
    fn hiding_selected_rows_clears_selection() {
        let mut app = loaded_app();
        app.execute_action(KeyAction::CursorDown);
        app.execute_action(KeyAction::ToggleRowSelection);
        assert!(app.ui.selection.contains("b"));

        app.execute_action(KeyAction::HideSelected);
        assert_eq!(visible_ids(&app), vec!["a", "c"]);
        assert!(app.ui.selection.is_empty());

        app.execute_action(KeyAction::ShowAll);
        assert_eq!(visible_ids(&app), vec!["a", "b", "c"]);
    }

    #[test]
    fn hiding_without_selection_reports_error() {
        let mut app = loaded_app();
        app.execute_action(KeyAction::HideSelected);
        let status = app.ui.status.as_ref().unwrap();
        assert_eq!(status.text, "No sequences selected");
    }

    #[test]
    fn focused_column_sorts_rows() {
        let mut app = loaded_app();
        app.execute_action(KeyAction::SortDescending);
        assert_eq!(visible_ids(&app), vec!["a", "c", "b"]);
        app.execute_action(KeyAction::SortAscending);
        assert_eq!(visible_ids(&app), vec!["b", "c", "a"]);
    }

    #[test]
    fn cursor_keeps_viewport_in_view() {
        let mut app = loaded_app();
        app.execute_action(KeyAction::CursorDown);
        app.execute_action(KeyAction::CursorDown);
        app.execute_action(KeyAction::CursorDown);
        assert_eq!(app.ui.cursor, 2);
        assert_eq!(app.viewport.offsets.rows, 1);
    }

    #[test]
    fn transposed_scrolling_swaps_axes() {
        let mut app = loaded_app();
        app.viewport.update_dimensions(1, 2, 1);
        app.execute_action(KeyAction::ToggleTransposed);
        app.execute_action(KeyAction::ScrollDown);
        assert_eq!(app.viewport.offsets.residues, 1);
        assert_eq!(app.viewport.offsets.rows, 0);
        app.execute_action(KeyAction::ScrollRight);
        assert_eq!(app.viewport.offsets.rows, 1);
    }

    #[test]
    fn activating_row_reports_details() {
        let mut app = loaded_app();
        app.execute_action(KeyAction::ActivateRow);
        let status = app.ui.status.as_ref().unwrap();
        assert!(status.text.starts_with("a: 5 residues"));
    }
}
