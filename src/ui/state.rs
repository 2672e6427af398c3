use crate::config::schemes::ColorScheme;
use crate::config::theme::{EVERFOREST_DARK, Theme, ThemeStyles, build_theme_styles};
use crate::core::{RangeSelector, RowSelection};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadingState {
    #[default]
    Loading,
    Loaded,
    Failed(String),
}

impl std::fmt::Display for LoadingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadingState::Loading => write!(f, "Status: Loading sequences..."),
            LoadingState::Loaded => write!(f, "Status: Loaded"),
            LoadingState::Failed(_) => write!(f, "Status: Failed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

/// One-line message shown in the bottom status bar until the next action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
        }
    }
}

/// Front-end state that never reaches the core: gestures, cursor and presentation.
#[derive(Debug)]
pub struct UiState {
    pub theme: Theme,
    pub theme_styles: ThemeStyles,
    pub scheme: ColorScheme,
    pub transposed: bool,
    pub range: RangeSelector,
    pub selection: RowSelection,
    /// Display position of the cursor among visible rows.
    pub cursor: usize,
    /// Index into every column of the data table, hidden ones included.
    pub focused_column: usize,
    pub status: Option<StatusMessage>,
}

impl Default for UiState {
    fn default() -> Self {
        let theme = EVERFOREST_DARK;
        Self {
            theme,
            theme_styles: build_theme_styles(theme),
            scheme: ColorScheme::default(),
            transposed: false,
            range: RangeSelector::default(),
            selection: RowSelection::default(),
            cursor: 0,
            focused_column: 0,
            status: None,
        }
    }
}

impl UiState {
    pub fn move_cursor(&mut self, delta: isize, row_count: usize) {
        if row_count == 0 {
            self.cursor = 0;
            return;
        }
        let target = self.cursor.saturating_add_signed(delta);
        self.cursor = target.min(row_count - 1);
    }

    pub fn clamp_cursor(&mut self, row_count: usize) {
        self.cursor = self.cursor.min(row_count.saturating_sub(1));
    }

    pub fn move_focused_column(&mut self, delta: isize, column_count: usize) {
        if column_count == 0 {
            self.focused_column = 0;
            return;
        }
        let target = self.focused_column.saturating_add_signed(delta);
        self.focused_column = target.min(column_count - 1);
    }

    pub fn set_status(&mut self, status: StatusMessage) {
        self.status = Some(status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_stays_inside_rows() {
        let mut ui = UiState::default();
        ui.move_cursor(5, 3);
        assert_eq!(ui.cursor, 2);
        ui.move_cursor(-10, 3);
        assert_eq!(ui.cursor, 0);
        ui.cursor = 7;
        ui.clamp_cursor(4);
        assert_eq!(ui.cursor, 3);
        ui.move_cursor(1, 0);
        assert_eq!(ui.cursor, 0);
    }

    #[test]
    fn focused_column_is_bounded() {
        let mut ui = UiState::default();
        ui.move_focused_column(1, 2);
        ui.move_focused_column(1, 2);
        assert_eq!(ui.focused_column, 1);
        ui.move_focused_column(-1, 2);
        assert_eq!(ui.focused_column, 0);
    }

    #[test]
    fn loading_state_display() {
        assert_eq!(LoadingState::Loaded.to_string(), "Status: Loaded");
        assert_eq!(
            LoadingState::Failed("boom".to_string()).to_string(),
            "Status: Failed"
        );
    }
}
