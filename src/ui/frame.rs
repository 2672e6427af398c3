use crate::config::theme::ThemeStyles;
use crate::core::{ColumnCode, LastSort, SortDirection, ViewState};
use crate::ui::state::{LoadingState, StatusKind};
use crate::ui::UiState;
use crate::ui::utils::truncate_label;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Styled;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use std::path::Path;

/// maximum displayed character count for a column name in the status bar before truncation
const STATUS_BAR_COLUMN_NAME_MAX_CHARS: usize = 25;

fn direction_label(direction: SortDirection) -> &'static str {
    match direction {
        SortDirection::Ascending => "asc",
        SortDirection::Descending => "desc",
    }
}

fn sort_label(last_sort: Option<&LastSort>) -> String {
    match last_sort {
        None => "Sort: none".to_string(),
        Some(LastSort::Cluster { range: None }) => "Sort: cluster (all)".to_string(),
        Some(LastSort::Cluster { range: Some(range) }) => {
            format!("Sort: cluster {}-{}", range.start + 1, range.stop + 1)
        }
        Some(LastSort::Column { field, direction }) => {
            format!("Sort: {field} {}", direction_label(*direction))
        }
    }
}

fn column_state_label(code: ColumnCode) -> &'static str {
    match code {
        ColumnCode::Hidden => "hidden",
        ColumnCode::Visible => "shown",
        ColumnCode::SortedAscending => "sorted asc",
        ColumnCode::SortedDescending => "sorted desc",
    }
}

fn build_bottom_status_bar(
    view: &ViewState,
    ui: &UiState,
    theme: &ThemeStyles,
) -> Vec<Span<'static>> {
    let store = view.store();
    let mut parts = vec![
        format!("{}/{} sequences", store.visible_count(), store.len()).set_style(theme.text_dim),
    ];

    if !ui.selection.is_empty() {
        parts.push(Span::raw(" | "));
        parts.push(format!("{} selected", ui.selection.len()).set_style(theme.warning));
    }

    parts.push(Span::raw(" | "));
    let range_label = match ui.range.range() {
        Some(range) => format!("Range: {}-{}", range.start + 1, range.stop + 1),
        None => "Range: all".to_string(),
    };
    parts.push(range_label.set_style(theme.accent_alt));

    parts.push(Span::raw(" | "));
    parts.push(sort_label(view.last_sort()).set_style(theme.text_dim));

    if let Some((_, entry)) = view.columns().columns().nth(ui.focused_column) {
        let name = truncate_label(&entry.field, STATUS_BAR_COLUMN_NAME_MAX_CHARS);
        parts.push(Span::raw(" | "));
        parts.push(
            format!("Column: {name} ({})", column_state_label(entry.code)).set_style(theme.accent),
        );
    }
    parts
}

fn build_top_status_bar(
    file_path: &Path,
    loading_state: &LoadingState,
    ui: &UiState,
    theme: &ThemeStyles,
) -> Vec<Span<'static>> {
    let file_name = file_path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("Unknown");

    let loading_style = match loading_state {
        LoadingState::Loading => theme.text_dim,
        LoadingState::Loaded => theme.success,
        LoadingState::Failed(_) => theme.error,
    };

    let mut parts = vec![
        format!("File: {file_name}").set_style(theme.text_dim),
        Span::raw(" | "),
        loading_state.to_string().set_style(loading_style),
        Span::raw(" | "),
        format!("Scheme: {}", ui.scheme.name()).set_style(theme.text_dim),
    ];
    if ui.transposed {
        parts.push(Span::raw(" | "));
        parts.push("Transposed".set_style(theme.accent_alt));
    }
    parts
}

pub fn render_frame(
    f: &mut Frame,
    top_status_area: Rect,
    bottom_status_area: Rect,
    view: Option<&ViewState>,
    loading_state: &LoadingState,
    file_path: &Path,
    ui: &UiState,
) {
    let theme = &ui.theme_styles;

    if top_status_area.height > 0 {
        let top_line = Line::from(build_top_status_bar(file_path, loading_state, ui, theme))
            .right_aligned();
        f.render_widget(Paragraph::new(top_line), top_status_area);
    }
    if bottom_status_area.height == 0 {
        return;
    }

    let left_line = view
        .map(|view| Line::from(build_bottom_status_bar(view, ui, theme)).left_aligned())
        .unwrap_or_default();
    let right_line = match &ui.status {
        Some(status) => {
            let style = match status.kind {
                StatusKind::Info => theme.success,
                StatusKind::Error => theme.error,
            };
            Line::from(status.text.clone().set_style(style)).right_aligned()
        }
        None => Line::from("Press 'q' to quit".set_style(theme.text_dim)).right_aligned(),
    };
    f.render_widget(
        Paragraph::new(left_line).style(theme.panel_block),
        bottom_status_area,
    );
    f.render_widget(
        Paragraph::new(right_line).style(theme.panel_block),
        bottom_status_area,
    );
}
