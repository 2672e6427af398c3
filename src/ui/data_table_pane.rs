use crate::core::columns::ColumnEntry;
use crate::core::{ColumnCode, ViewState};
use crate::ui::UiState;
use crate::ui::layout::AppLayout;
use crate::ui::utils::truncate_label;
use ratatui::Frame;
use ratatui::style::Styled;
use ratatui::symbols::merge::MergeStrategy;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use std::ops::Range;

/// characters per data table cell, separator excluded.
pub const COLUMN_WIDTH: usize = 12;

/// Number of whole columns that fit in `width` cells.
#[must_use]
pub fn columns_that_fit(width: usize) -> usize {
    (width + 1) / (COLUMN_WIDTH + 1)
}

fn sort_icon(code: ColumnCode) -> &'static str {
    match code.wire_code() {
        2 => "▲",
        3 => "▼",
        _ => "",
    }
}

fn cell(text: &str) -> String {
    format!("{:<COLUMN_WIDTH$} ", truncate_label(text, COLUMN_WIDTH))
}

fn header_name(entry: &ColumnEntry) -> String {
    let icon = sort_icon(entry.code);
    if icon.is_empty() {
        entry.bare_name().to_string()
    } else {
        let name = truncate_label(entry.bare_name(), COLUMN_WIDTH.saturating_sub(2));
        format!("{name} {icon}")
    }
}

pub fn render_data_table_pane(
    f: &mut Frame,
    layout: &AppLayout,
    view: &ViewState,
    ui: &UiState,
    field_range: &Range<usize>,
    rows: &[usize],
) {
    if layout.data_table_pane.is_empty() {
        return;
    }
    let theme = &ui.theme_styles;
    let block = Block::bordered()
        .title(Line::from("Data".set_style(theme.accent)))
        .border_style(theme.border)
        .style(theme.base_block)
        .merge_borders(MergeStrategy::Exact);
    let inner_area = block.inner(layout.data_table_pane);
    f.render_widget(block, layout.data_table_pane);

    let focused_field = view
        .columns()
        .columns()
        .nth(ui.focused_column)
        .map(|(_, entry)| entry.field.as_str());
    let columns: Vec<(&str, &ColumnEntry)> = view
        .columns()
        .visible_columns()
        .skip(field_range.start)
        .take(field_range.len())
        .collect();

    let mut chain_line = Vec::with_capacity(columns.len());
    let mut name_line = Vec::with_capacity(columns.len());
    for (chain, entry) in &columns {
        let name_style = if Some(entry.field.as_str()) == focused_field {
            theme.selection
        } else {
            theme.accent
        };
        chain_line.push(cell(chain).set_style(theme.text_dim));
        name_line.push(Span::styled(cell(&header_name(entry)), name_style));
    }

    let records = view.store().records();
    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(Line::from(chain_line));
    lines.push(Line::from(name_line));
    for &index in rows {
        let record = &records[index];
        let spans: Vec<Span> = columns
            .iter()
            .map(|(_, entry)| {
                let text = record
                    .field(&entry.field)
                    .map(|value| value.as_text().into_owned())
                    .unwrap_or_default();
                cell(&text).set_style(theme.text)
            })
            .collect();
        lines.push(Line::from(spans));
    }

    f.render_widget(Paragraph::new(lines).style(theme.base_block), inner_area);
}
