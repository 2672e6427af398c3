use crate::core::ViewState;
use crate::ui::UiState;
use crate::ui::layout::AppLayout;
use ratatui::Frame;
use ratatui::style::{Style, Styled};
use ratatui::symbols::merge::MergeStrategy;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

fn build_sequence_id_line(
    ui: &UiState,
    display_position: usize,
    id: &str,
    width: usize,
    is_selected: bool,
    is_cursor: bool,
) -> Line<'static> {
    let theme = &ui.theme_styles;
    let marker = if is_selected { "● " } else { "  " };
    let marker_span = marker.set_style(theme.warning);
    let number = format!("{} ", display_position + 1);
    let id_width = width.saturating_sub(number.chars().count() + 2);
    let id_slice: String = id.chars().take(id_width).collect();

    let id_style = if is_selected { theme.selection } else { theme.text };
    let mut line = Line::from(vec![
        marker_span,
        number.set_style(theme.success),
        Span::styled(id_slice, id_style),
    ]);
    if is_cursor {
        line = line.style(Style::new().patch(theme.cursor));
    }
    line
}

pub fn render_sequence_id_pane(
    f: &mut Frame,
    layout: &AppLayout,
    view: &ViewState,
    ui: &UiState,
    first_position: usize,
    rows: &[usize],
) {
    let theme = &ui.theme_styles;
    let title = if ui.selection.is_empty() {
        "Sequence Name".to_string()
    } else {
        format!("Sequence Name ({} selected)", ui.selection.len())
    };
    let block = Block::bordered()
        .title(Line::from(title.set_style(theme.accent)))
        .border_style(theme.border)
        .style(theme.base_block)
        .merge_borders(MergeStrategy::Exact);
    let inner_area = block.inner(layout.sequence_id_pane);
    f.render_widget(block, layout.sequence_id_pane);

    let records = view.store().records();
    let width = inner_area.width as usize;
    // blank lines where the alignment ruler sits, so rows stay aligned.
    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(Line::from(" "));
    lines.push(Line::from(" "));
    for (offset, &index) in rows.iter().enumerate() {
        let record = &records[index];
        let display_position = first_position + offset;
        lines.push(build_sequence_id_line(
            ui,
            display_position,
            &record.id,
            width,
            ui.selection.contains(&record.id),
            display_position == ui.cursor,
        ));
    }

    let paragraph = Paragraph::new(lines).style(theme.base_block);
    f.render_widget(paragraph, inner_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn id_line_truncates_to_width() {
        let ui = UiState::default();
        let line = build_sequence_id_line(&ui, 8, "a-very-long-identifier", 12, true, false);
        assert_eq!(line_text(&line), "● 9 a-very-l");
    }

    #[test]
    fn unselected_line_has_blank_marker() {
        let ui = UiState::default();
        let line = build_sequence_id_line(&ui, 0, "mab1", 20, false, true);
        assert_eq!(line_text(&line), "  1 mab1");
    }
}
