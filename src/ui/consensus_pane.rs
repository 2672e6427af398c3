use crate::config::schemes::format_sequence_bytes;
use crate::core::ViewState;
use crate::core::viewport::ViewportWindow;
use crate::ui::UiState;
use crate::ui::layout::AppLayout;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Styled, Stylize};
use ratatui::symbols::merge::MergeStrategy;
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph};

pub fn render_consensus_pane(
    f: &mut Frame,
    layout: &AppLayout,
    view: &ViewState,
    window: &ViewportWindow,
    ui: &UiState,
) {
    render_consensus_label_pane(layout.consensus_label_pane, ui, f);
    render_consensus_row(layout.consensus_pane, view, window, ui, f);
}

fn render_consensus_label_pane(area: Rect, ui: &UiState, f: &mut Frame) {
    let theme = &ui.theme_styles;
    let block = Block::bordered()
        .border_style(theme.border)
        .style(theme.base_block)
        .merge_borders(MergeStrategy::Exact);
    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let label = Paragraph::new(Line::from("Consensus:".set_style(theme.accent)))
        .style(theme.base_block);
    f.render_widget(label, inner_area);
}

fn render_consensus_row(
    area: Rect,
    view: &ViewState,
    window: &ViewportWindow,
    ui: &UiState,
    f: &mut Frame,
) {
    let theme = &ui.theme_styles;
    let block = Block::bordered()
        .border_style(theme.border)
        .style(theme.base_block)
        .merge_borders(MergeStrategy::Exact);
    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let line = match view.consensus() {
        Ok(consensus) => {
            let end = window.residue_range.end.min(consensus.len());
            let start = window.residue_range.start.min(end);
            Line::from(format_sequence_bytes(&consensus[start..end], ui.scheme))
        }
        Err(error) => Line::from(format!("No consensus: {error}").fg(ui.theme.text_dim).italic()),
    };
    f.render_widget(Paragraph::new(line).style(theme.base_block), inner_area);
}
