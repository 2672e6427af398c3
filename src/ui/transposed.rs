use crate::config::schemes::{format_sequence_bytes, residue_style};
use crate::core::ViewState;
use crate::core::viewport::Viewport;
use crate::ui::UiState;
use crate::ui::alignment_pane::{build_ruler, render_range_highlight};
use crate::ui::layout::{AppLayout, TRANSPOSED_LABEL_WIDTH};
use crate::ui::shade::shade;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::macros::vertical;
use ratatui::style::Styled;
use ratatui::symbols::merge::MergeStrategy;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

const SELECTED_TINT_ALPHA: f32 = 0.35;

/// Residue labels, one per line, right-aligned to the label column.
fn label_lines(
    view: &ViewState,
    positions: std::ops::Range<usize>,
    ui: &UiState,
) -> Vec<Line<'static>> {
    let width = usize::from(TRANSPOSED_LABEL_WIDTH).saturating_sub(1);
    positions
        .map(|position| {
            let label = view.store().residue_label(position);
            Line::from(format!("{label:>width$} ").set_style(ui.theme_styles.success))
        })
        .collect()
}

/// One line per residue position holding that residue of every row in `rows`.
fn column_lines(
    view: &ViewState,
    positions: std::ops::Range<usize>,
    rows: &[usize],
    ui: &UiState,
) -> Vec<Line<'static>> {
    let records = view.store().records();
    positions
        .map(|position| {
            let residues: Vec<u8> = rows
                .iter()
                .map(|&index| records[index].sequence.get(position).copied().unwrap_or(b' '))
                .collect();
            Line::from(format_sequence_bytes(&residues, ui.scheme))
        })
        .collect()
}

fn consensus_lines(
    view: &ViewState,
    positions: std::ops::Range<usize>,
    ui: &UiState,
) -> Vec<Line<'static>> {
    let theme = &ui.theme_styles;
    positions
        .map(|position| {
            let residue = view
                .consensus()
                .ok()
                .and_then(|consensus| consensus.get(position).copied());
            let residue_span = match residue {
                Some(byte) => {
                    Span::styled(char::from(byte).to_string(), residue_style(byte, ui.scheme))
                }
                None => "?".set_style(theme.text_dim),
            };
            Line::from(vec!["│".set_style(theme.border), residue_span])
        })
        .collect()
}

pub fn render_transposed_pane(
    f: &mut Frame,
    layout: &AppLayout,
    view: &ViewState,
    viewport: &Viewport,
    ui: &UiState,
    rows: &[usize],
) {
    let theme = &ui.theme_styles;
    let window = viewport.window();
    let block = Block::bordered()
        .title(Line::from("Alignment (transposed)".set_style(theme.accent)))
        .border_style(theme.border)
        .style(theme.base_block)
        .merge_borders(MergeStrategy::Exact);
    let inner_area = block.inner(layout.alignment_pane);
    f.render_widget(block, layout.alignment_pane);

    let [header_area, body_area] = inner_area.layout(&vertical![==2, *=1]);
    let [_, header_grid, header_consensus] = layout.transposed_columns(header_area);
    let [label_area, grid_area, consensus_area] = layout.transposed_columns(body_area);

    let row_count = view.visible_indices().count();
    let (number_line, marker_line) = build_ruler(&window.row_range, row_count, theme);
    f.render_widget(
        Paragraph::new(vec![number_line, marker_line]).style(theme.base_block),
        header_grid,
    );
    f.render_widget(
        Paragraph::new(Line::from(" C".set_style(theme.accent))).style(theme.base_block),
        header_consensus,
    );

    let positions = window.residue_range.clone();
    f.render_widget(
        Paragraph::new(label_lines(view, positions.clone(), ui)).style(theme.base_block),
        label_area,
    );
    f.render_widget(
        Paragraph::new(column_lines(view, positions.clone(), rows, ui)).style(theme.base_block),
        grid_area,
    );
    f.render_widget(
        Paragraph::new(consensus_lines(view, positions, ui)).style(theme.base_block),
        consensus_area,
    );

    let records = view.store().records();
    for (offset, &index) in rows.iter().enumerate() {
        let column = Rect::new(grid_area.x + offset as u16, grid_area.y, 1, grid_area.height);
        if ui.selection.contains(&records[index].id) {
            shade(f, grid_area, column, ui.theme.selection_bg, SELECTED_TINT_ALPHA);
        }
        if window.row_range.start + offset == ui.cursor {
            shade(f, grid_area, column, ui.theme.surface_bg, SELECTED_TINT_ALPHA);
        }
    }
    render_range_highlight(f, ui, &window, label_area.union(grid_area), false);
}
