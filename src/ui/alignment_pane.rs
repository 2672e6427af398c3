use crate::config::schemes::format_sequence_bytes;
use crate::config::theme::ThemeStyles;
use crate::core::ViewState;
use crate::core::viewport::{Viewport, ViewportWindow};
use crate::ui::UiState;
use crate::ui::layout::AppLayout;
use crate::ui::shade::shade;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::macros::vertical;
use ratatui::style::Styled;
use ratatui::symbols::merge::MergeStrategy;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use std::ops::Range;

/// strength of the residue range tint over sequence rows.
const RANGE_TINT_ALPHA: f32 = 0.45;

fn add_number_to_ruler(
    number_line: &mut [Span],
    centre_pos: usize,
    number: usize,
    theme: &ThemeStyles,
) {
    let number_string = number.to_string();
    let number_length = number_string.len();
    let ruler_width = number_line.len();

    let start_idx = centre_pos
        .saturating_sub(number_length / 2)
        .min(ruler_width.saturating_sub(number_length));

    for (i, digit) in number_string.chars().enumerate() {
        if let Some(cell) = number_line.get_mut(start_idx + i) {
            *cell = digit.to_string().set_style(theme.accent);
        }
    }
}

/// Two ruler lines (numbers, tick marks) for the 1-based positions in `range`.
pub fn build_ruler(
    range: &Range<usize>,
    total: usize,
    theme: &ThemeStyles,
) -> (Line<'static>, Line<'static>) {
    let width = range.end.saturating_sub(range.start);
    let mut number_line = vec![Span::raw(" "); width];
    let mut marker_line = vec![Span::raw(" "); width];

    for (i, marker_span) in marker_line.iter_mut().enumerate() {
        let display_pos = range.start + i + 1;
        if display_pos > total {
            break;
        }

        if display_pos == 1 || display_pos.is_multiple_of(5) {
            let is_major_tick = display_pos.is_multiple_of(10);

            *marker_span = if is_major_tick {
                "|".set_style(theme.accent)
            } else {
                ".".set_style(theme.text_dim)
            };

            if is_major_tick || display_pos == 1 {
                add_number_to_ruler(&mut number_line, i, display_pos, theme);
            }
        }
    }

    (Line::from(number_line), Line::from(marker_line))
}

fn render_sequence_rows(
    view: &ViewState,
    window: &ViewportWindow,
    ui: &UiState,
    area: Rect,
    rows: &[usize],
    f: &mut Frame,
) {
    let records = view.store().records();
    let lines: Vec<Line> = rows
        .iter()
        .map(|&index| {
            let sequence = &records[index].sequence;
            let end = window.residue_range.end.min(sequence.len());
            let start = window.residue_range.start.min(end);
            Line::from(format_sequence_bytes(&sequence[start..end], ui.scheme))
        })
        .collect();

    let paragraph = Paragraph::new(lines).style(ui.theme_styles.base_block);
    f.render_widget(paragraph, area);
}

/// Tints the selected residue range (or the in-progress drag) across `area`.
///
/// `along_x` is true when residues run across the screen.
pub fn render_range_highlight(
    f: &mut Frame,
    ui: &UiState,
    window: &ViewportWindow,
    area: Rect,
    along_x: bool,
) {
    let Some(range) = ui.range.pending().or_else(|| ui.range.range()) else {
        return;
    };
    let visible = &window.residue_range;
    let start = range.start.max(visible.start);
    let stop = range.stop.min(visible.end.saturating_sub(1));
    if visible.is_empty() || start > stop {
        return;
    }

    let offset = (start - visible.start) as u16;
    let length = (stop - start + 1) as u16;
    let tint_area = if along_x {
        Rect::new(area.x + offset, area.y, length, area.height)
    } else {
        Rect::new(area.x, area.y + offset, area.width, length)
    };
    shade(f, area, tint_area, ui.theme.range_bg, RANGE_TINT_ALPHA);
}

fn render_scrollbar(
    viewport: &Viewport,
    window: &ViewportWindow,
    ui: &UiState,
    area: Rect,
    f: &mut Frame,
) {
    if area.width < 2 || area.height == 0 {
        return;
    }
    if viewport.max_size.residues <= viewport.dims.residues {
        return;
    }

    let width = area.width.saturating_sub(2) as usize;
    let max_index = viewport.max_size.residues.saturating_sub(1);
    let offset = window.residue_range.start;
    let percent = if max_index == 0 {
        0
    } else {
        offset.saturating_mul(100) / max_index
    };
    let track_max = width.saturating_sub(1);
    let thumb_index = if track_max == 0 {
        0
    } else {
        (percent * track_max) / 100
    };
    let thumb_y = area.y + area.height.saturating_sub(1);
    let thumb_width = if width >= 3 { 3 } else { 1 };
    let thumb_start = thumb_index.saturating_sub(thumb_width / 2);
    let thumb_end = (thumb_start + thumb_width).min(width);

    for offset in thumb_start..thumb_end {
        let thumb_x = area.x + 1 + offset as u16;
        if let Some(cell) = f.buffer_mut().cell_mut((thumb_x, thumb_y)) {
            let track_colour = cell.fg;
            cell.set_char('▬');
            cell.set_fg(ui.theme.accent_alt);
            cell.set_bg(track_colour);
        }
    }
}

pub fn render_alignment_pane(
    f: &mut Frame,
    layout: &AppLayout,
    view: &ViewState,
    viewport: &Viewport,
    ui: &UiState,
    rows: &[usize],
) {
    let theme = &ui.theme_styles;
    let window = viewport.window();
    let title = match ui.range.range() {
        Some(range) => format!("Alignment [{}-{}]", range.start + 1, range.stop + 1),
        None => "Alignment".to_string(),
    };

    let block = Block::bordered()
        .title(Line::from(title.set_style(theme.accent)))
        .border_style(theme.border)
        .style(theme.base_block)
        .merge_borders(MergeStrategy::Exact);
    let inner_area = block.inner(layout.alignment_pane);
    f.render_widget(block, layout.alignment_pane);

    let [ruler_area, rows_area] = inner_area.layout(&vertical![==2, *=1]);
    let (number_line, marker_line) =
        build_ruler(&window.residue_range, view.store().sequence_length(), theme);
    f.render_widget(
        Paragraph::new(vec![number_line, marker_line]).style(theme.base_block),
        ruler_area,
    );

    render_sequence_rows(view, &window, ui, rows_area, rows, f);
    render_range_highlight(f, ui, &window, ruler_area.union(rows_area), true);
    render_scrollbar(viewport, &window, ui, layout.alignment_pane, f);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::theme::{EVERFOREST_DARK, build_theme_styles};

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn ruler_marks_ticks_and_numbers() {
        let theme = build_theme_styles(EVERFOREST_DARK);
        let (numbers, markers) = build_ruler(&(0..12), 12, &theme);
        assert_eq!(line_text(&markers), ".   .    |  ");
        assert_eq!(line_text(&numbers), "1       10  ");
    }

    #[test]
    fn ruler_stops_at_alignment_end() {
        let theme = build_theme_styles(EVERFOREST_DARK);
        let (_, markers) = build_ruler(&(0..20), 7, &theme);
        assert_eq!(line_text(&markers), ".   .               ");
    }
}
