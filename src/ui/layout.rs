use ratatui::layout::{Constraint, Layout, Position, Rect, Spacing};
use ratatui::macros::{horizontal, vertical};
use ratatui::widgets::Block;

/// fixed height (rows) for the bottom consensus pane, borders included.
const CONSENSUS_PANE_HEIGHT_ROWS: u16 = 3;
/// width percentage for the left sequence ID pane.
const SEQUENCE_ID_PANE_WIDTH_PERCENT: u16 = 20;
/// width percentage for the data table pane when any column is visible.
const DATA_TABLE_PANE_WIDTH_PERCENT: u16 = 30;
/// rows above the sequence rows taken by the ruler / table header.
pub const HEADER_ROWS: u16 = 2;
/// width of the residue label column in the transposed grid.
pub const TRANSPOSED_LABEL_WIDTH: u16 = 7;
/// width of the separator plus consensus column in the transposed grid.
pub const TRANSPOSED_CONSENSUS_WIDTH: u16 = 2;

#[derive(Debug, Clone, Copy)]
pub struct FrameLayout {
    pub top_status_area: Rect,
    pub content_area: Rect,
    pub bottom_status_area: Rect,
}

impl FrameLayout {
    #[must_use]
    pub fn new(terminal_area: Rect) -> Self {
        let [top_status_area, content_area, bottom_status_area] =
            terminal_area.layout(&vertical![==1, *=1, ==1]);
        Self {
            top_status_area,
            content_area,
            bottom_status_area,
        }
    }
}

fn split_columns(area: Rect, with_data_table: bool) -> [Rect; 3] {
    let constraints = if with_data_table {
        vec![
            Constraint::Percentage(SEQUENCE_ID_PANE_WIDTH_PERCENT),
            Constraint::Percentage(DATA_TABLE_PANE_WIDTH_PERCENT),
            Constraint::Fill(1),
        ]
    } else {
        vec![
            Constraint::Percentage(SEQUENCE_ID_PANE_WIDTH_PERCENT),
            Constraint::Fill(1),
        ]
    };
    let areas = Layout::horizontal(constraints)
        .spacing(Spacing::Overlap(1))
        .split(area);
    match areas.as_ref() {
        &[id, data, alignment] => [id, data, alignment],
        &[id, alignment] => [id, Rect::default(), alignment],
        _ => [Rect::default(), Rect::default(), area],
    }
}

/// Pane areas for one frame. Unused panes are zero-sized.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppLayout {
    pub sequence_id_pane: Rect,
    pub data_table_pane: Rect,
    pub alignment_pane: Rect,
    pub consensus_label_pane: Rect,
    pub consensus_pane: Rect,
    pub transposed: bool,
}

impl AppLayout {
    #[must_use]
    pub fn new(area: Rect, with_data_table: bool) -> Self {
        let [alignment_area, consensus_area] = area
            .layout(&vertical![*=1, ==CONSENSUS_PANE_HEIGHT_ROWS].spacing(Spacing::Overlap(1)));
        let [sequence_id_pane, data_table_pane, alignment_pane] =
            split_columns(alignment_area, with_data_table);
        let [consensus_label_pane, _, consensus_pane] =
            split_columns(consensus_area, with_data_table);

        Self {
            sequence_id_pane,
            data_table_pane,
            alignment_pane,
            consensus_label_pane,
            consensus_pane,
            transposed: false,
        }
    }

    /// Residues run down the screen and every sequence is one character column.
    #[must_use]
    pub fn transposed(area: Rect) -> Self {
        Self {
            alignment_pane: area,
            transposed: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn sequence_id_rows_area(&self) -> Rect {
        rows_below_header(self.sequence_id_pane)
    }

    #[must_use]
    pub fn data_table_rows_area(&self) -> Rect {
        rows_below_header(self.data_table_pane)
    }

    /// Area holding residue cells: sequence rows, or the transposed grid.
    #[must_use]
    pub fn alignment_rows_area(&self) -> Rect {
        let rows = rows_below_header(self.alignment_pane);
        if self.transposed {
            let [_, grid, _] = self.transposed_columns(rows);
            grid
        } else {
            rows
        }
    }

    /// Residue label column of the transposed pane, below the ruler.
    #[must_use]
    pub fn transposed_label_area(&self) -> Rect {
        let [labels, _, _] = self.transposed_columns(rows_below_header(self.alignment_pane));
        labels
    }

    /// Label, sequence grid and consensus columns of the transposed pane.
    #[must_use]
    pub fn transposed_columns(&self, area: Rect) -> [Rect; 3] {
        area.layout(&horizontal![
            ==TRANSPOSED_LABEL_WIDTH,
            *=1,
            ==TRANSPOSED_CONSENSUS_WIDTH
        ])
    }

    #[must_use]
    pub fn consensus_row_area(&self) -> Rect {
        Block::bordered().inner(self.consensus_pane)
    }
}

fn rows_below_header(pane: Rect) -> Rect {
    let [_, rows] = Block::bordered()
        .inner(pane)
        .layout(&vertical![==HEADER_ROWS, *=1]);
    rows
}

/// Maps a screen offset inside `area` to an item index, `offset` being the first item
/// shown. Returns `None` outside the area or past `count` items.
#[must_use]
pub fn index_at(
    area: Rect,
    position: Position,
    along_x: bool,
    offset: usize,
    count: usize,
) -> Option<usize> {
    if !area.contains(position) {
        return None;
    }
    let relative = if along_x {
        position.x - area.x
    } else {
        position.y - area.y
    };
    let index = offset + usize::from(relative);
    (index < count).then_some(index)
}

/// Like [`index_at`] but clamps positions outside `area` to its nearest edge, for drags.
#[must_use]
pub fn clamped_index_at(
    area: Rect,
    position: Position,
    along_x: bool,
    offset: usize,
    count: usize,
) -> Option<usize> {
    if area.is_empty() || count == 0 {
        return None;
    }
    let (value, start, length) = if along_x {
        (position.x, area.x, area.width)
    } else {
        (position.y, area.y, area.height)
    };
    let relative = value.clamp(start, start + length - 1) - start;
    Some((offset + usize::from(relative)).min(count - 1))
}
