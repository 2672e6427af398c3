use std::ops::Range;

// scroll position on each axis, i.e. the top-left of the visible area
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewportOffsets {
    pub rows: usize,
    pub residues: usize,
    pub fields: usize,
}

// how much fits on each axis; depends on terminal size and layout
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewportDims {
    pub rows: usize,
    pub residues: usize,
    pub fields: usize,
}

// full size of the data, independent of the terminal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewportMax {
    pub rows: usize,
    pub residues: usize,
    pub fields: usize,
}

/// Scroll state for the alignment grid and the data table.
///
/// Rows are shared by both grids so the id, data and alignment panes stay aligned.
#[derive(Debug, Clone, Default)]
pub struct Viewport {
    pub offsets: ViewportOffsets,
    pub dims: ViewportDims,
    pub max_size: ViewportMax,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewportWindow {
    pub row_range: Range<usize>,
    pub residue_range: Range<usize>,
    pub field_range: Range<usize>,
}

fn window_range(offset: usize, dim: usize, max: usize) -> Range<usize> {
    offset..offset.saturating_add(dim).min(max)
}

impl Viewport {
    pub fn update_dimensions(&mut self, rows: usize, residues: usize, fields: usize) {
        self.dims = ViewportDims {
            rows,
            residues,
            fields,
        };
        self.clamp_offsets();
    }

    pub fn update_max_size(&mut self, rows: usize, residues: usize, fields: usize) {
        self.max_size = ViewportMax {
            rows,
            residues,
            fields,
        };
        self.clamp_offsets();
    }

    #[must_use]
    pub fn window(&self) -> ViewportWindow {
        ViewportWindow {
            row_range: window_range(self.offsets.rows, self.dims.rows, self.max_size.rows),
            residue_range: window_range(
                self.offsets.residues,
                self.dims.residues,
                self.max_size.residues,
            ),
            field_range: window_range(self.offsets.fields, self.dims.fields, self.max_size.fields),
        }
    }

    pub fn scroll_down(&mut self, amount: usize) {
        let max_scroll = self.max_size.rows.saturating_sub(self.dims.rows);
        self.offsets.rows = (self.offsets.rows + amount).min(max_scroll);
    }

    pub fn scroll_up(&mut self, amount: usize) {
        self.offsets.rows = self.offsets.rows.saturating_sub(amount);
    }

    pub fn scroll_right(&mut self, amount: usize) {
        let max_scroll = self.max_size.residues.saturating_sub(self.dims.residues);
        self.offsets.residues = (self.offsets.residues + amount).min(max_scroll);
    }

    pub fn scroll_left(&mut self, amount: usize) {
        self.offsets.residues = self.offsets.residues.saturating_sub(amount);
    }

    pub fn scroll_fields_right(&mut self, amount: usize) {
        let max_scroll = self.max_size.fields.saturating_sub(self.dims.fields);
        self.offsets.fields = (self.offsets.fields + amount).min(max_scroll);
    }

    pub fn scroll_fields_left(&mut self, amount: usize) {
        self.offsets.fields = self.offsets.fields.saturating_sub(amount);
    }

    pub fn jump_to_position(&mut self, position: usize) {
        let max_scroll = self.max_size.residues.saturating_sub(self.dims.residues);
        self.offsets.residues = position.min(max_scroll);
    }

    /// Scrolls the least amount that brings `row` into the window.
    pub fn scroll_to_row(&mut self, row: usize) {
        if row < self.offsets.rows {
            self.offsets.rows = row;
        } else if self.dims.rows > 0 && row >= self.offsets.rows + self.dims.rows {
            self.offsets.rows = row + 1 - self.dims.rows;
        }
        self.clamp_offsets();
    }

    pub fn clamp_offsets(&mut self) {
        let row_max = self.max_size.rows.saturating_sub(self.dims.rows);
        let residue_max = self.max_size.residues.saturating_sub(self.dims.residues);
        let field_max = self.max_size.fields.saturating_sub(self.dims.fields);

        self.offsets.rows = self.offsets.rows.min(row_max);
        self.offsets.residues = self.offsets.residues.min(residue_max);
        self.offsets.fields = self.offsets.fields.min(field_max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        let mut viewport = Viewport::default();
        viewport.update_max_size(50, 200, 6);
        viewport.update_dimensions(10, 80, 3);
        viewport
    }

    #[test]
    fn scrolling_stops_at_data_edge() {
        let mut viewport = viewport();
        viewport.scroll_down(100);
        viewport.scroll_right(500);
        viewport.scroll_fields_right(9);
        assert_eq!(
            viewport.offsets,
            ViewportOffsets {
                rows: 40,
                residues: 120,
                fields: 3,
            }
        );
        viewport.scroll_up(5);
        viewport.scroll_left(500);
        assert_eq!(viewport.offsets.rows, 35);
        assert_eq!(viewport.offsets.residues, 0);
    }

    #[test]
    fn window_is_clipped_to_data() {
        let mut viewport = viewport();
        viewport.update_dimensions(100, 80, 10);
        let window = viewport.window();
        assert_eq!(window.row_range, 0..50);
        assert_eq!(window.residue_range, 0..80);
        assert_eq!(window.field_range, 0..6);
    }

    #[test]
    fn shrinking_data_clamps_offsets() {
        let mut viewport = viewport();
        viewport.scroll_down(40);
        viewport.update_max_size(12, 200, 6);
        assert_eq!(viewport.offsets.rows, 2);
        viewport.jump_to_position(150);
        assert_eq!(viewport.offsets.residues, 120);
    }

    #[test]
    fn scroll_to_row_follows_cursor() {
        let mut viewport = viewport();
        viewport.scroll_to_row(15);
        assert_eq!(viewport.offsets.rows, 6);
        viewport.scroll_to_row(8);
        assert_eq!(viewport.offsets.rows, 6);
        viewport.scroll_to_row(2);
        assert_eq!(viewport.offsets.rows, 2);
    }
}
