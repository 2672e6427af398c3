use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Color::{self, Reset, Rgb};

fn interpolate(from: u8, to: u8, alpha: f32) -> u8 {
    let from = f32::from(from);
    let to = f32::from(to);
    let blended = (from + (to - from) * alpha).round().clamp(0.0, 255.0);
    blended as u8
}

fn blend_background(base: Color, tint: Color, alpha: f32) -> Color {
    match (base, tint) {
        (Rgb(red, green, blue), Rgb(red_tint, green_tint, blue_tint)) => Rgb(
            interpolate(red, red_tint, alpha),
            interpolate(green, green_tint, alpha),
            interpolate(blue, blue_tint, alpha),
        ),
        (Reset, tint) => tint,
        _ => tint,
    }
}

/// Tints the background of every cell in `tint_area ∩ clip_area` towards `tint`.
pub fn shade(f: &mut Frame, clip_area: Rect, tint_area: Rect, tint: Color, alpha: f32) {
    if alpha <= 0.0 {
        return;
    }
    let area = clip_area.intersection(tint_area);
    if area.is_empty() {
        return;
    }

    let buffer = f.buffer_mut();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            if let Some(cell) = buffer.cell_mut((x, y)) {
                cell.set_bg(blend_background(cell.bg, tint, alpha));
            }
        }
    }
}
