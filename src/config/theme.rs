use ratatui::style::{Color, Style};

/// Chrome colours for the viewer. Residue colours live in `config::schemes`.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub base_bg: Color,
    pub surface_bg: Color,
    pub panel_bg: Color,
    pub border: Color,
    pub text: Color,
    pub text_muted: Color,
    pub text_dim: Color,
    pub accent: Color,
    pub accent_alt: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,
    pub range_bg: Color,
}

#[derive(Debug, Clone, Copy)]
pub struct ThemeStyles {
    pub base_block: Style,
    pub panel_block: Style,
    pub border: Style,
    pub text: Style,
    pub text_muted: Style,
    pub text_dim: Style,
    pub accent: Style,
    pub accent_alt: Style,
    pub success: Style,
    pub warning: Style,
    pub error: Style,
    pub selection: Style,
    pub cursor: Style,
}

pub const EVERFOREST_DARK: Theme = Theme {
    base_bg: rgb(0x2d, 0x35, 0x3b),
    surface_bg: rgb(0x34, 0x3f, 0x44),
    panel_bg: rgb(0x3d, 0x48, 0x4d),
    border: rgb(0x7a, 0x84, 0x78),
    text: rgb(0xd3, 0xc6, 0xaa),
    text_muted: rgb(0x85, 0x92, 0x89),
    text_dim: rgb(0x7a, 0x84, 0x78),
    accent: rgb(0x83, 0xc0, 0x92),
    accent_alt: rgb(0x7f, 0xbb, 0xb3),
    success: rgb(0xa7, 0xc0, 0x80),
    warning: rgb(0xdb, 0xbc, 0x7f),
    error: rgb(0xe6, 0x7e, 0x80),
    selection_bg: rgb(0x7f, 0xbb, 0xb3),
    selection_fg: rgb(0x2d, 0x35, 0x3b),
    range_bg: rgb(0x4f, 0x58, 0x5e),
};

#[must_use]
pub fn build_theme_styles(theme: Theme) -> ThemeStyles {
    ThemeStyles {
        base_block: Style::new().bg(theme.base_bg).fg(theme.text),
        panel_block: Style::new().bg(theme.panel_bg).fg(theme.text),
        border: Style::new().fg(theme.border),
        text: Style::new().fg(theme.text),
        text_muted: Style::new().fg(theme.text_muted),
        text_dim: Style::new().fg(theme.text_dim),
        accent: Style::new().fg(theme.accent).bold(),
        accent_alt: Style::new().fg(theme.accent_alt),
        success: Style::new().fg(theme.success).bold(),
        warning: Style::new().fg(theme.warning).bold(),
        error: Style::new().fg(theme.error).bold(),
        selection: Style::new()
            .bg(theme.selection_bg)
            .fg(theme.selection_fg)
            .bold(),
        cursor: Style::new().bg(theme.surface_bg).fg(theme.accent).bold(),
    }
}

const fn rgb(red: u8, green: u8, blue: u8) -> Color {
    Color::Rgb(red, green, blue)
}
