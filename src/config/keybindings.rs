use crossterm::event::{KeyCode, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    ClusterSort,
    ClearRange,
    HideSelected,
    ShowAll,
    DeleteSelected,
    ToggleRowSelection,
    ClearSelection,
    ActivateRow,
    CursorUp,
    CursorDown,
    FocusPreviousColumn,
    FocusNextColumn,
    ToggleFocusedColumn,
    SortAscending,
    SortDescending,
    ToggleTransposed,
    CycleColorScheme,
    ExportFasta,
    ExportCsv,
    ExportXml,
    ScrollDown,
    SkipDown,
    ScrollUp,
    SkipUp,
    ScrollLeft,
    ScrollRight,
    SkipLeft,
    SkipRight,
    ScrollFieldsLeft,
    ScrollFieldsRight,
    JumpToStart,
    JumpToEnd,
}

pub struct Binding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
    pub action: KeyAction,
    pub help: &'static str,
}

const fn bind(
    code: KeyCode,
    modifiers: KeyModifiers,
    action: KeyAction,
    help: &'static str,
) -> Binding {
    Binding {
        code,
        modifiers,
        action,
        help,
    }
}

const NONE: KeyModifiers = KeyModifiers::NONE;
const SHIFT: KeyModifiers = KeyModifiers::SHIFT;
const ALT: KeyModifiers = KeyModifiers::ALT;

pub const KEY_BINDINGS: &[Binding] = &[
    bind(KeyCode::Char('q'), NONE, KeyAction::Quit, "Quit application"),
    bind(
        KeyCode::Char('s'),
        NONE,
        KeyAction::ClusterSort,
        "Cluster sort over the selected range",
    ),
    bind(KeyCode::Char('r'), NONE, KeyAction::ClearRange, "Clear residue range"),
    bind(KeyCode::Char('h'), NONE, KeyAction::HideSelected, "Hide selected rows"),
    bind(KeyCode::Char('a'), NONE, KeyAction::ShowAll, "Show all rows"),
    bind(KeyCode::Char('d'), NONE, KeyAction::DeleteSelected, "Delete selected rows"),
    bind(KeyCode::Char(' '), NONE, KeyAction::ToggleRowSelection, "Select row under cursor"),
    bind(KeyCode::Esc, NONE, KeyAction::ClearSelection, "Clear row selection"),
    bind(KeyCode::Enter, NONE, KeyAction::ActivateRow, "Show details of row under cursor"),
    bind(KeyCode::Char('k'), NONE, KeyAction::CursorUp, "Move cursor up"),
    bind(KeyCode::Char('j'), NONE, KeyAction::CursorDown, "Move cursor down"),
    bind(KeyCode::Char('['), NONE, KeyAction::FocusPreviousColumn, "Focus previous column"),
    bind(KeyCode::Char(']'), NONE, KeyAction::FocusNextColumn, "Focus next column"),
    bind(KeyCode::Char('c'), NONE, KeyAction::ToggleFocusedColumn, "Hide or show focused column"),
    bind(KeyCode::Char('o'), NONE, KeyAction::SortAscending, "Sort by focused column"),
    bind(
        KeyCode::Char('O'),
        SHIFT,
        KeyAction::SortDescending,
        "Sort by focused column, descending",
    ),
    bind(KeyCode::Char('t'), NONE, KeyAction::ToggleTransposed, "Transpose alignment"),
    bind(KeyCode::Char('p'), NONE, KeyAction::CycleColorScheme, "Cycle colour scheme"),
    bind(KeyCode::Char('F'), SHIFT, KeyAction::ExportFasta, "Export FASTA"),
    bind(KeyCode::Char('C'), SHIFT, KeyAction::ExportCsv, "Export CSV"),
    bind(KeyCode::Char('X'), SHIFT, KeyAction::ExportXml, "Export spreadsheet XML"),
    bind(KeyCode::Down, NONE, KeyAction::ScrollDown, "Scroll down"),
    bind(KeyCode::Down, SHIFT, KeyAction::SkipDown, "Fast scroll down"),
    bind(KeyCode::Up, NONE, KeyAction::ScrollUp, "Scroll up"),
    bind(KeyCode::Up, SHIFT, KeyAction::SkipUp, "Fast scroll up"),
    bind(KeyCode::Left, NONE, KeyAction::ScrollLeft, "Scroll left"),
    bind(KeyCode::Left, SHIFT, KeyAction::SkipLeft, "Fast scroll left"),
    bind(KeyCode::Right, NONE, KeyAction::ScrollRight, "Scroll right"),
    bind(KeyCode::Right, SHIFT, KeyAction::SkipRight, "Fast scroll right"),
    bind(KeyCode::Left, ALT, KeyAction::ScrollFieldsLeft, "Scroll data table left"),
    bind(KeyCode::Right, ALT, KeyAction::ScrollFieldsRight, "Scroll data table right"),
    bind(KeyCode::Home, NONE, KeyAction::JumpToStart, "Jump to start of alignment"),
    bind(KeyCode::End, NONE, KeyAction::JumpToEnd, "Jump to end of alignment"),
];

pub fn lookup(code: KeyCode, modifiers: KeyModifiers) -> Option<KeyAction> {
    KEY_BINDINGS
        .iter()
        .find(|binding| binding.code == code && binding.modifiers == modifiers)
        .map(|binding| binding.action)
}

/// One-line help text for `action`, as shown in the status bar.
#[must_use]
pub fn help_for(action: KeyAction) -> Option<&'static str> {
    KEY_BINDINGS
        .iter()
        .find(|binding| binding.action == action)
        .map(|binding| binding.help)
}
