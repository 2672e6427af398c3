pub mod keybindings;
pub mod options;
pub mod schemes;
pub mod theme;
