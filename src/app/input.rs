//! Terminal-agnostic keyboard input

/// A key press, decoupled from the terminal library so the whole session can
/// be driven from tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Printable character
    Char(char),
    Enter,
    Backspace,
    /// Switch form field
    Tab,
    /// Leave the current screen
    Esc,
    /// Ctrl+R: toggle ready in the lobby
    ToggleReady,
    /// Ctrl+T: toggle mute in the debate
    ToggleMute,
    /// Ctrl+C
    Quit,
}
