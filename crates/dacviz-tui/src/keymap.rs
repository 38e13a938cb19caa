//! Keyboard shortcut handling.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// TUI keyboard actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    Cancel,
    Next,
    Prev,
    /// Move the selection to the next stage of the current gate.
    SelectNext,
    SelectPrev,
    Compute,
    Show,
    CloseSubDemo,
    Regenerate,
    ToggleLogs,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    Home,
    End,
    None,
}

/// Map a key event to an action.
#[must_use]
pub fn map_key(key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Cancel,
        KeyCode::Char('q') => KeyAction::Quit,
        KeyCode::Char('n' | ' ') | KeyCode::Right => KeyAction::Next,
        KeyCode::Char('p') | KeyCode::Left | KeyCode::Backspace => KeyAction::Prev,
        KeyCode::Tab => KeyAction::SelectNext,
        KeyCode::BackTab => KeyAction::SelectPrev,
        KeyCode::Char('c') => KeyAction::Compute,
        KeyCode::Char('s') | KeyCode::Enter => KeyAction::Show,
        KeyCode::Char('x') | KeyCode::Esc => KeyAction::CloseSubDemo,
        KeyCode::Char('g') => KeyAction::Regenerate,
        KeyCode::Char('l') => KeyAction::ToggleLogs,
        KeyCode::Up => KeyAction::ScrollUp,
        KeyCode::Down => KeyAction::ScrollDown,
        KeyCode::PageUp => KeyAction::PageUp,
        KeyCode::PageDown => KeyAction::PageDown,
        KeyCode::Home => KeyAction::Home,
        KeyCode::End => KeyAction::End,
        _ => KeyAction::None,
    }
}
