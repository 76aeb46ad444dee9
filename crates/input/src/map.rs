//! Key mapping from terminal events to game actions.

use crate::types::Action;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Map a key press (or auto-repeat) to a game action.
///
/// Release events only matter for the soft drop key; see [`handle_key_release`].
pub fn handle_key_event(key: KeyEvent) -> Option<Action> {
    if key.kind == KeyEventKind::Release {
        return handle_key_release(key);
    }
    if should_quit(key) {
        return Some(Action::Quit);
    }

    match key.code {
        // Movement
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') => Some(Action::MoveLeft),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') => Some(Action::MoveRight),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') => Some(Action::SoftDropOn),

        // Rotation
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') => Some(Action::Rotate),

        // Actions
        KeyCode::Char(' ') => Some(Action::HardDrop),
        KeyCode::Enter => Some(Action::Confirm),
        KeyCode::Char('s') | KeyCode::Char('S') => Some(Action::ToggleSound),

        _ => None,
    }
}

/// Map a key release. Only the soft drop key has a release action.
pub fn handle_key_release(key: KeyEvent) -> Option<Action> {
    is_soft_drop_key(key.code).then_some(Action::SoftDropOff)
}

pub fn is_soft_drop_key(code: KeyCode) -> bool {
    matches!(
        code,
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J')
    )
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    key.code == KeyCode::Esc
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
