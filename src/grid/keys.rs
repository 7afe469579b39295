//! Translation of terminal key events into grid actions.

use super::cursor::Direction;
use crate::model::ColorTag;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// How an arrow key treats the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveMode {
    /// Plain arrow
    Plain,
    /// Ctrl/Cmd + arrow: move without touching the selection
    KeepSelection,
    /// Shift + arrow: add the destination row to the selection
    Extend,
}

/// What a clipboard shortcut copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardTarget {
    Code,
    ListingUrl,
    SearchUrl,
}

impl ClipboardTarget {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::ListingUrl => "listing link",
            Self::SearchUrl => "search link",
        }
    }
}

/// A key the grid understands outside an edit session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridKey {
    Activate,
    Cancel,
    Move(Direction, MoveMode),
    RowStart,
    RowEnd,
    PageUp,
    PageDown,
    Paint(ColorTag),
    ToggleRebate,
    ToggleWebTransfer,
    ToggleOutOfCards,
    ToggleSelect { extend: bool },
    SelectAll,
    ClearSelection,
    CycleView,
}

/// Ctrl+Shift+1/2/3 (or Ctrl+F1..F3), whatever the keyboard layout.
///
/// With Shift held, terminals report the shifted symbol of the digit key,
/// which differs between US and Spanish layouts.
#[must_use]
pub fn clipboard_shortcut(key: &KeyEvent) -> Option<ClipboardTarget> {
    if !key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    match key.code {
        KeyCode::F(1) => Some(ClipboardTarget::Code),
        KeyCode::F(2) => Some(ClipboardTarget::ListingUrl),
        KeyCode::F(3) => Some(ClipboardTarget::SearchUrl),
        KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::SHIFT) || !c.is_ascii_digit() => {
            match c {
                '1' | '!' => Some(ClipboardTarget::Code),
                '2' | '@' | '"' => Some(ClipboardTarget::ListingUrl),
                '3' | '#' | '·' => Some(ClipboardTarget::SearchUrl),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Map a key to a grid action.
#[must_use]
pub fn grid_key(key: &KeyEvent) -> Option<GridKey> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);
    let move_mode = if shift {
        MoveMode::Extend
    } else if ctrl || key.modifiers.contains(KeyModifiers::SUPER) {
        MoveMode::KeepSelection
    } else {
        MoveMode::Plain
    };

    let action = match key.code {
        KeyCode::Enter | KeyCode::Char(' ') => GridKey::Activate,
        KeyCode::Esc => GridKey::Cancel,
        KeyCode::Up => GridKey::Move(Direction::Up, move_mode),
        KeyCode::Down => GridKey::Move(Direction::Down, move_mode),
        KeyCode::Left => GridKey::Move(Direction::Left, move_mode),
        KeyCode::Right => GridKey::Move(Direction::Right, move_mode),
        KeyCode::Home => GridKey::RowStart,
        KeyCode::End => GridKey::RowEnd,
        KeyCode::PageUp => GridKey::PageUp,
        KeyCode::PageDown => GridKey::PageDown,
        KeyCode::Char('a') if ctrl => GridKey::SelectAll,
        KeyCode::Char('x') if ctrl => GridKey::ClearSelection,
        _ if ctrl => return None,
        KeyCode::Char(c) if c.is_ascii_digit() && key.modifiers.is_empty() => {
            GridKey::Paint(ColorTag::from_digit(c)?)
        }
        KeyCode::Char('k') => GridKey::Move(Direction::Up, MoveMode::Plain),
        KeyCode::Char('j') => GridKey::Move(Direction::Down, MoveMode::Plain),
        KeyCode::Char('h') => GridKey::Move(Direction::Left, MoveMode::Plain),
        KeyCode::Char('l') => GridKey::Move(Direction::Right, MoveMode::Plain),
        KeyCode::Char('r') => GridKey::ToggleRebate,
        KeyCode::Char('w') => GridKey::ToggleWebTransfer,
        KeyCode::Char('o') => GridKey::ToggleOutOfCards,
        KeyCode::Char('x') => GridKey::ToggleSelect { extend: false },
        KeyCode::Char('X') => GridKey::ToggleSelect { extend: true },
        KeyCode::Char('v') => GridKey::CycleView,
        _ => return None,
    };
    Some(action)
}
