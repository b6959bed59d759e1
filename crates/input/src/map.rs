//! Mapping from terminal events to game events.

use crate::types::{BoardLayout, GameEvent, Side};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

/// Frontend commands bound to the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Quit,
    Restart,
    /// Same as clicking an add button
    Add(Side),
}

/// Map keyboard input to frontend commands.
pub fn handle_key_event(key: KeyEvent) -> Option<KeyCommand> {
    if should_quit(key) {
        return Some(KeyCommand::Quit);
    }
    match key.code {
        KeyCode::Left => Some(KeyCommand::Add(Side::Left)),
        KeyCode::Right => Some(KeyCommand::Add(Side::Right)),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(KeyCommand::Restart),
        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

/// Map a mouse event to a game event.
///
/// Only left-button presses inside the board grid produce events. `len` is the
/// current row length: cells past the last token are not tokens.
pub fn map_mouse(event: MouseEvent, layout: &BoardLayout, len: usize) -> Option<GameEvent> {
    if event.kind != MouseEventKind::Down(MouseButton::Left) {
        return None;
    }
    let cell = layout.cell_at(event.column, event.row)?;

    if cell.row == 0 {
        if cell.col == -1 {
            return Some(GameEvent::ClickAddButton(Side::Left));
        }
        if cell.col == layout.right_button_col() {
            return Some(GameEvent::ClickAddButton(Side::Right));
        }
        if cell.col >= 0 && (cell.col as usize) < len {
            return Some(GameEvent::ClickToken(cell.col as usize));
        }
    }
    Some(GameEvent::ClickDirectionCell(cell))
}
