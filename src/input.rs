//! Input adapter
//!
//! Raw terminal events are normalised into the two signals the game accepts.
//! Nothing past this module sees key codes or mouse buttons.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEventKind};

use crate::sim::GamePhase;

/// Signal understood by the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Jump,
    Reset,
}

/// What the frontend should do with a terminal event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Signal(Signal),
    Quit,
}

/// Map a terminal event to a command, given the phase it will be applied in
///
/// Space and Enter restart a finished run instead of jumping.
pub fn map_event(event: &Event, phase: GamePhase) -> Option<Command> {
    match event {
        Event::Key(key) => map_key(key, phase),
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => Some(Command::Signal(Signal::Jump)),
            _ => None,
        },
        _ => None,
    }
}

fn map_key(key: &KeyEvent, phase: GamePhase) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::Signal(Signal::Reset)),
        KeyCode::Char(' ') | KeyCode::Enter if phase == GamePhase::GameOver => {
            Some(Command::Signal(Signal::Reset))
        }
        KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Up => Some(Command::Signal(Signal::Jump)),
        _ => None,
    }
}
