//! Key bindings

use crate::app::AppMode;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use th_core::vote::VoteDirection;

/// Something the user asked the browser to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Help,
    /// Leave the help popup
    Dismiss,
    MoveDown,
    MoveUp,
    Top,
    Bottom,
    ToggleCollapse,
    /// Open or close the reply form under the selected comment
    Reply,
    /// Start a top-level comment on the post
    Comment,
    Vote(VoteDirection),
    Delete,
    Reload,
    // editor
    Insert(char),
    Backspace,
    CursorLeft,
    CursorRight,
    Submit,
    Cancel,
}

/// Map a key press to an action for the current mode
pub fn action_for(mode: AppMode, key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match mode {
        AppMode::Help => Some(Action::Dismiss),
        AppMode::Reply => match key.code {
            KeyCode::Esc => Some(Action::Cancel),
            KeyCode::Enter => Some(Action::Submit),
            KeyCode::Backspace => Some(Action::Backspace),
            KeyCode::Left => Some(Action::CursorLeft),
            KeyCode::Right => Some(Action::CursorRight),
            KeyCode::Char(c) => Some(Action::Insert(c)),
            _ => None,
        },
        AppMode::Normal => match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('?') => Some(Action::Help),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::MoveDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::MoveUp),
            KeyCode::Char('g') | KeyCode::Home => Some(Action::Top),
            KeyCode::Char('G') | KeyCode::End => Some(Action::Bottom),
            KeyCode::Char(' ') | KeyCode::Enter => Some(Action::ToggleCollapse),
            KeyCode::Char('r') => Some(Action::Reply),
            KeyCode::Char('c') => Some(Action::Comment),
            KeyCode::Char('u') => Some(Action::Vote(VoteDirection::Up)),
            KeyCode::Char('d') => Some(Action::Vote(VoteDirection::Down)),
            KeyCode::Char('x') => Some(Action::Delete),
            KeyCode::Char('R') => Some(Action::Reload),
            _ => None,
        },
    }
}
