//! Input handling for the explorer session.
//!
//! Raw `crossterm` events are resolved exactly once, at the input boundary,
//! into the small tagged [`InputEvent`] enumeration. Focus arbitration is a
//! pure function over that enumeration, and [`handle_event`] is the single
//! entry point through which keystrokes mutate [`AppState`]. Long-running
//! work is delegated over channels so input handling stays responsive.

use crossterm::event::{Event as CEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;

use crate::logic::{move_selection, send_query, set_display_mode};
use crate::state::{AppState, DetailRequest, DisplayMode, Focus, QueryInput};

/// A keystroke after boundary resolution.
///
/// Every variant the session reacts to is enumerated here; anything else is
/// dropped at the boundary and never reaches the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// A plain printable character, routed to the focused surface.
    Character(char),
    /// Down arrow: list navigation.
    NavigateDown,
    /// Up arrow: list navigation.
    NavigateUp,
    /// Left arrow without shift: text-editing navigation.
    NavigateLeft,
    /// Right arrow without shift: text-editing navigation.
    NavigateRight,
    /// Shift+left: switch to the truncated display block.
    ShiftLeft,
    /// Shift+right: switch to the full display block.
    ShiftRight,
    /// Escape key.
    Escape,
    /// Forward delete.
    Delete,
    /// Backspace.
    Backspace,
    /// Enter: submit the search field.
    Submit,
    /// Ctrl+C: leave the session.
    Quit,
}

/// Resolve a raw key event into an [`InputEvent`], or `None` for keys the
/// session ignores entirely.
pub fn resolve_key(ke: &KeyEvent) -> Option<InputEvent> {
    let shift = ke.modifiers.contains(KeyModifiers::SHIFT);
    match ke.code {
        KeyCode::Char('c') if ke.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(InputEvent::Quit)
        }
        KeyCode::Down => Some(InputEvent::NavigateDown),
        KeyCode::Up => Some(InputEvent::NavigateUp),
        KeyCode::Left if shift => Some(InputEvent::ShiftLeft),
        KeyCode::Right if shift => Some(InputEvent::ShiftRight),
        KeyCode::Left => Some(InputEvent::NavigateLeft),
        KeyCode::Right => Some(InputEvent::NavigateRight),
        KeyCode::Esc => Some(InputEvent::Escape),
        KeyCode::Delete => Some(InputEvent::Delete),
        KeyCode::Backspace => Some(InputEvent::Backspace),
        KeyCode::Enter => Some(InputEvent::Submit),
        KeyCode::Char(ch) => Some(InputEvent::Character(ch)),
        _ => None,
    }
}

/// The focus transition table: a pure, total function of the current focus
/// and the resolved event.
///
/// List-navigation keys win over text-editing keys, so scrolling never
/// loses focus to the search field; plain characters and the display-mode
/// toggles leave focus untouched. Submit hands the keyboard to the list.
pub const fn advance_focus(focus: Focus, ev: InputEvent) -> Focus {
    match ev {
        InputEvent::NavigateDown | InputEvent::NavigateUp | InputEvent::Submit => Focus::Select,
        InputEvent::NavigateLeft
        | InputEvent::NavigateRight
        | InputEvent::Escape
        | InputEvent::Delete
        | InputEvent::Backspace => Focus::Search,
        InputEvent::Character(_)
        | InputEvent::ShiftLeft
        | InputEvent::ShiftRight
        | InputEvent::Quit => focus,
    }
}

/// Dispatch a single terminal event, mutating [`AppState`] and coordinating
/// background work via the provided channels.
///
/// Returns `true` when the application should exit.
pub fn handle_event(
    ev: CEvent,
    app: &mut AppState,
    query_tx: &mpsc::UnboundedSender<QueryInput>,
    details_tx: &mpsc::UnboundedSender<DetailRequest>,
) -> bool {
    let CEvent::Key(ke) = ev else {
        return false;
    };
    if ke.kind != KeyEventKind::Press {
        return false;
    }
    let Some(input) = resolve_key(&ke) else {
        return false;
    };
    if matches!(input, InputEvent::Quit) {
        return true;
    }

    app.focus = advance_focus(app.focus, input);

    match input {
        InputEvent::Character(ch) => {
            // Characters only ever reach the focused surface; the list has
            // no character bindings.
            if matches!(app.focus, Focus::Search) {
                app.input.push(ch);
                send_query(app, query_tx);
            }
        }
        InputEvent::Backspace | InputEvent::Delete => {
            if app.input.pop().is_some() {
                send_query(app, query_tx);
            }
        }
        InputEvent::NavigateDown => move_selection(app, 1, details_tx),
        InputEvent::NavigateUp => move_selection(app, -1, details_tx),
        InputEvent::ShiftRight => set_display_mode(app, DisplayMode::Full),
        InputEvent::ShiftLeft => set_display_mode(app, DisplayMode::Truncated),
        InputEvent::NavigateLeft
        | InputEvent::NavigateRight
        | InputEvent::Escape
        | InputEvent::Submit
        | InputEvent::Quit => {}
    }
    false
}
