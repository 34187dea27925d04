// Keyboard event handling
//
// This module contains the keyboard event handler that processes
// user input and updates the application state accordingly.

use std::time::Instant;

use super::AppState;
use crossterm::event::KeyCode;

/// Handle keyboard events and update application state
///
/// Returns `true` if the application should continue running,
/// `false` if it should exit.
///
/// # Key Bindings
/// - `q`, `Q`, `Esc` - Quit the application
/// - `Up`, `k` - Move the condition cursor up
/// - `Down`, `j` - Move the condition cursor down
/// - `Space`, `Enter` - Check/uncheck the condition under the cursor
/// - `c`, `C` - Clear the selection
/// - `a`, `A` - Toggle animated transitions
/// - `t`, `T` - Toggle node labels
pub fn handle_key_event(app: &mut AppState, key: KeyCode) -> bool {
    handle_key_event_at(app, key, Instant::now())
}

/// Same as `handle_key_event` with an explicit timestamp for transitions
pub fn handle_key_event_at(app: &mut AppState, key: KeyCode, now: Instant) -> bool {
    match key {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
            app.running = false;
            false
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.select_previous_condition();
            true
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.select_next_condition();
            true
        }
        KeyCode::Char(' ') | KeyCode::Enter => {
            app.toggle_condition_at_cursor(now);
            true
        }
        KeyCode::Char('c') | KeyCode::Char('C') => {
            app.clear_selection(now);
            true
        }
        KeyCode::Char('a') | KeyCode::Char('A') => {
            app.toggle_animations();
            true
        }
        KeyCode::Char('t') | KeyCode::Char('T') => {
            app.toggle_labels();
            true
        }
        _ => true,
    }
}
