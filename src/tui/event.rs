//! Event handling for the TUI.

use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;

use super::app::{App, PendingCall, RecordsFocus, Resolution, Tab};

/// Application events.
#[derive(Debug)]
pub enum Event {
    /// Terminal tick (for refreshing UI).
    Tick,
    /// Keyboard event.
    Key(KeyEvent),
    /// Terminal resize.
    Resize(u16, u16),
    /// A gateway call finished.
    Resolved(Resolution),
}

/// Event handler that reads terminal events in a separate task.
pub struct EventHandler {
    tx: mpsc::UnboundedSender<Event>,
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    /// Sender shared by the terminal reader and the gateway tasks.
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.tx.clone()
    }

    /// Receive the next event.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Spawn the event reading task.
    pub fn spawn_reader(tx: mpsc::UnboundedSender<Event>, tick_rate: Duration) {
        tokio::spawn(async move {
            loop {
                if event::poll(tick_rate).unwrap_or(false) {
                    let forwarded = match event::read() {
                        Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                            tx.send(Event::Key(key))
                        }
                        Ok(CrosstermEvent::Resize(w, h)) => tx.send(Event::Resize(w, h)),
                        _ => Ok(()),
                    };
                    if forwarded.is_err() {
                        break;
                    }
                } else if tx.send(Event::Tick).is_err() {
                    break;
                }
            }
        });
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of handling a key event.
#[derive(Debug, PartialEq, Eq)]
pub enum KeyAction {
    /// No action needed.
    None,
    /// Quit the application.
    Quit,
    /// Perform a gateway call.
    Call(PendingCall),
}

impl From<Option<PendingCall>> for KeyAction {
    fn from(call: Option<PendingCall>) -> Self {
        match call {
            Some(call) => KeyAction::Call(call),
            None => KeyAction::None,
        }
    }
}

/// Handle a key event and update app state.
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> KeyAction {
    match key.code {
        // Quit on Ctrl+C or Ctrl+Q
        KeyCode::Char('c') | KeyCode::Char('q') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
            KeyAction::Quit
        }

        KeyCode::Tab => {
            app.next_tab();
            KeyAction::None
        }
        KeyCode::BackTab => {
            app.previous_tab();
            KeyAction::None
        }

        // Esc leaves the search box first, then quits
        KeyCode::Esc => {
            if app.tab == Tab::Records && app.records_focus == RecordsFocus::Search {
                app.records_focus = RecordsFocus::Table;
                KeyAction::None
            } else {
                app.should_quit = true;
                KeyAction::Quit
            }
        }

        KeyCode::Up => {
            app.focus_previous();
            KeyAction::None
        }
        KeyCode::Down => {
            app.focus_next();
            KeyAction::None
        }

        KeyCode::Enter => app.confirm().into(),

        _ if app.tab == Tab::Records && app.records_focus == RecordsFocus::Table => {
            handle_table_key(app, key)
        }

        _ => {
            if let Some(input) = app.focused_input() {
                edit_input(input, key);
            }
            KeyAction::None
        }
    }
}

/// Keys while the records table has focus.
fn handle_table_key(app: &mut App, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Char('v') => app.view_selected().into(),
        KeyCode::Char('r') => app.refresh_records().into(),
        KeyCode::Char('/') => {
            app.records_focus = RecordsFocus::Search;
            KeyAction::None
        }
        KeyCode::Char('q') => {
            app.should_quit = true;
            KeyAction::Quit
        }
        _ => KeyAction::None,
    }
}

fn edit_input(input: &mut super::app::InputLine, key: KeyEvent) {
    match key.code {
        KeyCode::Char(c) => input.enter_char(c),
        KeyCode::Backspace => input.delete_char(),
        KeyCode::Delete => input.delete_char_forward(),
        KeyCode::Left => input.move_cursor_left(),
        KeyCode::Right => input.move_cursor_right(),
        KeyCode::Home => input.move_cursor_home(),
        KeyCode::End => input.move_cursor_end(),
        _ => {}
    }
}
