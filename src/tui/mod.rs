//! Terminal User Interface for stegchain.
//!
//! Three tabs (hide, extract, records) over one shared gateway. Gateway
//! calls run on their own tasks and report back through the event channel,
//! so the screen keeps redrawing while a request is in flight.

mod app;
pub mod event;
mod ui;

pub use app::{App, ExtractField, HideField, InputLine, PendingCall, RecordsFocus, Resolution, Tab};
pub use event::{handle_key_event, Event, EventHandler, KeyAction};
pub use ui::render;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::api::StegoGateway;

const TICK_RATE: Duration = Duration::from_millis(250);

/// Errors raised while driving the terminal.
#[derive(Error, Debug)]
pub enum TuiError {
    #[error("Terminal error: {0}")]
    Terminal(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

/// Initialize the terminal for TUI mode.
pub fn init_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>, TuiError> {
    enable_raw_mode().map_err(|e| TuiError::Terminal(format!("Failed to enable raw mode: {}", e)))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| TuiError::Terminal(format!("Failed to enter alternate screen: {}", e)))?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| TuiError::Terminal(format!("Failed to create terminal: {}", e)))
}

/// Restore the terminal to normal mode.
pub fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<(), TuiError> {
    disable_raw_mode().map_err(|e| TuiError::Terminal(format!("Failed to disable raw mode: {}", e)))?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .map_err(|e| TuiError::Terminal(format!("Failed to leave alternate screen: {}", e)))?;
    terminal
        .show_cursor()
        .map_err(|e| TuiError::Terminal(format!("Failed to show cursor: {}", e)))?;
    Ok(())
}

/// Runs the TUI until the user quits. The terminal is restored even when
/// the loop fails.
pub async fn run(gateway: Arc<dyn StegoGateway>, api_url: String) -> Result<(), TuiError> {
    let mut terminal = init_terminal()?;
    let result = run_loop(&mut terminal, gateway, api_url).await;
    restore_terminal(&mut terminal)?;
    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    gateway: Arc<dyn StegoGateway>,
    api_url: String,
) -> Result<(), TuiError> {
    let mut app = App::new(api_url);
    let mut events = EventHandler::new();
    EventHandler::spawn_reader(events.sender(), TICK_RATE);

    if let Some(call) = app.start() {
        spawn_call(call, Arc::clone(&gateway), events.sender());
    }

    loop {
        terminal.draw(|frame| render(frame, &app))?;

        let Some(event) = events.next().await else {
            break;
        };
        match event {
            Event::Key(key) => match handle_key_event(&mut app, key) {
                KeyAction::Quit => break,
                KeyAction::Call(call) => spawn_call(call, Arc::clone(&gateway), events.sender()),
                KeyAction::None => {}
            },
            Event::Resolved(resolution) => app.apply(resolution),
            Event::Tick | Event::Resize(_, _) => {}
        }

        if app.should_quit {
            break;
        }
    }

    tracing::info!("TUI closed");
    Ok(())
}

/// Performs a gateway call on its own task and posts the outcome back.
fn spawn_call(call: PendingCall, gateway: Arc<dyn StegoGateway>, tx: mpsc::UnboundedSender<Event>) {
    tokio::spawn(async move {
        let resolution = call.perform(gateway.as_ref()).await;
        if tx.send(Event::Resolved(resolution)).is_err() {
            tracing::debug!("TUI closed before the call resolved");
        }
    });
}
