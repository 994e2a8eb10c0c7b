//! Event handling for the live dashboard

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::{Notify, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::session::Session;

/// Terminal events forwarded to the UI loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Terminal key press
    Key(KeyEvent),
    /// Terminal resize
    Resize(u16, u16),
}

/// What the UI loop does after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Selection changed, draw again
    Redraw,
    /// Stop the session
    Quit,
    /// Unbound key
    Ignore,
}

/// Single-slot redraw request.
///
/// Requests made while a redraw is pending collapse into one, and a
/// request made after the render task stopped is simply never consumed.
#[derive(Debug, Default)]
pub struct RedrawSignal {
    notify: Notify,
}

impl RedrawSignal {
    /// Signal with no pending request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for one redraw.
    pub fn request(&self) {
        self.notify.notify_one();
    }

    /// Wait for the next request, consuming it.
    pub async fn requested(&self) {
        self.notify.notified().await;
    }
}

/// Read terminal events on the blocking pool until `cancel` fires.
///
/// The loop wakes up every `poll_timeout` to check for cancellation.
pub fn spawn_input(
    tx: mpsc::UnboundedSender<AppEvent>,
    cancel: CancellationToken,
    poll_timeout: Duration,
) -> JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        while !cancel.is_cancelled() {
            match event::poll(poll_timeout) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(err) => {
                    warn!(error = %err, "terminal poll failed");
                    break;
                }
            }

            let forwarded = match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    tx.send(AppEvent::Key(key))
                }
                Ok(Event::Resize(w, h)) => tx.send(AppEvent::Resize(w, h)),
                Ok(_) => Ok(()),
                Err(err) => {
                    warn!(error = %err, "terminal read failed");
                    break;
                }
            };
            if forwarded.is_err() {
                break;
            }
        }
    })
}

/// Handle keyboard input
pub fn handle_key(session: &Session, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => KeyAction::Quit,
        KeyCode::Down | KeyCode::Char('j') => {
            session.select_next();
            KeyAction::Redraw
        }
        KeyCode::Up | KeyCode::Char('k') => {
            session.select_previous();
            KeyAction::Redraw
        }
        _ => KeyAction::Ignore,
    }
}
