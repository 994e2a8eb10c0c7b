//! Live stats session: terminal lifecycle and task wiring.
//!
//! A session runs three tasks next to the UI loop:
//!
//! - the input reader, on the blocking pool, forwarding key and resize events
//! - the [`Poller`], fetching stats every interval
//! - the render task, the only owner of the terminal
//!
//! Quitting cancels a shared token; every task observes it and returns.

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use appctl_api::StatsSource;
use crossterm::{
    cursor::Show,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::Backend, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::error::TuiError;
use crate::events::{AppEvent, KeyAction, RedrawSignal, handle_key, spawn_input};
use crate::poller::{Poller, now_secs};
use crate::session::Session;
use crate::ui;

/// Default time between two stats fetches.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Settings of one live session.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Application to monitor.
    pub app: String,
    /// Time between two stats fetches.
    pub poll_interval: Duration,
}

impl MonitorConfig {
    /// Settings for `app` polled every [`DEFAULT_POLL_INTERVAL`].
    pub fn new(app: impl Into<String>) -> Self {
        Self {
            app: app.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Override the time between two fetches.
    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

/// Run the live dashboard until the user quits.
///
/// The container list comes from one fetch made before the terminal is
/// touched; if it fails the error is returned and the screen is left alone.
/// Once the terminal is set up it is always restored, whatever the outcome.
pub async fn run<S: StatsSource + 'static>(
    source: Arc<S>,
    config: MonitorConfig,
) -> Result<(), TuiError> {
    let initial = source
        .fetch_stats(&config.app)
        .await
        .map_err(TuiError::InitialFetch)?;
    let session = Arc::new(Session::new(config.app, &initial, now_secs()));
    info!(
        app = %session.app(),
        containers = initial.stats.len(),
        interval_secs = config.poll_interval.as_secs(),
        "Starting live stats"
    );

    let terminal = setup_terminal()?;
    let cancel = CancellationToken::new();
    let (tx, rx) = mpsc::unbounded_channel();
    let input = spawn_input(tx, cancel.clone(), INPUT_POLL_TIMEOUT);

    let result = drive(
        Arc::clone(&session),
        source,
        terminal,
        rx,
        cancel.clone(),
        config.poll_interval,
    )
    .await;

    cancel.cancel();
    let input_result = input.await;
    let restored = restore_terminal();

    result?;
    input_result?;
    restored?;
    info!(app = %session.app(), "Live stats stopped");
    Ok(())
}

/// Wire the poller and the render task to `terminal` and process events
/// until a quit key, a closed event channel or a cancelled token.
///
/// Returns the terminal once every spawned task has finished.
pub async fn drive<S, B>(
    session: Arc<Session>,
    source: Arc<S>,
    terminal: Terminal<B>,
    mut events: mpsc::UnboundedReceiver<AppEvent>,
    cancel: CancellationToken,
    poll_interval: Duration,
) -> Result<Terminal<B>, TuiError>
where
    S: StatsSource + 'static,
    B: Backend + Send + 'static,
{
    let redraw = Arc::new(RedrawSignal::new());

    let poller = tokio::spawn(
        Poller::new(
            source,
            Arc::clone(&session),
            Arc::clone(&redraw),
            poll_interval,
            cancel.clone(),
        )
        .run(),
    );
    let render = tokio::spawn(render_loop(
        terminal,
        Arc::clone(&session),
        Arc::clone(&redraw),
        cancel.clone(),
    ));
    redraw.request();

    loop {
        let event = tokio::select! {
            () = cancel.cancelled() => break,
            event = events.recv() => event,
        };

        match event {
            Some(AppEvent::Key(key)) => match handle_key(&session, key) {
                KeyAction::Quit => {
                    debug!("Quit requested");
                    break;
                }
                KeyAction::Redraw => redraw.request(),
                KeyAction::Ignore => {}
            },
            Some(AppEvent::Resize(width, height)) => {
                debug!(width, height, "Terminal resized");
                redraw.request();
            }
            None => {
                debug!("Event channel closed");
                break;
            }
        }
    }

    cancel.cancel();
    poller.await?;
    render.await?
}

async fn render_loop<B: Backend>(
    mut terminal: Terminal<B>,
    session: Arc<Session>,
    redraw: Arc<RedrawSignal>,
    cancel: CancellationToken,
) -> Result<Terminal<B>, TuiError> {
    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            () = redraw.requested() => {}
        }

        let view = session.snapshot();
        let drawn = terminal.draw(|frame| ui::draw(frame, &view)).map(|_| ());
        if let Err(err) = drawn {
            error!(error = %err, "Failed to draw frame");
            cancel.cancel();
            return Err(TuiError::Render(err.to_string()));
        }
    }
    Ok(terminal)
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, TuiError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(err) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(err.into());
    }
    Terminal::new(CrosstermBackend::new(stdout)).map_err(|err| {
        let _ = restore_terminal();
        TuiError::from(err)
    })
}

fn restore_terminal() -> Result<(), TuiError> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, Show)?;
    Ok(())
}
