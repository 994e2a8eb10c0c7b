//! Background polling of the stats endpoint.
//!
//! Every interval the poller fetches the application's stats, appends one
//! sample per known container and asks for a redraw. A failed fetch keeps
//! the previous data on screen flagged as stale, and the next tick retries.

use std::sync::Arc;
use std::time::Duration;

use appctl_api::{ApiError, AppStats, StatsSource};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::events::RedrawSignal;
use crate::session::Session;

/// Current wall-clock time in unix seconds.
pub fn now_secs() -> f64 {
    chrono::Utc::now().timestamp_millis() as f64 / 1000.0
}

/// Periodic stats fetcher feeding a [`Session`].
pub struct Poller<S> {
    source: Arc<S>,
    session: Arc<Session>,
    redraw: Arc<RedrawSignal>,
    interval: Duration,
    cancel: CancellationToken,
}

impl<S: StatsSource + 'static> Poller<S> {
    /// Poller fetching from `source` every `interval` until `cancel` fires.
    pub fn new(
        source: Arc<S>,
        session: Arc<Session>,
        redraw: Arc<RedrawSignal>,
        interval: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            source,
            session,
            redraw,
            interval,
            cancel,
        }
    }

    /// Poll until cancelled.
    ///
    /// A fetch still in flight when the token fires is dropped and nothing
    /// is written to the session afterwards.
    pub async fn run(self) {
        let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                () = self.cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let result = tokio::select! {
                () = self.cancel.cancelled() => break,
                result = self.source.fetch_stats(self.session.app()) => result,
            };
            if self.cancel.is_cancelled() {
                break;
            }

            self.apply(now_secs(), result);
            self.redraw.request();
        }

        debug!(app = %self.session.app(), "Poller stopped");
    }

    /// Fold one fetch result into the session.
    pub fn apply(&self, at: f64, result: Result<AppStats, ApiError>) {
        match result {
            Ok(stats) => {
                let updated = self.session.record(at, &stats);
                debug!(app = %self.session.app(), updated, "Stats updated");
            }
            Err(err) => {
                warn!(app = %self.session.app(), error = %err, "Stats poll failed, keeping previous data");
                self.session.record_failure(err.to_string());
            }
        }
    }
}
