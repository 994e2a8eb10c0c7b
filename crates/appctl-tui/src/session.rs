//! Live session state: container registry, time series and selection.
//!
//! A [`Session`] is created once from the initial stats fetch and shared
//! between the polling task (appends samples), the UI loop (moves the
//! cursor) and the render task (reads everything).

use std::collections::HashMap;

use appctl_api::{AppStats, ContainerStat};
use parking_lot::{RwLock, RwLockReadGuard};

/// Append-only samples of one container.
///
/// CPU, memory and swap points are pushed together, so the three series
/// always have the same length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesBuffer {
    cpu: Vec<(f64, f64)>,
    memory: Vec<(f64, f64)>,
    swap: Vec<(f64, f64)>,
}

impl SeriesBuffer {
    /// Append one sample taken at `at` (unix seconds).
    pub fn push(&mut self, at: f64, stat: &ContainerStat) {
        self.cpu.push((at, stat.cpu_usage as f64));
        self.memory.push((at, stat.memory_usage as f64));
        self.swap.push((at, stat.swap_usage as f64));
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.cpu.len()
    }

    /// Whether no sample was recorded yet.
    pub fn is_empty(&self) -> bool {
        self.cpu.is_empty()
    }

    /// CPU percentage over time.
    pub fn cpu(&self) -> &[(f64, f64)] {
        &self.cpu
    }

    /// Memory bytes over time.
    pub fn memory(&self) -> &[(f64, f64)] {
        &self.memory
    }

    /// Swap bytes over time.
    pub fn swap(&self) -> &[(f64, f64)] {
        &self.swap
    }
}

/// Everything the dashboard displays.
#[derive(Debug, Default)]
pub struct SessionState {
    containers: Vec<String>,
    series: HashMap<String, SeriesBuffer>,
    selected: usize,
    polls: u64,
    failed_polls: u64,
    last_error: Option<String>,
    last_update: Option<f64>,
}

impl SessionState {
    /// Registered container ids in first-seen order.
    pub fn containers(&self) -> &[String] {
        &self.containers
    }

    /// Index of the selected container.
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Id of the selected container, if any container is registered.
    pub fn selected_container(&self) -> Option<&str> {
        self.containers.get(self.selected).map(String::as_str)
    }

    /// Samples of one container.
    pub fn series(&self, id: &str) -> Option<&SeriesBuffer> {
        self.series.get(id)
    }

    /// Samples of the selected container.
    pub fn selected_series(&self) -> Option<&SeriesBuffer> {
        self.selected_container().and_then(|id| self.series.get(id))
    }

    /// Number of successful polls since the session started.
    pub fn polls(&self) -> u64 {
        self.polls
    }

    /// Number of failed polls since the session started.
    pub fn failed_polls(&self) -> u64 {
        self.failed_polls
    }

    /// Error of the last poll when it failed.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Whether the displayed data missed the last poll.
    pub fn is_stale(&self) -> bool {
        self.last_error.is_some()
    }

    /// Time of the last successful update (unix seconds).
    pub fn last_update(&self) -> Option<f64> {
        self.last_update
    }
}

/// Owned copy of what one frame displays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    containers: Vec<String>,
    selected: usize,
    series: Option<SeriesBuffer>,
    stale: bool,
}

impl Snapshot {
    /// Registered container ids in first-seen order.
    pub fn containers(&self) -> &[String] {
        &self.containers
    }

    /// Index of the selected container.
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Id of the selected container, if any container is registered.
    pub fn selected_container(&self) -> Option<&str> {
        self.containers.get(self.selected).map(String::as_str)
    }

    /// Samples of the selected container.
    pub fn series(&self) -> Option<&SeriesBuffer> {
        self.series.as_ref()
    }

    /// Whether the displayed data missed the last poll.
    pub fn is_stale(&self) -> bool {
        self.stale
    }
}

/// Shared session of one live stats run.
#[derive(Debug)]
pub struct Session {
    app: String,
    state: RwLock<SessionState>,
}

impl Session {
    /// Build the registry from the initial fetch and seed one sample per container.
    pub fn new(app: impl Into<String>, initial: &AppStats, at: f64) -> Self {
        let mut state = SessionState::default();
        for stat in &initial.stats {
            if state.series.contains_key(&stat.id) {
                continue;
            }
            let mut buffer = SeriesBuffer::default();
            buffer.push(at, stat);
            state.containers.push(stat.id.clone());
            state.series.insert(stat.id.clone(), buffer);
        }
        state.last_update = Some(at);

        Self {
            app: app.into(),
            state: RwLock::new(state),
        }
    }

    /// Application the session monitors.
    pub fn app(&self) -> &str {
        &self.app
    }

    /// Read access for rendering. Do not hold across an `.await`.
    pub fn state(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read()
    }

    /// Copy the registry, cursor and selected series for one frame.
    ///
    /// The lock is released before the caller draws.
    pub fn snapshot(&self) -> Snapshot {
        let state = self.state.read();
        Snapshot {
            containers: state.containers.clone(),
            selected: state.selected,
            series: state.selected_series().cloned(),
            stale: state.is_stale(),
        }
    }

    /// Move the cursor down, stopping at the last container.
    pub fn select_next(&self) -> usize {
        let mut state = self.state.write();
        if state.selected + 1 < state.containers.len() {
            state.selected += 1;
        }
        state.selected
    }

    /// Move the cursor up, stopping at the first container.
    pub fn select_previous(&self) -> usize {
        let mut state = self.state.write();
        state.selected = state.selected.saturating_sub(1);
        state.selected
    }

    /// Append a sample for every registered container present in `stats`.
    ///
    /// Containers absent from `stats` are skipped for this cycle and
    /// containers that were not part of the initial fetch are ignored.
    /// Returns the number of buffers updated.
    pub fn record(&self, at: f64, stats: &AppStats) -> usize {
        let mut guard = self.state.write();
        let state = &mut *guard;
        let mut updated = 0;
        for id in &state.containers {
            let (Some(stat), Some(buffer)) = (stats.get(id), state.series.get_mut(id)) else {
                continue;
            };
            buffer.push(at, stat);
            updated += 1;
        }
        state.polls += 1;
        state.last_error = None;
        state.last_update = Some(at);
        updated
    }

    /// Remember a failed poll so the UI can flag stale data.
    pub fn record_failure(&self, error: impl Into<String>) {
        let mut state = self.state.write();
        state.failed_polls += 1;
        state.last_error = Some(error.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn stat(id: &str, cpu: i64, memory: u64, swap: u64) -> ContainerStat {
        ContainerStat {
            id: id.into(),
            cpu_usage: cpu,
            memory_usage: memory,
            memory_limit: 512 * 1024 * 1024,
            swap_usage: swap,
            swap_limit: 512 * 1024 * 1024,
            highest_memory_usage: memory,
            highest_swap_usage: swap,
        }
    }

    fn stats(ids: &[&str]) -> AppStats {
        AppStats {
            stats: ids.iter().map(|id| stat(id, 10, 1024, 0)).collect(),
        }
    }

    #[test]
    fn registers_in_first_seen_order() {
        let session = Session::new("my-app", &stats(&["web-2", "web-1", "worker-1"]), 1.0);
        let state = session.state();
        assert_eq!(state.containers(), ["web-2", "web-1", "worker-1"]);
        assert_eq!(state.selected_container(), Some("web-2"));
        for id in state.containers() {
            assert_eq!(state.series(id).map(SeriesBuffer::len), Some(1));
        }
    }

    #[test]
    fn duplicate_ids_register_once() {
        let session = Session::new("my-app", &stats(&["web-1", "web-1"]), 1.0);
        assert_eq!(session.state().containers(), ["web-1"]);
    }

    #[test]
    fn cursor_clamps_at_both_ends() {
        let session = Session::new("my-app", &stats(&["a", "b", "c"]), 1.0);

        assert_eq!(session.select_previous(), 0);
        assert_eq!(session.select_next(), 1);
        assert_eq!(session.select_next(), 2);
        assert_eq!(session.select_next(), 2);
        assert_eq!(session.select_previous(), 1);
    }

    #[test]
    fn cursor_stays_in_range_for_any_sequence() {
        let session = Session::new("my-app", &stats(&["a", "b", "c", "d"]), 1.0);
        // Deterministic pseudo-random walk.
        let mut seed: u32 = 0x2545_f491;
        for _ in 0..1000 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let selected = if seed % 2 == 0 {
                session.select_next()
            } else {
                session.select_previous()
            };
            assert!(selected < 4);
        }
    }

    #[test]
    fn cursor_on_empty_registry_stays_zero() {
        let session = Session::new("my-app", &AppStats::default(), 1.0);
        assert_eq!(session.select_next(), 0);
        assert_eq!(session.select_previous(), 0);
        assert!(session.state().selected_container().is_none());
        assert!(session.state().selected_series().is_none());
    }

    #[test]
    fn record_grows_every_buffer_by_one() {
        let session = Session::new("my-app", &stats(&["web-1", "web-2"]), 1.0);
        for i in 0..5 {
            let updated = session.record(2.0 + f64::from(i), &stats(&["web-1", "web-2"]));
            assert_eq!(updated, 2);
        }

        let state = session.state();
        assert_eq!(state.polls(), 5);
        for id in state.containers() {
            assert_eq!(state.series(id).map(SeriesBuffer::len), Some(6));
        }
    }

    #[test]
    fn record_skips_missing_and_ignores_new_containers() {
        let session = Session::new("my-app", &stats(&["web-1", "web-2"]), 1.0);
        let updated = session.record(2.0, &stats(&["web-2", "web-3"]));
        assert_eq!(updated, 1);

        let state = session.state();
        assert_eq!(state.containers(), ["web-1", "web-2"]);
        assert_eq!(state.series("web-1").map(SeriesBuffer::len), Some(1));
        assert_eq!(state.series("web-2").map(SeriesBuffer::len), Some(2));
        assert!(state.series("web-3").is_none());
    }

    #[test]
    fn series_keep_values_and_timestamps() {
        let session = Session::new(
            "my-app",
            &AppStats {
                stats: vec![stat("web-1", 12, 2048, 512)],
            },
            100.0,
        );
        session.record(
            110.0,
            &AppStats {
                stats: vec![stat("web-1", 40, 4096, 0)],
            },
        );

        let state = session.state();
        let series = state.series("web-1").expect("web-1 series");
        assert_eq!(series.cpu(), [(100.0, 12.0), (110.0, 40.0)]);
        assert_eq!(series.memory(), [(100.0, 2048.0), (110.0, 4096.0)]);
        assert_eq!(series.swap(), [(100.0, 512.0), (110.0, 0.0)]);
    }

    #[test]
    fn failure_marks_stale_until_next_success() {
        let session = Session::new("my-app", &stats(&["web-1"]), 1.0);
        session.record_failure("connection reset");
        {
            let state = session.state();
            assert!(state.is_stale());
            assert_eq!(state.last_error(), Some("connection reset"));
            assert_eq!(state.failed_polls(), 1);
            assert_eq!(state.series("web-1").map(SeriesBuffer::len), Some(1));
        }

        session.record(2.0, &stats(&["web-1"]));
        let state = session.state();
        assert!(!state.is_stale());
        assert_eq!(state.last_update(), Some(2.0));
    }

    #[test]
    fn snapshot_is_detached_from_later_updates() {
        let session = Session::new("my-app", &stats(&["web-1", "web-2"]), 1.0);
        session.select_next();
        let snapshot = session.snapshot();

        session.record(2.0, &stats(&["web-1", "web-2"]));
        session.select_previous();
        session.record_failure("timeout");

        assert_eq!(snapshot.containers(), ["web-1", "web-2"]);
        assert_eq!(snapshot.selected_container(), Some("web-2"));
        assert_eq!(snapshot.series().map(SeriesBuffer::len), Some(1));
        assert!(!snapshot.is_stale());

        let latest = session.snapshot();
        assert_eq!(latest.selected_container(), Some("web-1"));
        assert_eq!(latest.series().map(SeriesBuffer::len), Some(2));
        assert!(latest.is_stale());
    }

    #[test]
    fn snapshot_of_empty_registry() {
        let snapshot = Session::new("my-app", &AppStats::default(), 1.0).snapshot();
        assert!(snapshot.containers().is_empty());
        assert!(snapshot.selected_container().is_none());
        assert!(snapshot.series().is_none());
    }

    #[test]
    fn concurrent_navigation_and_polls_keep_state_consistent() {
        let session = std::sync::Arc::new(Session::new("my-app", &stats(&["a", "b", "c"]), 0.0));

        let poller = {
            let session = std::sync::Arc::clone(&session);
            std::thread::spawn(move || {
                for i in 1..=200 {
                    session.record(f64::from(i), &stats(&["a", "b", "c"]));
                }
            })
        };
        let navigator = {
            let session = std::sync::Arc::clone(&session);
            std::thread::spawn(move || {
                for i in 0..500 {
                    let selected = if i % 3 == 0 {
                        session.select_previous()
                    } else {
                        session.select_next()
                    };
                    assert!(selected < 3);
                }
            })
        };

        poller.join().expect("poller thread");
        navigator.join().expect("navigator thread");

        let state = session.state();
        assert_eq!(state.containers(), ["a", "b", "c"]);
        assert!(state.selected() < 3);
        for id in state.containers() {
            assert_eq!(state.series(id).map(SeriesBuffer::len), Some(201));
        }
    }
}
