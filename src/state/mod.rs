mod models;

pub use models::*;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::session::{Destination, SessionPhase, resolve};

/// Default number of status lines kept for the status view.
pub const DEFAULT_LOG_CAPACITY: usize = 200;

/// Point-in-time copy of [`AppState`] handed to observers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppStateSnapshot {
    pub phase: Option<SessionPhase>,
    pub logs: Vec<StatusLog>,
}

struct Inner {
    phase: Option<SessionPhase>,
    logs: VecDeque<StatusLog>,
}

/// Shared state the session layer publishes for the UI: the current phase and
/// a bounded log of status lines.
///
/// Writers replace whole values under one lock; readers only ever see
/// snapshots. Cheap to clone, clones share the same cell.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Mutex<Inner>>,
    capacity: usize,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

impl AppState {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Arc::new(Mutex::new(Inner {
                phase: None,
                logs: VecDeque::with_capacity(capacity),
            })),
            capacity,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn on_session_phase_change(&self, phase: SessionPhase) {
        tracing::debug!(?phase, "session phase changed");
        self.lock().phase = Some(phase);
    }

    /// Append a status line, dropping the oldest once full.
    pub fn log_status(&self, level: UiLogLevel, message: impl Into<String>) {
        let log = StatusLog::new(level, message);
        let mut inner = self.lock();
        while inner.logs.len() >= self.capacity {
            inner.logs.pop_front();
        }
        inner.logs.push_back(log);
    }

    pub fn clear_logs(&self) {
        self.lock().logs.clear();
    }

    pub fn snapshot(&self) -> AppStateSnapshot {
        let inner = self.lock();
        AppStateSnapshot {
            phase: inner.phase.clone(),
            logs: inner.logs.iter().cloned().collect(),
        }
    }

    /// Where navigation should go for the current phase, if one was published.
    pub fn destination(&self) -> Option<Destination> {
        self.lock().phase.as_ref().map(resolve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::ConnectionError;

    #[test]
    fn starts_empty() {
        let state = AppState::default();
        assert_eq!(state.snapshot(), AppStateSnapshot::default());
        assert_eq!(state.destination(), None);
    }

    #[test]
    fn logs_are_capped_oldest_first() {
        let state = AppState::new(3);
        for i in 0..5 {
            state.log_status(UiLogLevel::Normal, format!("line {i}"));
        }
        let messages: Vec<_> = state
            .snapshot()
            .logs
            .into_iter()
            .map(|l| l.message)
            .collect();
        assert_eq!(messages, ["line 2", "line 3", "line 4"]);
    }

    #[test]
    fn clear_logs_keeps_phase() {
        let state = AppState::default();
        state.on_session_phase_change(SessionPhase::Connected);
        state.log_status(UiLogLevel::High, "connected");
        state.clear_logs();
        let snap = state.snapshot();
        assert!(snap.logs.is_empty());
        assert_eq!(snap.phase, Some(SessionPhase::Connected));
    }

    #[test]
    fn destination_follows_phase() {
        let state = AppState::default();
        state.on_session_phase_change(SessionPhase::Disconnected {
            error: Some(ConnectionError::EventLimit),
            reconnecting: false,
        });
        assert_eq!(
            state.destination(),
            Some(Destination::Error(ConnectionError::EventLimit))
        );
    }

    #[test]
    fn clones_share_state() {
        let state = AppState::default();
        let writer = state.clone();
        std::thread::spawn(move || writer.log_status(UiLogLevel::Low, "from thread"))
            .join()
            .unwrap();
        assert_eq!(state.snapshot().logs.len(), 1);
    }

    #[test]
    fn zero_capacity_keeps_latest() {
        let state = AppState::new(0);
        state.log_status(UiLogLevel::Low, "a");
        state.log_status(UiLogLevel::Low, "b");
        let logs = state.snapshot().logs;
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].message, "b");
    }
}
