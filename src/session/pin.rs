use std::sync::{Arc, mpsc};
use std::time::Duration;

use super::environment::Environment;
use super::error::ConnectionError;
use super::handler::{AuthMethod, SessionUiOperationHandler, StatusSender, StatusUpdate};
use super::state::{ConnectionMethod, SessionConnectionState, SessionPhase};
use crate::state::AppState;

/// Number of digits in a session PIN.
pub const PIN_LENGTH: usize = 4;

/// Everything the PIN screen renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PinEntryState {
    pub pin: String,
    pub connection_state: SessionConnectionState,
}

impl PinEntryState {
    /// Append a digit. Non-digits and input past [`PIN_LENGTH`] are ignored.
    pub fn push_digit(&mut self, digit: char) -> bool {
        if !digit.is_ascii_digit() || self.pin.len() >= PIN_LENGTH {
            return false;
        }
        self.pin.push(digit);
        true
    }

    /// Remove the last digit, if any.
    pub fn delete(&mut self) -> bool {
        self.pin.pop().is_some()
    }

    pub fn is_complete(&self) -> bool {
        self.pin.len() == PIN_LENGTH
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PinScreenAction {
    Number(char),
    Delete,
    Connect(String),
    Cancel,
    Retry,
}

/// Owns the PIN screen state and is its only writer.
///
/// User actions arrive through [`dispatch`](Self::dispatch); handler
/// callbacks are queued on an internal channel and applied by
/// [`process_status`](Self::process_status) on the same thread.
pub struct PinScreenController {
    session_id: String,
    environment: Environment,
    handler: Arc<dyn SessionUiOperationHandler>,
    state: PinEntryState,
    status_tx: mpsc::Sender<StatusUpdate>,
    status_rx: mpsc::Receiver<StatusUpdate>,
    app_state: Option<AppState>,
    closed: bool,
}

impl PinScreenController {
    pub fn new(
        session_id: impl Into<String>,
        environment: Environment,
        handler: Arc<dyn SessionUiOperationHandler>,
    ) -> Self {
        let (status_tx, status_rx) = mpsc::channel();
        Self {
            session_id: session_id.into(),
            environment,
            handler,
            state: PinEntryState::default(),
            status_tx,
            status_rx,
            app_state: None,
            closed: false,
        }
    }

    /// Publish every connection state change to `app_state` for navigation.
    pub fn with_app_state(mut self, app_state: AppState) -> Self {
        self.app_state = Some(app_state);
        self
    }

    pub fn state(&self) -> &PinEntryState {
        &self.state
    }

    /// The screen is done: the user cancelled or the session connected.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn dispatch(&mut self, action: PinScreenAction) {
        if self.closed {
            tracing::debug!(?action, "ignoring action on closed PIN screen");
            return;
        }
        match action {
            PinScreenAction::Number(digit) => {
                self.state.push_digit(digit);
            }
            PinScreenAction::Delete => {
                self.state.delete();
            }
            PinScreenAction::Connect(pin) => self.connect(&pin),
            PinScreenAction::Cancel => {
                tracing::info!(session_id = %self.session_id, "PIN authorization cancelled");
                self.handler.cancel();
                self.closed = true;
            }
            PinScreenAction::Retry => {
                if self.state.connection_state.retry() {
                    self.state.pin.clear();
                    self.publish();
                }
            }
        }
    }

    fn connect(&mut self, pin: &str) {
        // An error must be cleared by Retry first; terminal errors never are.
        if self.state.connection_state != SessionConnectionState::idle() {
            tracing::debug!(state = ?self.state.connection_state, "connect while not idle");
            return;
        }

        if self.session_id.trim().is_empty() {
            tracing::warn!("cannot connect: session id is blank");
            self.state.connection_state = SessionConnectionState::Disconnected {
                error: Some(ConnectionError::UnexpectedError),
            };
            self.publish();
            return;
        }

        if pin.len() != PIN_LENGTH || !pin.chars().all(|c| c.is_ascii_digit()) {
            tracing::debug!(len = pin.len(), "connect with incomplete PIN");
            return;
        }

        tracing::info!(
            session_id = %self.session_id,
            environment = %self.environment,
            "authorizing with PIN"
        );
        self.state.connection_state = SessionConnectionState::Authorizing {
            method: ConnectionMethod::PinConnect {
                session_id: self.session_id.clone(),
                environment: self.environment,
            },
        };
        self.publish();
        self.handler.connect_with_pin(
            &self.session_id,
            pin,
            self.environment,
            StatusSender::new(self.status_tx.clone()),
            AuthMethod::Pin,
        );
    }

    /// Apply every status update received so far. Returns how many advanced
    /// the state.
    pub fn process_status(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(update) = self.status_rx.try_recv() {
            if self.apply_status(update) {
                applied += 1;
            }
        }
        applied
    }

    /// Block up to `timeout` for one status update and apply it.
    pub fn wait_for_status(&mut self, timeout: Duration) -> bool {
        match self.status_rx.recv_timeout(timeout) {
            Ok(update) => self.apply_status(update),
            Err(_) => false,
        }
    }

    fn apply_status(&mut self, update: StatusUpdate) -> bool {
        if self.closed {
            return false;
        }
        let advanced = self.state.connection_state.apply_status(&update);
        if advanced {
            tracing::info!(state = ?self.state.connection_state, "PIN screen state changed");
            self.publish();
            if self.state.connection_state.is_connected() {
                self.closed = true;
            }
        }
        advanced
    }

    fn publish(&self) {
        if let Some(app_state) = &self.app_state {
            app_state.on_session_phase_change(SessionPhase::from(&self.state.connection_state));
        }
    }
}
