use std::sync::{Arc, mpsc};
use std::time::Duration;

use super::environment::Environment;
use super::handler::{SessionUiOperationHandler, StatusSender, StatusUpdate};
use super::state::{ConnectionMethod, SessionConnectionState, SessionPhase};
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickConnectAction {
    Connect,
    Cancel,
    Retry,
}

/// QuickConnect counterpart of the PIN screen controller.
///
/// Same three-state machine; the only difference is that `Connect` registers
/// the device for approval instead of sending a PIN.
pub struct QuickConnectController {
    environment: Environment,
    handler: Arc<dyn SessionUiOperationHandler>,
    state: SessionConnectionState,
    status_tx: mpsc::Sender<StatusUpdate>,
    status_rx: mpsc::Receiver<StatusUpdate>,
    app_state: Option<AppState>,
    closed: bool,
}

impl QuickConnectController {
    pub fn new(environment: Environment, handler: Arc<dyn SessionUiOperationHandler>) -> Self {
        let (status_tx, status_rx) = mpsc::channel();
        Self {
            environment,
            handler,
            state: SessionConnectionState::idle(),
            status_tx,
            status_rx,
            app_state: None,
            closed: false,
        }
    }

    pub fn with_app_state(mut self, app_state: AppState) -> Self {
        self.app_state = Some(app_state);
        self
    }

    pub fn state(&self) -> &SessionConnectionState {
        &self.state
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn dispatch(&mut self, action: QuickConnectAction) {
        if self.closed {
            return;
        }
        match action {
            QuickConnectAction::Connect => {
                if self.state != SessionConnectionState::idle() {
                    tracing::debug!(state = ?self.state, "connect while not idle");
                    return;
                }
                tracing::info!(environment = %self.environment, "registering device for QuickConnect");
                self.state = SessionConnectionState::Authorizing {
                    method: ConnectionMethod::QuickConnect {
                        environment: self.environment,
                    },
                };
                self.publish();
                self.handler.register_device(
                    self.environment,
                    StatusSender::new(self.status_tx.clone()),
                );
            }
            QuickConnectAction::Cancel => {
                tracing::info!("QuickConnect cancelled");
                self.handler.cancel();
                self.closed = true;
            }
            QuickConnectAction::Retry => {
                if self.state.retry() {
                    self.publish();
                }
            }
        }
    }

    pub fn process_status(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(update) = self.status_rx.try_recv() {
            if self.apply_status(update) {
                applied += 1;
            }
        }
        applied
    }

    pub fn wait_for_status(&mut self, timeout: Duration) -> bool {
        match self.status_rx.recv_timeout(timeout) {
            Ok(update) => self.apply_status(update),
            Err(_) => false,
        }
    }

    fn apply_status(&mut self, update: StatusUpdate) -> bool {
        if self.closed || !self.state.apply_status(&update) {
            return false;
        }
        tracing::info!(state = ?self.state, "QuickConnect state changed");
        self.publish();
        if self.state.is_connected() {
            self.closed = true;
        }
        true
    }

    fn publish(&self) {
        if let Some(app_state) = &self.app_state {
            app_state.on_session_phase_change(SessionPhase::from(&self.state));
        }
    }
}
