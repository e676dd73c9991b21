use std::sync::Arc;

use super::destination::Destination;
use super::handler::SessionUiOperationHandler;
use super::state::SessionPhase;
use crate::state::{AppState, UiLogLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusScreenAction {
    Disconnect,
}

/// Screen shown while a session is live or silently reconnecting.
///
/// Reads the phase the authorization screens publish to [`AppState`] and
/// lets the user end the session.
pub struct StatusScreenController {
    handler: Arc<dyn SessionUiOperationHandler>,
    app_state: AppState,
}

impl StatusScreenController {
    pub fn new(handler: Arc<dyn SessionUiOperationHandler>, app_state: AppState) -> Self {
        Self { handler, app_state }
    }

    pub fn destination(&self) -> Option<Destination> {
        self.app_state.destination()
    }

    /// Returns `true` if the action reached the handler.
    pub fn dispatch(&mut self, action: StatusScreenAction) -> bool {
        match action {
            StatusScreenAction::Disconnect => {
                if self.destination() != Some(Destination::Status) {
                    tracing::debug!("disconnect with no live session");
                    return false;
                }
                tracing::info!("user disconnected the session");
                self.handler.disconnect();
                self.app_state.log_status(UiLogLevel::High, "Session disconnected");
                self.app_state
                    .on_session_phase_change(SessionPhase::Disconnected {
                        error: None,
                        reconnecting: false,
                    });
                true
            }
        }
    }
}
