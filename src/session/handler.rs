use std::sync::mpsc;

use super::environment::Environment;
use super::error::ConnectionError;

/// Outcome reported by the authorization handler for an in-flight attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusUpdate {
    Connected,
    Disconnected(ConnectionError),
    Terminated(ConnectionError),
}

/// Which screen started the authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    Pin,
    QuickConnect,
}

impl AuthMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMethod::Pin => "pin",
            AuthMethod::QuickConnect => "quick_connect",
        }
    }
}

/// Handed to the authorization handler so it can report back asynchronously.
///
/// Updates land in the owning controller's inbox and are applied on the
/// controller's own thread, in arrival order with user actions.
#[derive(Debug, Clone)]
pub struct StatusSender {
    tx: mpsc::Sender<StatusUpdate>,
}

impl StatusSender {
    pub fn new(tx: mpsc::Sender<StatusUpdate>) -> Self {
        Self { tx }
    }

    pub fn on_session_connected(&self) {
        self.send(StatusUpdate::Connected);
    }

    pub fn on_session_disconnected(&self, error: ConnectionError) {
        self.send(StatusUpdate::Disconnected(error));
    }

    pub fn on_session_terminated(&self, error: ConnectionError) {
        self.send(StatusUpdate::Terminated(error));
    }

    fn send(&self, update: StatusUpdate) {
        // The screen may already be gone; late updates are meaningless then.
        if self.tx.send(update).is_err() {
            tracing::debug!(?update, "status update after controller was dropped");
        }
    }
}

/// Bridge from the screens to the session transport.
///
/// Implementations perform the actual handshake (out of scope here) and
/// report the result through the supplied [`StatusSender`].
pub trait SessionUiOperationHandler: Send + Sync {
    fn connect_with_pin(
        &self,
        session_id: &str,
        pin: &str,
        environment: Environment,
        status: StatusSender,
        auth_method: AuthMethod,
    );

    /// Register this device for QuickConnect approval.
    fn register_device(&self, environment: Environment, status: StatusSender);

    /// The user abandoned the authorization screen.
    fn cancel(&self);

    /// The user asked to end a live session.
    fn disconnect(&self);
}
