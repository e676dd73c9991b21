use serde::{Deserialize, Serialize};

use super::environment::Environment;
use super::error::ConnectionError;
use super::handler::StatusUpdate;

/// How an in-progress authorization is being performed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum ConnectionMethod {
    PinConnect {
        session_id: String,
        environment: Environment,
    },
    QuickConnect {
        environment: Environment,
    },
}

impl ConnectionMethod {
    pub fn environment(&self) -> Environment {
        match self {
            Self::PinConnect { environment, .. } | Self::QuickConnect { environment } => {
                *environment
            }
        }
    }
}

/// What a PIN or QuickConnect screen's session attempt is doing right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionConnectionState {
    Disconnected { error: Option<ConnectionError> },
    Authorizing { method: ConnectionMethod },
    Connected,
}

impl Default for SessionConnectionState {
    fn default() -> Self {
        Self::idle()
    }
}

impl SessionConnectionState {
    /// Fresh idle state.
    pub fn idle() -> Self {
        Self::Disconnected { error: None }
    }

    pub fn error(&self) -> Option<ConnectionError> {
        match self {
            Self::Disconnected { error } => *error,
            _ => None,
        }
    }

    pub fn is_authorizing(&self) -> bool {
        matches!(self, Self::Authorizing { .. })
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }

    /// Apply a status callback from the authorization handler.
    ///
    /// Only `Authorizing` advances; callbacks in any other state are ignored
    /// and `false` is returned.
    pub fn apply_status(&mut self, update: &StatusUpdate) -> bool {
        if !self.is_authorizing() {
            tracing::debug!(?update, state = ?self, "ignoring status update outside authorization");
            return false;
        }
        *self = match update {
            StatusUpdate::Connected => Self::Connected,
            StatusUpdate::Disconnected(error) | StatusUpdate::Terminated(error) => {
                Self::Disconnected {
                    error: Some(*error),
                }
            }
        };
        true
    }

    /// Re-arm the idle input state after a retryable failure.
    pub fn retry(&mut self) -> bool {
        match self {
            Self::Disconnected { error: Some(error) } if error.is_retryable() => {
                *self = Self::idle();
                true
            }
            _ => false,
        }
    }
}

/// Session phase snapshot published by the session layer for navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum SessionPhase {
    Authorizing {
        method: ConnectionMethod,
    },
    Connected,
    Disconnected {
        error: Option<ConnectionError>,
        /// A silent reconnect is in progress.
        reconnecting: bool,
    },
}

impl From<&SessionConnectionState> for SessionPhase {
    fn from(state: &SessionConnectionState) -> Self {
        match state {
            SessionConnectionState::Disconnected { error } => SessionPhase::Disconnected {
                error: *error,
                reconnecting: false,
            },
            SessionConnectionState::Authorizing { method } => SessionPhase::Authorizing {
                method: method.clone(),
            },
            SessionConnectionState::Connected => SessionPhase::Connected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authorizing() -> SessionConnectionState {
        SessionConnectionState::Authorizing {
            method: ConnectionMethod::PinConnect {
                session_id: "sid".into(),
                environment: Environment::Qa,
            },
        }
    }

    #[test]
    fn default_is_idle() {
        assert_eq!(
            SessionConnectionState::default(),
            SessionConnectionState::Disconnected { error: None }
        );
    }

    #[test]
    fn connected_only_from_authorizing() {
        let mut state = SessionConnectionState::idle();
        assert!(!state.apply_status(&StatusUpdate::Connected));
        assert_eq!(state, SessionConnectionState::idle());

        let mut state = authorizing();
        assert!(state.apply_status(&StatusUpdate::Connected));
        assert!(state.is_connected());
    }

    #[test]
    fn disconnect_and_terminate_carry_error() {
        let mut state = authorizing();
        state.apply_status(&StatusUpdate::Disconnected(ConnectionError::GenericError));
        assert_eq!(state.error(), Some(ConnectionError::GenericError));

        let mut state = authorizing();
        state.apply_status(&StatusUpdate::Terminated(ConnectionError::SessionDeleted));
        assert_eq!(state.error(), Some(ConnectionError::SessionDeleted));
    }

    #[test]
    fn late_callbacks_after_connect_are_ignored() {
        let mut state = authorizing();
        state.apply_status(&StatusUpdate::Connected);
        assert!(!state.apply_status(&StatusUpdate::Terminated(ConnectionError::ClientError)));
        assert!(state.is_connected());
    }

    #[test]
    fn retry_only_on_retryable_error() {
        let mut state = SessionConnectionState::Disconnected {
            error: Some(ConnectionError::GenericError),
        };
        assert!(state.retry());
        assert_eq!(state, SessionConnectionState::idle());

        let mut state = SessionConnectionState::Disconnected {
            error: Some(ConnectionError::OrgIdMismatch),
        };
        assert!(!state.retry());
        assert_eq!(state.error(), Some(ConnectionError::OrgIdMismatch));

        let mut state = SessionConnectionState::idle();
        assert!(!state.retry());
    }

    #[test]
    fn phase_from_screen_state() {
        assert_eq!(
            SessionPhase::from(&authorizing()),
            SessionPhase::Authorizing {
                method: ConnectionMethod::PinConnect {
                    session_id: "sid".into(),
                    environment: Environment::Qa,
                }
            }
        );
        assert_eq!(
            SessionPhase::from(&SessionConnectionState::Disconnected {
                error: Some(ConnectionError::EventLimit)
            }),
            SessionPhase::Disconnected {
                error: Some(ConnectionError::EventLimit),
                reconnecting: false,
            }
        );
        assert_eq!(
            SessionPhase::from(&SessionConnectionState::Connected),
            SessionPhase::Connected
        );
    }

    #[test]
    fn method_environment() {
        let quick = ConnectionMethod::QuickConnect {
            environment: Environment::Dev,
        };
        assert_eq!(quick.environment(), Environment::Dev);
    }
}
