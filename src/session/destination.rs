use super::environment::Environment;
use super::error::ConnectionError;
use super::state::{ConnectionMethod, SessionPhase};

/// Screen the navigation layer should show for a session phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Pin {
        session_id: String,
        environment: Environment,
    },
    QuickConnect {
        environment: Environment,
    },
    Status,
    Error(ConnectionError),
    /// Idle with no error and no reconnect. Callers end the flow.
    Unknown,
}

pub fn resolve(phase: &SessionPhase) -> Destination {
    match phase {
        SessionPhase::Connected
        | SessionPhase::Disconnected {
            reconnecting: true, ..
        } => Destination::Status,
        SessionPhase::Authorizing {
            method:
                ConnectionMethod::PinConnect {
                    session_id,
                    environment,
                },
        } => Destination::Pin {
            session_id: session_id.clone(),
            environment: *environment,
        },
        SessionPhase::Authorizing {
            method: ConnectionMethod::QuickConnect { environment },
        } => Destination::QuickConnect {
            environment: *environment,
        },
        SessionPhase::Disconnected {
            error: Some(error),
            reconnecting: false,
        } => Destination::Error(*error),
        SessionPhase::Disconnected {
            error: None,
            reconnecting: false,
        } => Destination::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connected_shows_status() {
        assert_eq!(resolve(&SessionPhase::Connected), Destination::Status);
    }

    #[test]
    fn reconnecting_shows_status_even_with_error() {
        for error in [None, Some(ConnectionError::GenericError)] {
            let phase = SessionPhase::Disconnected {
                error,
                reconnecting: true,
            };
            assert_eq!(resolve(&phase), Destination::Status);
        }
    }

    #[test]
    fn error_shows_error() {
        let phase = SessionPhase::Disconnected {
            error: Some(ConnectionError::SessionDeleted),
            reconnecting: false,
        };
        assert_eq!(
            resolve(&phase),
            Destination::Error(ConnectionError::SessionDeleted)
        );
    }

    #[test]
    fn idle_is_unknown() {
        let phase = SessionPhase::Disconnected {
            error: None,
            reconnecting: false,
        };
        assert_eq!(resolve(&phase), Destination::Unknown);
    }

    #[test]
    fn pin_carries_session_and_environment() {
        let phase = SessionPhase::Authorizing {
            method: ConnectionMethod::PinConnect {
                session_id: "abc".into(),
                environment: Environment::Dev,
            },
        };
        assert_eq!(
            resolve(&phase),
            Destination::Pin {
                session_id: "abc".into(),
                environment: Environment::Dev,
            }
        );
    }

    #[test]
    fn quick_connect_carries_environment() {
        let phase = SessionPhase::Authorizing {
            method: ConnectionMethod::QuickConnect {
                environment: Environment::Prod,
            },
        };
        assert_eq!(
            resolve(&phase),
            Destination::QuickConnect {
                environment: Environment::Prod
            }
        );
    }
}
