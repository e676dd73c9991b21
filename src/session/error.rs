use std::fmt;

use serde::{Deserialize, Serialize};

/// Why a session attempt or a live session ended abnormally.
///
/// Carried as data inside `SessionConnectionState::Disconnected`; the
/// `is_retryable` flag decides whether a screen offers a retry action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectionError {
    GenericError,
    NoOrgId,
    OrgIdMismatch,
    ConnectionLimit,
    EventLimit,
    ClientError,
    SessionDeleted,
    CreateDeviceRequestMalformed,
    StatusCheckRequestMalformed,
    RetryLimitReached,
    UserCancelled,
    UnexpectedError,
}

/// Normal socket closure; not an error.
pub const CLOSE_NORMAL: u16 = 1000;
pub const CLOSE_ORG_MISMATCH: u16 = 4900;
pub const CLOSE_CONNECTION_LIMIT: u16 = 4901;
pub const CLOSE_EVENT_LIMIT: u16 = 4902;
pub const CLOSE_SESSION_DELETED: u16 = 4903;
pub const CLOSE_CLIENT_ERROR: u16 = 4400;

impl ConnectionError {
    pub const ALL: [Self; 12] = [
        Self::GenericError,
        Self::NoOrgId,
        Self::OrgIdMismatch,
        Self::ConnectionLimit,
        Self::EventLimit,
        Self::ClientError,
        Self::SessionDeleted,
        Self::CreateDeviceRequestMalformed,
        Self::StatusCheckRequestMalformed,
        Self::RetryLimitReached,
        Self::UserCancelled,
        Self::UnexpectedError,
    ];

    /// Short user-facing title.
    pub fn error(&self) -> &'static str {
        match self {
            Self::GenericError => "Connection Error",
            Self::NoOrgId => "Invalid Configuration",
            Self::OrgIdMismatch => "Unauthorized Access",
            Self::ConnectionLimit => "Connection Limit Reached",
            Self::EventLimit => "Event Limit Reached",
            Self::ClientError => "Client Disconnected",
            Self::SessionDeleted => "Session Deleted",
            Self::CreateDeviceRequestMalformed | Self::StatusCheckRequestMalformed => {
                "Malformed Request"
            }
            Self::RetryLimitReached => "Retry Limit Reached",
            Self::UserCancelled => "Cancelled",
            Self::UnexpectedError => "Unexpected Error",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::GenericError => {
                "The connection may be failing due to a network issue or an incorrect PIN. \
                 Verify internet connectivity or the PIN and try again."
            }
            Self::NoOrgId => {
                "The organization identifier is unavailable. \
                 Ensure the SDK configuration is set up correctly."
            }
            Self::OrgIdMismatch => {
                "The organization identifier does not match that of the session. \
                 Ensure the right organization is being used."
            }
            Self::ConnectionLimit => {
                "You have reached the maximum number of connections allowed for a session."
            }
            Self::EventLimit => {
                "You have reached the maximum number of events that can be sent per minute."
            }
            Self::ClientError => {
                "This client has been disconnected due to an unexpected error. Error Code 4400."
            }
            Self::SessionDeleted => "The session the client connected to has been deleted.",
            Self::CreateDeviceRequestMalformed => "The device registration request was malformed.",
            Self::StatusCheckRequestMalformed => "The device status request was malformed.",
            Self::RetryLimitReached => {
                "The device was not approved in time. Approve the device and try again."
            }
            Self::UserCancelled => "The connection was cancelled by the user.",
            Self::UnexpectedError => "An unexpected error occurred. Please try again.",
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::GenericError
                | Self::CreateDeviceRequestMalformed
                | Self::StatusCheckRequestMalformed
                | Self::RetryLimitReached
                | Self::UnexpectedError
        )
    }

    /// Map a socket close code to the error it signals.
    ///
    /// Returns `None` for a normal closure.
    pub fn from_close_code(code: u16) -> Option<Self> {
        match code {
            CLOSE_NORMAL => None,
            CLOSE_ORG_MISMATCH => Some(Self::OrgIdMismatch),
            CLOSE_CONNECTION_LIMIT => Some(Self::ConnectionLimit),
            CLOSE_EVENT_LIMIT => Some(Self::EventLimit),
            CLOSE_SESSION_DELETED => Some(Self::SessionDeleted),
            CLOSE_CLIENT_ERROR => Some(Self::ClientError),
            _ => Some(Self::GenericError),
        }
    }
}

impl fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error(), self.description())
    }
}

impl std::error::Error for ConnectionError {}
