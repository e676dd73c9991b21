use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Event type used by the remote service for control commands.
pub const CONTROL_EVENT_TYPE: &str = "control";

/// A single event exchanged with the remote inspection service.
///
/// The dispatch engine treats this as an opaque token; only the application
/// event bus looks inside `payload`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssuranceEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub payload: Map<String, Value>,
    /// Originating vendor, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    /// Milliseconds since the Unix epoch, as stamped by the sender.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl AssuranceEvent {
    pub fn new(event_type: impl Into<String>, payload: Map<String, Value>) -> Self {
        Self {
            event_type: event_type.into(),
            payload,
            vendor: None,
            timestamp: None,
        }
    }

    /// Parse one JSON object into an event.
    pub fn from_json(line: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(line)?)
    }

    pub fn is_control(&self) -> bool {
        self.event_type == CONTROL_EVENT_TYPE
    }

    /// The control command name (`payload.type`) for control events.
    pub fn control_type(&self) -> Option<&str> {
        if !self.is_control() {
            return None;
        }
        self.payload.get("type").and_then(Value::as_str)
    }
}
