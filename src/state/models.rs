use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity of a line shown in the session status view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UiLogLevel {
    Low,
    Normal,
    High,
    Critical,
}

impl UiLogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            UiLogLevel::Low => "low",
            UiLogLevel::Normal => "normal",
            UiLogLevel::High => "high",
            UiLogLevel::Critical => "critical",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            UiLogLevel::Low => "·",
            UiLogLevel::Normal => "●",
            UiLogLevel::High => "▲",
            UiLogLevel::Critical => "✗",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusLog {
    pub level: UiLogLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl StatusLog {
    pub fn new(level: UiLogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_name_matches_as_str() {
        for level in [
            UiLogLevel::Low,
            UiLogLevel::Normal,
            UiLogLevel::High,
            UiLogLevel::Critical,
        ] {
            let json = serde_json::to_string(&level).unwrap();
            assert_eq!(json, format!("\"{}\"", level.as_str()));
        }
    }

    #[test]
    fn levels_are_ordered() {
        assert!(UiLogLevel::Low < UiLogLevel::Critical);
        assert!(UiLogLevel::Normal < UiLogLevel::High);
    }
}
