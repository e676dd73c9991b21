use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Deployment target a session connects against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    #[default]
    Prod,
    Stage,
    Qa,
    Dev,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Prod => "prod",
            Environment::Stage => "stage",
            Environment::Qa => "qa",
            Environment::Dev => "dev",
        }
    }

    /// Lenient parse: unknown or empty strings fall back to production.
    pub fn from_str_lossy(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }

    /// Host suffix for service URLs (`""` for production).
    pub fn url_suffix(&self) -> String {
        match self {
            Environment::Prod => String::new(),
            other => format!("-{}", other.as_str()),
        }
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "prod" => Ok(Environment::Prod),
            "stage" => Ok(Environment::Stage),
            "qa" => Ok(Environment::Qa),
            "dev" => Ok(Environment::Dev),
            other => Err(format!("unknown environment: {other}")),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
