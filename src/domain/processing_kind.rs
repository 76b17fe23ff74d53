use std::fmt;
use std::str::FromStr;

/// How a voice note entered the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessingKind {
    Webhook,
    Api,
}

impl ProcessingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingKind::Webhook => "webhook",
            ProcessingKind::Api => "api",
        }
    }
}

impl FromStr for ProcessingKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "webhook" => Ok(ProcessingKind::Webhook),
            "api" => Ok(ProcessingKind::Api),
            _ => Err(format!("Invalid processing kind: {}", s)),
        }
    }
}

impl fmt::Display for ProcessingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
