use std::fmt;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    Info,
    Action,
    Error,
    Request,
    Response,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub time: DateTime<Local>,
    pub kind: LogKind,
    pub message: String,
}

impl LogEntry {
    pub fn new(kind: LogKind, message: impl Into<String>) -> Self {
        Self {
            time: Local::now(),
            kind,
            message: message.into(),
        }
    }
}

impl LogKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LogKind::Info => "info",
            LogKind::Action => "action",
            LogKind::Error => "error",
            LogKind::Request => "req",
            LogKind::Response => "res",
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {:<6} {}",
            self.time.format("%H:%M:%S"),
            self.kind.as_str(),
            self.message
        )
    }
}
