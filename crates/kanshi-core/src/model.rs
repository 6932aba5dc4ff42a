//! Attack log data models

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// Threat level reported by the sensor
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ThreatLevel {
    Critical,
    Warning,
    Info,
    /// Value outside the closed set, kept verbatim
    Unrecognized(String),
}

impl ThreatLevel {
    /// Recognized levels in display order
    pub const KNOWN: [ThreatLevel; 3] = [ThreatLevel::Critical, ThreatLevel::Warning, ThreatLevel::Info];

    /// Wire name of the level
    pub fn as_str(&self) -> &str {
        match self {
            ThreatLevel::Critical => "CRITICAL",
            ThreatLevel::Warning => "WARNING",
            ThreatLevel::Info => "INFO",
            ThreatLevel::Unrecognized(raw) => raw,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, ThreatLevel::Unrecognized(_))
    }

    /// Value used when the field is absent from the input
    pub fn missing() -> Self {
        ThreatLevel::Unrecognized(String::new())
    }
}

impl From<&str> for ThreatLevel {
    fn from(s: &str) -> Self {
        match s {
            "CRITICAL" => ThreatLevel::Critical,
            "WARNING" => ThreatLevel::Warning,
            "INFO" => ThreatLevel::Info,
            other => ThreatLevel::Unrecognized(other.to_string()),
        }
    }
}

impl From<String> for ThreatLevel {
    fn from(s: String) -> Self {
        match s.as_str() {
            "CRITICAL" | "WARNING" | "INFO" => ThreatLevel::from(s.as_str()),
            _ => ThreatLevel::Unrecognized(s),
        }
    }
}

impl From<ThreatLevel> for String {
    fn from(level: ThreatLevel) -> Self {
        match level {
            ThreatLevel::Unrecognized(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ThreatLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the attack attempt
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AttackStatus {
    Blocked,
    Success,
    Pending,
    /// Value outside the closed set, kept verbatim
    Unrecognized(String),
}

impl AttackStatus {
    /// Recognized statuses in display order
    pub const KNOWN: [AttackStatus; 3] = [AttackStatus::Blocked, AttackStatus::Success, AttackStatus::Pending];

    /// Wire name of the status
    pub fn as_str(&self) -> &str {
        match self {
            AttackStatus::Blocked => "BLOCKED",
            AttackStatus::Success => "SUCCESS",
            AttackStatus::Pending => "PENDING",
            AttackStatus::Unrecognized(raw) => raw,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, AttackStatus::Unrecognized(_))
    }

    /// Value used when the field is absent from the input
    pub fn missing() -> Self {
        AttackStatus::Unrecognized(String::new())
    }
}

impl From<&str> for AttackStatus {
    fn from(s: &str) -> Self {
        match s {
            "BLOCKED" => AttackStatus::Blocked,
            "SUCCESS" => AttackStatus::Success,
            "PENDING" => AttackStatus::Pending,
            other => AttackStatus::Unrecognized(other.to_string()),
        }
    }
}

impl From<String> for AttackStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "BLOCKED" | "SUCCESS" | "PENDING" => AttackStatus::from(s.as_str()),
            _ => AttackStatus::Unrecognized(s),
        }
    }
}

impl From<AttackStatus> for String {
    fn from(status: AttackStatus) -> Self {
        match status {
            AttackStatus::Unrecognized(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for AttackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single intrusion-detection record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackLog {
    pub id: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    #[serde(default)]
    pub source_ip: String,
    #[serde(default)]
    pub target_port: u16,
    #[serde(default)]
    pub payload: String,
    #[serde(default = "ThreatLevel::missing")]
    pub level: ThreatLevel,
    #[serde(default = "AttackStatus::missing")]
    pub status: AttackStatus,
}

impl AttackLog {
    /// Create a log with a fresh UUID and empty network fields
    pub fn new(timestamp: i64, level: ThreatLevel, status: AttackStatus) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp,
            source_ip: String::new(),
            target_port: 0,
            payload: String::new(),
            level,
            status,
        }
    }

    pub fn with_source(mut self, source_ip: impl Into<String>, target_port: u16) -> Self {
        self.source_ip = source_ip.into();
        self.target_port = target_port;
        self
    }

    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = payload.into();
        self
    }

    /// Check the fields the store relies on
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.id.trim().is_empty() {
            return Err(CoreError::InvalidEvent("id must not be empty".to_string()));
        }
        if self.timestamp < 0 {
            return Err(CoreError::InvalidEvent(format!(
                "timestamp must not be negative: {}",
                self.timestamp
            )));
        }
        Ok(())
    }
}

/// Parse a JSON array of attack logs
pub fn parse_logs(json: &str) -> Result<Vec<AttackLog>, CoreError> {
    let logs = serde_json::from_str(json)?;
    Ok(logs)
}
