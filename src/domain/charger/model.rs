//! Charger domain entities

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder for a missing `portId` or `status` field.
pub const UNKNOWN: &str = "unknown";

/// Status recorded when no real port data could be extracted.
pub const ERROR_STATUS: &str = "error";

/// Name of one monitored charging station.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChargerId(String);

impl ChargerId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChargerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChargerId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ChargerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for ChargerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One port's status as seen in a single poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortReading {
    pub port_id: String,
    pub status: String,
}

impl PortReading {
    pub fn new(port_id: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            port_id: port_id.into(),
            status: status.into(),
        }
    }

    /// The `("unknown", "error")` reading that stands in for a failed fetch.
    pub fn sentinel() -> Self {
        Self::new(UNKNOWN, ERROR_STATUS)
    }

    pub fn is_sentinel(&self) -> bool {
        self.port_id == UNKNOWN && self.status == ERROR_STATUS
    }
}

/// A stored status transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRecord {
    /// Store-assigned, strictly increasing
    pub id: i64,
    pub charger: ChargerId,
    pub observed_at: DateTime<Utc>,
    pub port_id: String,
    pub status: String,
}

/// Render a cycle timestamp the way it is persisted.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}
