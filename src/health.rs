//! Health report payloads shared by the HTTP handlers and the status client.
//!
//! Reports are built fresh for every request; nothing here is cached.

use std::time::Instant;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{DB_CONNECTED, DB_UNREACHABLE};

/// Status value carried in every health payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Error,
    /// Anything else a peer might send.
    #[serde(other)]
    Unknown,
}

/// Process start marker, measured on the monotonic clock.
#[derive(Debug, Clone, Copy)]
pub struct Uptime {
    started: Instant,
}

impl Uptime {
    /// Begin counting from now. Call once at process startup.
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn seconds(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivenessReport {
    pub status: Status,
    /// RFC 3339 with millisecond precision, UTC.
    pub timestamp: String,
    /// Seconds since process start.
    pub uptime: f64,
}

impl LivenessReport {
    pub fn now(uptime: &Uptime) -> Self {
        Self {
            status: Status::Ok,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            uptime: uptime.seconds(),
        }
    }
}

/// Body of `GET /health/db`.
///
/// Either the database answered or it did not; there is no degraded state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ReadinessReport {
    Ok { db: &'static str },
    Error { error: &'static str },
}

impl ReadinessReport {
    pub fn connected() -> Self {
        ReadinessReport::Ok { db: DB_CONNECTED }
    }

    pub fn unreachable() -> Self {
        ReadinessReport::Error {
            error: DB_UNREACHABLE,
        }
    }

    pub fn status(&self) -> Status {
        match self {
            ReadinessReport::Ok { .. } => Status::Ok,
            ReadinessReport::Error { .. } => Status::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use serde_json::json;

    #[test]
    fn test_liveness_timestamp_is_rfc3339() {
        let report = LivenessReport::now(&Uptime::start());
        assert!(DateTime::parse_from_rfc3339(&report.timestamp).is_ok());
        assert!(report.timestamp.ends_with('Z'));
    }

    #[test]
    fn test_uptime_is_monotonic() {
        let uptime = Uptime::start();
        let first = LivenessReport::now(&uptime).uptime;
        std::thread::sleep(std::time::Duration::from_millis(5));
        let second = LivenessReport::now(&uptime).uptime;
        assert!(first >= 0.0);
        assert!(second >= first);
    }

    #[test]
    fn test_readiness_wire_shape() {
        assert_eq!(
            serde_json::to_value(ReadinessReport::connected()).unwrap(),
            json!({"status": "ok", "db": "connected"})
        );
        assert_eq!(
            serde_json::to_value(ReadinessReport::unreachable()).unwrap(),
            json!({"status": "error", "error": "Database unreachable"})
        );
    }

    #[test]
    fn test_readiness_status() {
        assert_eq!(ReadinessReport::connected().status(), Status::Ok);
        assert_eq!(ReadinessReport::unreachable().status(), Status::Error);
    }

    #[test]
    fn test_unrecognized_status_decodes_as_unknown() {
        let report: LivenessReport = serde_json::from_value(json!({
            "status": "degraded",
            "timestamp": "2026-10-18T09:00:00.000Z",
            "uptime": 1.5
        }))
        .unwrap();
        assert_eq!(report.status, Status::Unknown);
    }
}
