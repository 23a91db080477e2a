//! Status client for polling a running backend.
//!
//! Fetches `GET /health` from a base URL and reduces the outcome to a
//! [`HealthStatus`]. Used by the `vitals probe` subcommand and by the
//! integration tests.

use std::fmt;
use std::time::Duration;

use reqwest::StatusCode;

use crate::config::{PROBE_REQUEST_TIMEOUT_SECS, PROBE_USER_AGENT};
use crate::health::{LivenessReport, Status};

/// Shortest delay `poll` will wait between checks.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Backend status as seen from the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    /// No answer received yet.
    Loading,
    /// The backend reported `"ok"`.
    Ok,
    /// The backend answered successfully with some other status.
    Unknown,
    /// The request failed or the answer could not be read.
    Error,
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HealthStatus::Loading => "loading",
            HealthStatus::Ok => "ok",
            HealthStatus::Unknown => "unknown",
            HealthStatus::Error => "error",
        };
        f.write_str(s)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("backend answered {0}")]
    Status(StatusCode),

    #[error("invalid response body: {0}")]
    Decode(#[source] reqwest::Error),
}

/// HTTP client bound to one backend base URL.
#[derive(Debug, Clone)]
pub struct StatusClient {
    base_url: String,
    http: reqwest::Client,
}

impl StatusClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(PROBE_REQUEST_TIMEOUT_SECS))
            .user_agent(PROBE_USER_AGENT)
            .build()
            .map_err(ClientError::Transport)?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch and decode the liveness report.
    pub async fn fetch_liveness(&self) -> Result<LivenessReport, ClientError> {
        let url = format!("{}/health", self.base_url);
        tracing::debug!(%url, "Fetching backend status");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(ClientError::Transport)?;

        if !response.status().is_success() {
            return Err(ClientError::Status(response.status()));
        }

        response.json().await.map_err(ClientError::Decode)
    }

    /// Check the backend once.
    pub async fn check(&self) -> HealthStatus {
        match self.fetch_liveness().await {
            Ok(report) => status_of(&report),
            Err(e) => {
                tracing::warn!(error = %e, base_url = %self.base_url, "Backend status check failed");
                HealthStatus::Error
            }
        }
    }

    /// Check the backend `count` times, `interval` apart, logging each change
    /// of status. Returns the last status observed.
    ///
    /// A zero `interval` is raised to [`MIN_POLL_INTERVAL`].
    pub async fn poll(&self, interval: Duration, count: u32) -> HealthStatus {
        let mut current = HealthStatus::Loading;
        let mut ticker = tokio::time::interval(interval.max(MIN_POLL_INTERVAL));

        for _ in 0..count {
            ticker.tick().await;
            let next = self.check().await;
            if next != current {
                tracing::info!(from = %current, to = %next, "Backend status changed");
                current = next;
            }
        }

        current
    }
}

/// Reduce a decoded liveness report to a client-side status.
pub fn status_of(report: &LivenessReport) -> HealthStatus {
    match report.status {
        Status::Ok => HealthStatus::Ok,
        Status::Error | Status::Unknown => HealthStatus::Unknown,
    }
}
