//! Database access for the readiness check.
//!
//! The pool is built once at startup and handed to request handlers through
//! [`AppState`](crate::state::AppState) as a [`DatabaseProbe`] trait object, so
//! handlers never reach for a process-wide global and tests can swap in fakes.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};

use crate::config::{DatabaseConfig, DB_PING_QUERY};

/// Failure of a single readiness round trip.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("database query failed: {0}")]
    Query(#[from] sqlx::Error),

    #[error("database check exceeded deadline of {0:?}")]
    Timeout(Duration),
}

/// A dependency that can be asked for a trivial round trip.
#[async_trait]
pub trait DatabaseProbe: Send + Sync {
    /// Issue a no-op query. Returns once the database has answered.
    async fn ping(&self) -> Result<(), ProbeError>;
}

#[async_trait]
impl DatabaseProbe for MySqlPool {
    async fn ping(&self) -> Result<(), ProbeError> {
        sqlx::query(DB_PING_QUERY).execute(self).await?;
        Ok(())
    }
}

/// Run `probe.ping()` under a deadline. Expiry is reported as [`ProbeError::Timeout`].
pub async fn ping_with_deadline(
    probe: &dyn DatabaseProbe,
    deadline: Duration,
) -> Result<(), ProbeError> {
    match tokio::time::timeout(deadline, probe.ping()).await {
        Ok(result) => result,
        Err(_) => Err(ProbeError::Timeout(deadline)),
    }
}

/// Create the bounded MySQL pool.
///
/// Connections are opened lazily, on first use, so the process starts and
/// answers liveness probes even while the database is down.
pub fn create_pool(config: &DatabaseConfig) -> MySqlPool {
    let options = MySqlConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
        .database(&config.name);

    MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.check_timeout())
        .connect_lazy_with(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Healthy;

    #[async_trait]
    impl DatabaseProbe for Healthy {
        async fn ping(&self) -> Result<(), ProbeError> {
            Ok(())
        }
    }

    struct Hanging;

    #[async_trait]
    impl DatabaseProbe for Hanging {
        async fn ping(&self) -> Result<(), ProbeError> {
            std::future::pending::<()>().await;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_deadline_passes_through_success() {
        let result = ping_with_deadline(&Healthy, Duration::from_secs(1)).await;
        assert!(result.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_turns_hang_into_timeout() {
        let deadline = Duration::from_millis(250);
        let result = ping_with_deadline(&Hanging, deadline).await;
        assert!(matches!(result, Err(ProbeError::Timeout(d)) if d == deadline));
    }

    #[tokio::test]
    async fn test_unreachable_database_fails() {
        // Nothing listens on port 1; the lazy pool fails on first acquire.
        let config = DatabaseConfig {
            port: 1,
            check_timeout_seconds: 2,
            ..DatabaseConfig::default()
        };
        let pool = create_pool(&config);

        let result = ping_with_deadline(&pool, Duration::from_secs(5)).await;
        assert!(result.is_err());
    }
}
