//! Shared application state for request handlers.

use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::db::DatabaseProbe;
use crate::health::Uptime;

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
///
/// Holds the configuration, the process start marker used for uptime, and the
/// database probe used by the readiness check.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub uptime: Uptime,
    pub db: Arc<dyn DatabaseProbe>,
}

impl AppState {
    /// Creates a new application state. Uptime starts counting here.
    pub fn new(config: AppConfig, db: Arc<dyn DatabaseProbe>) -> Self {
        Self {
            config: Arc::new(config),
            uptime: Uptime::start(),
            db,
        }
    }

    /// Deadline applied to each readiness round trip.
    pub fn db_check_timeout(&self) -> Duration {
        self.config.database.check_timeout()
    }
}
