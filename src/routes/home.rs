//! Root greeting.

use crate::config::GREETING;

/// Plain-text greeting served at `/`.
pub async fn index() -> &'static str {
    GREETING
}
