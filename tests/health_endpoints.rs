//! End-to-end tests against a real listener.
//!
//! Each test binds the router to an ephemeral port and talks to it over HTTP.
//! The database is a real MySQL pool pointed at a closed port, which is how an
//! unreachable database looks in practice.
//!
//! Run with: cargo test --test health_endpoints

use std::net::SocketAddr;
use std::sync::Arc;

use serde_json::{json, Value};

use vitals::client::{HealthStatus, StatusClient};
use vitals::config::{AppConfig, DatabaseConfig};
use vitals::db::create_pool;
use vitals::{create_router, AppState};

/// Start the service with a pool that can never connect.
async fn spawn_server() -> SocketAddr {
    let config = AppConfig {
        database: DatabaseConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            check_timeout_seconds: 2,
            ..DatabaseConfig::default()
        },
        ..AppConfig::default()
    };
    let pool = create_pool(&config.database);
    let app = create_router(AppState::new(config, Arc::new(pool)));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn liveness_answers_while_database_is_down() {
    let addr = spawn_server().await;
    let response = reqwest::get(format!("http://{}/health", addr)).await.unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(response.headers()["cache-control"], "no-store");
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert!(body["uptime"].as_f64().unwrap() >= 0.0);
    assert!(chrono::DateTime::parse_from_rfc3339(body["timestamp"].as_str().unwrap()).is_ok());
}

#[tokio::test]
async fn readiness_reports_unreachable_database() {
    let addr = spawn_server().await;

    for _ in 0..2 {
        let response = reqwest::get(format!("http://{}/health/db", addr))
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);

        // Exactly these two fields; no connection details
        let body: Value = response.json().await.unwrap();
        assert_eq!(body, json!({"status": "error", "error": "Database unreachable"}));
    }
}

#[tokio::test]
async fn status_client_sees_ok() {
    let addr = spawn_server().await;
    let client = StatusClient::new(format!("http://{}", addr)).unwrap();

    let report = client.fetch_liveness().await.unwrap();
    assert!(report.uptime >= 0.0);
    assert_eq!(client.check().await, HealthStatus::Ok);
    assert_eq!(
        client
            .poll(std::time::Duration::from_millis(10), 3)
            .await,
        HealthStatus::Ok
    );
}

#[tokio::test]
async fn status_client_uptime_is_non_decreasing() {
    let addr = spawn_server().await;
    let client = StatusClient::new(format!("http://{}", addr)).unwrap();

    let first = client.fetch_liveness().await.unwrap();
    let second = client.fetch_liveness().await.unwrap();
    assert!(second.uptime >= first.uptime);
}

#[tokio::test]
async fn cors_preflight_is_allowed() {
    let addr = spawn_server().await;
    let response = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, format!("http://{}/health", addr))
        .header("origin", "http://localhost:5173")
        .header("access-control-request-method", "GET")
        .send()
        .await
        .unwrap();

    assert!(response.status().is_success());
    assert!(response
        .headers()
        .contains_key("access-control-allow-origin"));
}
