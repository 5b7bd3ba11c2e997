//! Smoke test for the server wiring

use std::net::TcpListener;
use std::sync::Arc;

use postgate::auth::SigningSecret;
use postgate::configuration::AuthSettings;
use postgate::startup::run;
use postgate::store::{InMemoryRefreshTokenStore, InMemoryUserStore};

fn spawn_app() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    let settings = AuthSettings {
        signing_secret: SigningSecret::new("health-check-secret"),
        access_token_ttl_seconds: 3600,
        refresh_token_horizon_days: 60,
    };
    let server = run(
        listener,
        Arc::new(InMemoryRefreshTokenStore::new()),
        Arc::new(InMemoryUserStore::new()),
        settings,
    )
    .expect("Failed to create server");
    let _ = tokio::spawn(server);

    format!("http://127.0.0.1:{}", port)
}

#[tokio::test]
async fn health_check_works() {
    let addr = spawn_app();

    let response = reqwest::Client::new()
        .get(&format!("{}/api/healthz", addr))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
    assert_eq!(response.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn run_rejects_empty_signing_secret() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let settings = AuthSettings {
        signing_secret: SigningSecret::new(""),
        access_token_ttl_seconds: 3600,
        refresh_token_horizon_days: 60,
    };

    let result = run(
        listener,
        Arc::new(InMemoryRefreshTokenStore::new()),
        Arc::new(InMemoryUserStore::new()),
        settings,
    );

    assert!(result.is_err());
}
