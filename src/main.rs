use sqlx::postgres::PgPoolOptions;
use std::net::TcpListener;
use std::sync::Arc;

use postgate::configuration::get_configuration;
use postgate::startup::run;
use postgate::store::{PgRefreshTokenStore, PgUserStore};
use postgate::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_telemetry("info");

    let configuration = get_configuration().map_err(|e| {
        tracing::error!("Failed to read configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "Configuration error")
    })?;

    configuration.auth.validate().map_err(|e| {
        tracing::error!(error = %e, "Invalid auth settings");
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "Configuration error")
    })?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&configuration.database.connection_string())
        .await
        .map_err(|e| {
            tracing::error!("Failed to create connection pool: {}", e);
            std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "Database connection error")
        })?;

    sqlx::migrate!("./migrations").run(&pool).await.map_err(|e| {
        tracing::error!("Failed to run migrations: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, "Migration error")
    })?;

    let address = configuration.application.address();
    let listener = TcpListener::bind(&address)?;
    tracing::info!("Server listening on: {}", address);

    let refresh_store = Arc::new(PgRefreshTokenStore::new(pool.clone()));
    let users = Arc::new(PgUserStore::new(pool));
    run(listener, refresh_store, users, configuration.auth)?.await
}
