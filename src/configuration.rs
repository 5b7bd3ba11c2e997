use chrono::{Duration, Utc};
use config::ConfigError;

use crate::auth::SigningSecret;
use crate::error::AppError;

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub application: ApplicationSettings,
    pub auth: AuthSettings,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
}

impl ApplicationSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(serde::Deserialize, Clone)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: String,
    pub port: u16,
    pub host: String,
    pub database_name: String,
}

impl DatabaseSettings {
    pub fn connection_string(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database_name
        )
    }
}

/// Token settings
#[derive(serde::Deserialize, Clone, Debug)]
pub struct AuthSettings {
    pub signing_secret: SigningSecret,
    #[serde(default = "default_access_token_ttl")]
    pub access_token_ttl_seconds: i64,
    #[serde(default = "default_refresh_token_horizon")]
    pub refresh_token_horizon_days: i64,
}

fn default_access_token_ttl() -> i64 {
    3600
}

fn default_refresh_token_horizon() -> i64 {
    crate::auth::DEFAULT_HORIZON_DAYS
}

impl AuthSettings {
    /// # Errors
    /// `Config` if the value does not fit a duration or pushes expiry past the time range
    pub fn access_token_ttl(&self) -> Result<Duration, AppError> {
        Duration::try_seconds(self.access_token_ttl_seconds)
            .filter(|ttl| Utc::now().checked_add_signed(*ttl).is_some())
            .ok_or_else(|| AppError::Config("auth.access_token_ttl_seconds is out of range".to_string()))
    }

    /// # Errors
    /// `Config` if the value does not fit a duration or pushes expiry past the time range
    pub fn refresh_token_horizon(&self) -> Result<Duration, AppError> {
        Duration::try_days(self.refresh_token_horizon_days)
            .filter(|horizon| Utc::now().checked_add_signed(*horizon).is_some())
            .ok_or_else(|| AppError::Config("auth.refresh_token_horizon_days is out of range".to_string()))
    }

    /// Reject settings the token code cannot work with
    pub fn validate(&self) -> Result<(), AppError> {
        if self.signing_secret.is_empty() {
            return Err(AppError::Config("auth.signing_secret must not be empty".to_string()));
        }
        self.access_token_ttl()?;
        self.refresh_token_horizon()?;
        Ok(())
    }
}

/// Load `configuration.yaml` (optional), then `APP_*` environment overrides
///
/// e.g. `APP_AUTH__SIGNING_SECRET=...` or `APP_APPLICATION__PORT=9000`.
pub fn get_configuration() -> Result<Settings, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("configuration").required(false))
        .add_source(config::Environment::with_prefix("APP").separator("__"))
        .build()?;
    settings.try_deserialize::<Settings>()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth_settings(json: &str) -> AuthSettings {
        serde_json::from_str(json).expect("Failed to parse settings")
    }

    #[test]
    fn test_auth_settings_defaults() {
        let settings = auth_settings(r#"{"signing_secret": "abc"}"#);

        assert_eq!(settings.access_token_ttl().unwrap(), Duration::hours(1));
        assert_eq!(settings.refresh_token_horizon().unwrap(), Duration::days(60));
        assert_eq!(settings.signing_secret.expose(), b"abc");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_settings_debug_hides_secret() {
        let settings = auth_settings(r#"{"signing_secret": "do-not-print"}"#);

        assert!(!format!("{:?}", settings).contains("do-not-print"));
    }

    #[test]
    fn test_out_of_range_durations_are_config_errors() {
        let huge_ttl = auth_settings(&format!(
            r#"{{"signing_secret": "abc", "access_token_ttl_seconds": {}}}"#,
            i64::MAX
        ));
        assert!(matches!(huge_ttl.access_token_ttl(), Err(AppError::Config(_))));
        assert!(matches!(huge_ttl.validate(), Err(AppError::Config(_))));

        let huge_horizon = auth_settings(&format!(
            r#"{{"signing_secret": "abc", "refresh_token_horizon_days": {}}}"#,
            i64::MAX
        ));
        assert!(matches!(huge_horizon.refresh_token_horizon(), Err(AppError::Config(_))));

        let far_horizon = auth_settings(r#"{"signing_secret": "abc", "refresh_token_horizon_days": 146000000}"#);
        assert!(matches!(far_horizon.refresh_token_horizon(), Err(AppError::Config(_))));
    }

    #[test]
    fn test_empty_secret_is_config_error() {
        let settings = auth_settings(r#"{"signing_secret": ""}"#);
        assert!(matches!(settings.validate(), Err(AppError::Config(_))));
    }
}
