//! Configuration management for the Insight Manager server
//!
//! Sources, lowest priority first: `conf/application.yml` (or the file given
//! with `--config`), environment variables prefixed with `INSIGHT_` (nested
//! keys separated by `__`, e.g. `INSIGHT_DB__URL`), then command line flags.

use std::path::PathBuf;
use std::time::Duration;

use base64::{Engine, engine::general_purpose::STANDARD};
use clap::Parser;
use config::{Config, Environment};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use insight_auth::model::{
    DEFAULT_TOKEN_EXPIRE_SECONDS, DEFAULT_TOKEN_SECRET_KEY, TOKEN_EXPIRE_SECONDS, TOKEN_SECRET_KEY,
};
use insight_core::ImportPolicy;

use super::constants::*;
use crate::startup::{LogRotation, LoggingConfig};

/// Command line arguments for the server
#[derive(Debug, Parser)]
#[command(name = "insight-server", version, about)]
struct Cli {
    #[arg(short = 'c', long = "config", default_value = "conf/application.yml")]
    config_file: String,
    #[arg(long = "db-url", env = "DATABASE_URL")]
    database_url: Option<String>,
    #[arg(short = 'p', long = "port")]
    port: Option<u16>,
    /// Run pending database migrations before serving
    #[arg(long = "migrate")]
    migrate: bool,
}

/// Application configuration loaded from config files and environment
#[derive(Clone, Debug, Default)]
pub struct Configuration {
    pub config: Config,
}

impl Configuration {
    pub fn new() -> anyhow::Result<Self> {
        let args = Cli::parse();

        let mut config_builder = Config::builder()
            .add_source(config::File::with_name(&args.config_file).required(false))
            .add_source(
                Environment::with_prefix("INSIGHT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        if let Some(v) = args.database_url {
            config_builder = config_builder.set_override(DB_URL_PROPERTY, v)?;
        }
        if let Some(v) = args.port {
            config_builder = config_builder.set_override(SERVER_PORT_PROPERTY, v)?;
        }
        if args.migrate {
            config_builder = config_builder.set_override(DB_MIGRATE_PROPERTY, true)?;
        }

        let app_config = config_builder.build()?;

        Ok(Configuration { config: app_config })
    }

    pub fn from_config(config: Config) -> Self {
        Configuration { config }
    }

    /// Reject settings the server cannot start with
    pub fn validate(&self) -> anyhow::Result<()> {
        let secret = self.token_secret_key();
        if secret.trim().is_empty() || STANDARD.decode(secret.trim()).is_err() {
            anyhow::bail!("{} must be set to a base64 encoded secret", TOKEN_SECRET_KEY);
        }
        if self.token_expire_seconds() <= 0 {
            anyhow::bail!("{} must be positive", TOKEN_EXPIRE_SECONDS);
        }
        if let Ok(rotation) = self.config.get_string(LOGGING_ROTATION) {
            rotation
                .parse::<LogRotation>()
                .map_err(|e| anyhow::anyhow!("{}: {}", LOGGING_ROTATION, e))?;
        }
        Ok(())
    }

    // ========================================================================
    // Server Configuration
    // ========================================================================

    pub fn server_address(&self) -> String {
        self.config
            .get_string(SERVER_ADDRESS_PROPERTY)
            .unwrap_or(DEFAULT_SERVER_ADDRESS.to_string())
    }

    pub fn server_port(&self) -> u16 {
        self.config
            .get_int(SERVER_PORT_PROPERTY)
            .ok()
            .and_then(|v| u16::try_from(v).ok())
            .unwrap_or(DEFAULT_SERVER_PORT)
    }

    pub fn server_context_path(&self) -> String {
        self.config
            .get_string(SERVER_CONTEXT_PATH_PROPERTY)
            .unwrap_or_default()
    }

    pub fn shutdown_timeout(&self) -> Duration {
        let seconds = self
            .config
            .get_int(SERVER_SHUTDOWN_TIMEOUT_PROPERTY)
            .unwrap_or(DEFAULT_SHUTDOWN_TIMEOUT_SECONDS as i64);
        Duration::from_secs(seconds.max(0) as u64)
    }

    // ========================================================================
    // Authentication Configuration
    // ========================================================================

    pub fn token_secret_key(&self) -> String {
        self.config
            .get_string(TOKEN_SECRET_KEY)
            .unwrap_or(DEFAULT_TOKEN_SECRET_KEY.to_string())
    }

    pub fn token_expire_seconds(&self) -> i64 {
        self.config
            .get_int(TOKEN_EXPIRE_SECONDS)
            .unwrap_or(DEFAULT_TOKEN_EXPIRE_SECONDS)
    }

    // ========================================================================
    // Import / Upload Configuration
    // ========================================================================

    pub fn import_max_file_size(&self) -> usize {
        self.config
            .get_int(IMPORT_MAX_FILE_SIZE)
            .ok()
            .and_then(|v| usize::try_from(v).ok())
            .unwrap_or(DEFAULT_IMPORT_MAX_FILE_SIZE)
    }

    /// Policy used when an import request does not name one
    pub fn import_default_policy(&self) -> ImportPolicy {
        match self.config.get_string(IMPORT_DEFAULT_POLICY) {
            Ok(v) => v.parse().unwrap_or_else(|e| {
                tracing::warn!(value = %v, error = %e, "Ignoring invalid default import policy");
                ImportPolicy::default()
            }),
            Err(_) => ImportPolicy::default(),
        }
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.config
            .get_string(UPLOAD_DIR)
            .map(PathBuf::from)
            .unwrap_or(PathBuf::from(DEFAULT_UPLOAD_DIR))
    }

    pub fn upload_url_prefix(&self) -> String {
        let prefix = self
            .config
            .get_string(UPLOAD_URL_PREFIX)
            .unwrap_or(DEFAULT_UPLOAD_URL_PREFIX.to_string());
        prefix.trim_end_matches('/').to_string()
    }

    pub fn upload_max_file_size(&self) -> usize {
        self.config
            .get_int(UPLOAD_MAX_FILE_SIZE)
            .ok()
            .and_then(|v| usize::try_from(v).ok())
            .unwrap_or(DEFAULT_UPLOAD_MAX_FILE_SIZE)
    }

    // ========================================================================
    // Logging Configuration
    // ========================================================================

    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig::from_config(
            self.config.get_string(LOGGING_DIR).ok(),
            self.config.get_bool(LOGGING_CONSOLE).unwrap_or(true),
            self.config.get_bool(LOGGING_FILE).unwrap_or(false),
            self.config
                .get_string(LOGGING_LEVEL)
                .unwrap_or("info".to_string()),
            self.logging_rotation(),
        )
    }

    pub fn logging_rotation(&self) -> LogRotation {
        self.config
            .get_string(LOGGING_ROTATION)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(LogRotation::Daily)
    }

    // ========================================================================
    // Database Configuration
    // ========================================================================

    pub fn database_url(&self) -> String {
        self.config
            .get_string(DB_URL_PROPERTY)
            .unwrap_or(DEFAULT_DB_URL.to_string())
    }

    pub fn run_migrations(&self) -> bool {
        self.config.get_bool(DB_MIGRATE_PROPERTY).unwrap_or(false)
    }

    pub async fn database_connection(&self) -> anyhow::Result<DatabaseConnection> {
        let max_connections = self.config.get_int(DB_MAX_CONNECTIONS).unwrap_or(10) as u32;
        let min_connections = self.config.get_int(DB_MIN_CONNECTIONS).unwrap_or(1) as u32;
        let connect_timeout = self.config.get_int(DB_CONNECT_TIMEOUT).unwrap_or(30) as u64;
        let acquire_timeout = self.config.get_int(DB_ACQUIRE_TIMEOUT).unwrap_or(8) as u64;
        let idle_timeout = self.config.get_int(DB_IDLE_TIMEOUT).unwrap_or(600) as u64;
        let max_lifetime = self.config.get_int(DB_MAX_LIFETIME).unwrap_or(1800) as u64;
        let sqlx_logging = self.config.get_bool(DB_SQLX_LOGGING).unwrap_or(false);

        let mut opt = ConnectOptions::new(self.database_url());

        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(connect_timeout))
            .acquire_timeout(Duration::from_secs(acquire_timeout))
            .idle_timeout(Duration::from_secs(idle_timeout))
            .max_lifetime(Duration::from_secs(max_lifetime))
            .sqlx_logging(sqlx_logging);

        tracing::info!(
            max_connections = max_connections,
            min_connections = min_connections,
            connect_timeout = connect_timeout,
            idle_timeout = idle_timeout,
            max_lifetime = max_lifetime,
            sqlx_logging = sqlx_logging,
            "Database connection pool configured"
        );

        let database_connection: DatabaseConnection = Database::connect(opt).await?;

        Ok(database_connection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configuration(overrides: &[(&str, &str)]) -> Configuration {
        let mut builder = Config::builder();
        for (key, value) in overrides {
            builder = builder.set_override(*key, *value).unwrap();
        }
        Configuration::from_config(builder.build().unwrap())
    }

    #[test]
    fn test_defaults() {
        let config = configuration(&[]);
        assert_eq!(config.server_address(), "0.0.0.0");
        assert_eq!(config.server_port(), DEFAULT_SERVER_PORT);
        assert_eq!(config.server_context_path(), "");
        assert_eq!(config.token_expire_seconds(), 18000);
        assert_eq!(config.import_max_file_size(), 5 * 1024 * 1024);
        assert_eq!(config.upload_max_file_size(), 5 * 1024 * 1024);
        assert_eq!(config.import_default_policy(), ImportPolicy::Reject);
        assert_eq!(config.upload_url_prefix(), "/uploads");
        assert!(!config.run_migrations());
    }

    #[test]
    fn test_overrides() {
        let config = configuration(&[
            ("server.port", "8080"),
            ("insight.import.default_policy", "overwrite"),
            ("insight.upload.url_prefix", "https://cdn.example.com/img/"),
            ("insight.auth.token.expire.seconds", "60"),
        ]);
        assert_eq!(config.server_port(), 8080);
        assert_eq!(config.import_default_policy(), ImportPolicy::Overwrite);
        assert_eq!(config.upload_url_prefix(), "https://cdn.example.com/img");
        assert_eq!(config.token_expire_seconds(), 60);
    }

    #[test]
    fn test_invalid_default_policy_falls_back() {
        let config = configuration(&[("insight.import.default_policy", "merge")]);
        assert_eq!(config.import_default_policy(), ImportPolicy::Reject);
    }

    #[test]
    fn test_validate_requires_secret() {
        assert!(configuration(&[]).validate().is_err());

        let config = configuration(&[(
            "insight.auth.token.secret.key",
            "SW5zaWdodE1hbmFnZXJEZWZhdWx0VG9rZW5TZWNyZXRLZXkwMTIzNDU2Nzg5",
        )]);
        assert!(config.validate().is_ok());

        let config = configuration(&[
            (
                "insight.auth.token.secret.key",
                "SW5zaWdodE1hbmFnZXJEZWZhdWx0VG9rZW5TZWNyZXRLZXkwMTIzNDU2Nzg5",
            ),
            ("insight.auth.token.expire.seconds", "0"),
        ]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_logging_rotation() {
        let secret = (
            "insight.auth.token.secret.key",
            "SW5zaWdodE1hbmFnZXJEZWZhdWx0VG9rZW5TZWNyZXRLZXkwMTIzNDU2Nzg5",
        );
        assert_eq!(configuration(&[]).logging_rotation(), LogRotation::Daily);

        let config = configuration(&[secret, ("logging.rotation", "hourly")]);
        assert_eq!(config.logging_rotation(), LogRotation::Hourly);
        assert_eq!(config.logging_config().rotation, LogRotation::Hourly);
        assert!(config.validate().is_ok());

        let config = configuration(&[secret, ("logging.rotation", "weekly")]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_base64_secret() {
        let config = configuration(&[("insight.auth.token.secret.key", "not base64!")]);
        assert!(config.validate().is_err());
    }
}
