//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section, and every field carries a serde default so a partial file
//! (or no file at all) still yields a runnable configuration.

pub mod app;
pub mod auth;
pub mod database;
pub mod logging;
pub mod session;
pub mod storage;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::AuthConfig;
pub use self::database::{DatabaseConfig, DatabaseProvider};
pub use self::logging::LoggingConfig;
pub use self::session::{SessionConfig, SessionStoreKind};
pub use self::storage::StorageConfig;

use crate::error::AppError;

/// Environment variable naming an extra configuration file.
pub const CONFIG_PATH_ENV: &str = "ANIMESTREAM_CONFIG";

/// Prefix for per-key environment overrides (`ANIMESTREAM__SERVER__PORT`).
pub const ENV_PREFIX: &str = "ANIMESTREAM";

/// Root application configuration.
///
/// Built once at process start and handed to each component; nothing reads
/// configuration from globals afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Credential and delivery token settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Login session settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Upload directory settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files and the environment.
    ///
    /// Sources, later ones winning:
    /// 1. `config/default.toml` (optional)
    /// 2. the file at `path`, if given (required when given)
    /// 3. `ANIMESTREAM__SECTION__KEY` environment variables
    /// 4. the plain `PORT` variable, which overrides `server.port`
    pub fn load(path: Option<&str>) -> Result<Self, AppError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false));

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let mut app: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        if let Ok(port) = std::env::var("PORT") {
            app.server.port = parse_port(&port)?;
        }

        app.validate()?;
        Ok(app)
    }

    /// Reject combinations that cannot work at runtime.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.database.provider == DatabaseProvider::Postgres && self.database.url.is_empty() {
            return Err(AppError::configuration(
                "database.url is required when database.provider = \"postgres\"",
            ));
        }
        if self.session.store == SessionStoreKind::Database
            && self.database.provider != DatabaseProvider::Postgres
        {
            return Err(AppError::configuration(
                "session.store = \"database\" requires database.provider = \"postgres\"",
            ));
        }
        if self.auth.token_secret.len() < 16 {
            return Err(AppError::configuration(
                "auth.token_secret must be at least 16 bytes",
            ));
        }
        Ok(())
    }
}

fn parse_port(raw: &str) -> Result<u16, AppError> {
    raw.trim()
        .parse::<u16>()
        .map_err(|_| AppError::configuration(format!("PORT is not a valid port number: {raw}")))
}
