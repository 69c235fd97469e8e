//! Application settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `NOTES_*` environment variables or a config
//! file, in OrthoConfig's usual precedence. The settings are read once at
//! startup and passed explicitly to the pool and server builders.

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const FALLBACK_DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Errors raised when settings cannot be turned into runtime values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("no database URL configured; set NOTES_DATABASE_URL or DATABASE_URL")]
    MissingDatabaseUrl,
    #[error("invalid bind address {value:?}: {message}")]
    InvalidBindAddr { value: String, message: String },
}

/// Allowed cross-origin callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    /// `*`: any origin.
    Any,
    List(Vec<String>),
}

/// Accept origins either as a sequence (environment lists, config file
/// arrays) or as a single string such as `*`.
fn deserialize_origins<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Origins {
        One(String),
        Many(Vec<String>),
    }

    Ok(
        Option::<Origins>::deserialize(deserializer)?.map(|origins| match origins {
            Origins::One(origin) => vec![origin],
            Origins::Many(list) => list,
        }),
    )
}

/// Runtime configuration for the notes service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "NOTES")]
pub struct AppSettings {
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Allowed CORS origins as a list or a comma-separated string; `*`
    /// allows any origin.
    #[serde(default, deserialize_with = "deserialize_origins")]
    pub cors_origins: Option<Vec<String>>,
    /// Verbose logging and Swagger UI in release builds.
    #[ortho_config(default = false)]
    pub debug: bool,
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// Maximum number of pooled database connections.
    pub pool_max_size: Option<u32>,
}

impl AppSettings {
    /// Resolve the database URL, falling back to `DATABASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::MissingDatabaseUrl`] when neither source is set.
    pub fn database_url(&self) -> Result<String, SettingsError> {
        self.database_url
            .clone()
            .or_else(|| std::env::var(FALLBACK_DATABASE_URL_VAR).ok())
            .filter(|url| !url.trim().is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)
    }

    /// Parse the configured allowed origins, falling back to the local
    /// frontend dev server.
    pub fn cors_origins(&self) -> CorsOrigins {
        let origins: Vec<String> = self
            .cors_origins
            .iter()
            .flatten()
            .flat_map(|entry| entry.split(','))
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_owned)
            .collect();
        if origins.iter().any(|origin| origin == "*") {
            CorsOrigins::Any
        } else if origins.is_empty() {
            CorsOrigins::List(vec![DEFAULT_CORS_ORIGIN.to_owned()])
        } else {
            CorsOrigins::List(origins)
        }
    }

    /// Parse the bind address, falling back to `0.0.0.0:8000`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidBindAddr`] when the value does not
    /// parse as a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse()
            .map_err(|err: std::net::AddrParseError| SettingsError::InvalidBindAddr {
                value: raw.to_owned(),
                message: err.to_string(),
            })
    }

    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }

    /// Default log filter used when `RUST_LOG` is unset.
    pub fn default_log_filter(&self) -> &'static str {
        if self.debug { "debug" } else { "info" }
    }
}
