//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use household_notes::outbound::persistence::DbPool;
use household_notes::settings::{AppSettings, CorsOrigins, SettingsError};

/// Everything the server builder needs, resolved from [`AppSettings`].
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) cors_origins: CorsOrigins,
    pub(crate) swagger_enabled: bool,
    pub(crate) db_pool: DbPool,
}

impl ServerConfig {
    /// Build a configuration from loaded settings and a ready pool.
    ///
    /// Swagger UI is mounted in debug builds, or in release builds when the
    /// `debug` setting is on.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when the bind address does not parse.
    pub fn from_settings(settings: &AppSettings, db_pool: DbPool) -> Result<Self, SettingsError> {
        Ok(Self {
            bind_addr: settings.bind_addr()?,
            cors_origins: settings.cors_origins(),
            swagger_enabled: settings.debug || cfg!(debug_assertions),
            db_pool,
        })
    }
}
