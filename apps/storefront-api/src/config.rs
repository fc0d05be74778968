use core_config::{AppInfo, ConfigError, FromEnv, app_info, env_or_default, server::ServerConfig};
use std::str::FromStr;

use axum_helpers::JwtConfig;
use database::postgres::PostgresConfig;
use domain_catalog::CascadeDepth;

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub database: PostgresConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    /// How far catalog deactivation cascades (CASCADE_DEPTH env var)
    pub cascade_depth: CascadeDepth,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let database = PostgresConfig::from_env()?; // Required - will fail if not set
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080
        let jwt = JwtConfig::from_env()?; // Required - will fail if not set

        let depth_str = env_or_default("CASCADE_DEPTH", "full_depth");
        let cascade_depth =
            CascadeDepth::from_str(&depth_str).map_err(|_| ConfigError::ParseError {
                key: "CASCADE_DEPTH".to_string(),
                details: format!(
                    "'{}' is not one of category_only, subcategories, full_depth",
                    depth_str
                ),
            })?;

        Ok(Self {
            app: app_info!(),
            database,
            server,
            jwt,
            cascade_depth,
            environment,
        })
    }
}
