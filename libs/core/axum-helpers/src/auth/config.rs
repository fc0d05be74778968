use core_config::{ConfigError, FromEnv, env_or_default, env_required};

/// JWT configuration loaded from the environment.
#[derive(Clone, Debug)]
pub struct JwtConfig {
    /// HS256 signing secret (required)
    pub secret: String,
    /// Access token time-to-live in seconds
    pub access_token_ttl_secs: i64,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            access_token_ttl_secs: 900,
        }
    }
}

impl FromEnv for JwtConfig {
    /// Environment variables:
    /// - `JWT_SECRET` (required)
    /// - `JWT_ACCESS_TTL_SECS` (optional, default: 900)
    fn from_env() -> Result<Self, ConfigError> {
        let secret = env_required("JWT_SECRET")?;

        let access_token_ttl_secs = env_or_default("JWT_ACCESS_TTL_SECS", "900")
            .parse()
            .map_err(|e| ConfigError::ParseError {
                key: "JWT_ACCESS_TTL_SECS".to_string(),
                details: format!("{}", e),
            })?;

        Ok(Self {
            secret,
            access_token_ttl_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_config_from_env() {
        temp_env::with_vars(
            [
                ("JWT_SECRET", Some("test-secret")),
                ("JWT_ACCESS_TTL_SECS", Some("600")),
            ],
            || {
                let config = JwtConfig::from_env().unwrap();
                assert_eq!(config.secret, "test-secret");
                assert_eq!(config.access_token_ttl_secs, 600);
            },
        );
    }

    #[test]
    fn test_jwt_config_missing_secret() {
        temp_env::with_var_unset("JWT_SECRET", || {
            let result = JwtConfig::from_env();
            assert!(result.is_err());
        });
    }

    #[test]
    fn test_jwt_config_default_ttl() {
        temp_env::with_vars(
            [
                ("JWT_SECRET", Some("test-secret")),
                ("JWT_ACCESS_TTL_SECS", None),
            ],
            || {
                let config = JwtConfig::from_env().unwrap();
                assert_eq!(config.access_token_ttl_secs, 900);
            },
        );
    }
}
