use super::config::JwtConfig;
use axum::{extract::FromRequestParts, http::request::Parts, response::Response};
use axum::response::IntoResponse;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,    // Subject (customer ID)
    pub email: String,  // Customer email
    pub staff: bool,    // Staff flag
    pub exp: i64,       // Expiration time
    pub iat: i64,       // Issued at
    pub jti: String,    // JWT ID
}

/// Stateless JWT authentication (HS256).
#[derive(Clone)]
pub struct JwtAuth {
    secret: String,
    access_token_ttl_secs: i64,
}

impl JwtAuth {
    /// Create a new JWT auth instance.
    ///
    /// # Example
    /// ```ignore
    /// use axum_helpers::{JwtAuth, JwtConfig};
    /// use core_config::FromEnv;
    ///
    /// let config = JwtConfig::from_env()?;
    /// let jwt_auth = JwtAuth::new(&config);
    /// ```
    pub fn new(config: &JwtConfig) -> Self {
        tracing::info!("JWT auth initialized");
        Self {
            secret: config.secret.clone(),
            access_token_ttl_secs: config.access_token_ttl_secs,
        }
    }

    /// Create an access token for an authenticated user.
    pub fn create_access_token(
        &self,
        user_id: &str,
        email: &str,
        staff: bool,
    ) -> eyre::Result<String> {
        let now = Utc::now();
        let exp = (now + Duration::seconds(self.access_token_ttl_secs)).timestamp();
        let iat = now.timestamp();
        let jti = Uuid::new_v4().to_string();

        let claims = JwtClaims {
            sub: user_id.to_string(),
            email: email.to_string(),
            staff,
            exp,
            iat,
            jti,
        };

        let header = Header {
            alg: jsonwebtoken::Algorithm::HS256,
            ..Default::default()
        };

        let token = encode(
            &header,
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;

        Ok(token)
    }

    /// Verify JWT token signature and decode claims
    pub fn verify_token(&self, token: &str) -> eyre::Result<JwtClaims> {
        let token_data = decode::<JwtClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }
}

/// The authenticated caller, decoded from verified JWT claims.
///
/// Inserted into request extensions by [`super::middleware::jwt_auth_middleware`];
/// extract it in handlers to identify the caller:
///
/// ```ignore
/// async fn my_orders(auth: AuthUser, ...) -> ... {
///     let buyer_id = auth.id;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub is_staff: bool,
}

impl TryFrom<&JwtClaims> for AuthUser {
    type Error = uuid::Error;

    fn try_from(claims: &JwtClaims) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&claims.sub)?,
            email: claims.email.clone(),
            is_staff: claims.staff,
        })
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| {
                AppError::Unauthorized("Authentication required".to_string()).into_response()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_auth() -> JwtAuth {
        JwtAuth::new(&JwtConfig::new("unit-test-secret"))
    }

    #[test]
    fn test_create_and_verify_token() {
        let auth = test_auth();
        let user_id = Uuid::now_v7();

        let token = auth
            .create_access_token(&user_id.to_string(), "buyer@example.com", false)
            .unwrap();

        let claims = auth.verify_token(&token).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.email, "buyer@example.com");
        assert!(!claims.staff);
    }

    #[test]
    fn test_verify_rejects_tampered_token() {
        let auth = test_auth();
        let other = JwtAuth::new(&JwtConfig::new("other-secret"));

        let token = other
            .create_access_token(&Uuid::now_v7().to_string(), "x@example.com", true)
            .unwrap();

        assert!(auth.verify_token(&token).is_err());
    }

    #[test]
    fn test_auth_user_from_claims() {
        let auth = test_auth();
        let user_id = Uuid::now_v7();
        let token = auth
            .create_access_token(&user_id.to_string(), "staff@example.com", true)
            .unwrap();
        let claims = auth.verify_token(&token).unwrap();

        let user = AuthUser::try_from(&claims).unwrap();
        assert_eq!(user.id, user_id);
        assert!(user.is_staff);
    }

    #[test]
    fn test_auth_user_rejects_bad_subject() {
        let claims = JwtClaims {
            sub: "not-a-uuid".to_string(),
            email: "x@example.com".to_string(),
            staff: false,
            exp: 0,
            iat: 0,
            jti: String::new(),
        };

        assert!(AuthUser::try_from(&claims).is_err());
    }
}
