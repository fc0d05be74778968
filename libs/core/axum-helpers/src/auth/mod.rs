//! JWT authentication.
//!
//! Stateless HS256 tokens: the middleware verifies the signature and expiry,
//! then inserts an [`AuthUser`] into request extensions for handlers to
//! extract.

pub mod config;
pub mod jwt;
pub mod middleware;

pub use config::JwtConfig;
pub use jwt::{AuthUser, JwtAuth, JwtClaims};
pub use middleware::jwt_auth_middleware;
