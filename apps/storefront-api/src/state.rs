//! Application state management.
//!
//! This module defines the shared application state passed to request
//! handlers that need it (readiness checks). Domain routers hold their own
//! service state; this struct only carries the cross-cutting pieces.

use axum_helpers::JwtAuth;

/// Shared application state.
///
/// Cloned per handler (inexpensive Arc clones), providing access to:
/// - Application configuration
/// - PostgreSQL database connection pool
/// - JWT authentication
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// PostgreSQL database connection pool
    pub db: database::postgres::DatabaseConnection,
    /// Stateless JWT verification/issuing
    pub jwt_auth: JwtAuth,
}
