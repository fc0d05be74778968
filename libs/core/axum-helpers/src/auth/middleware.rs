use super::jwt::{AuthUser, JwtAuth};
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::errors::AppError;

/// Extract JWT from Authorization header or cookie
fn extract_token_from_request(headers: &HeaderMap) -> Option<String> {
    // Try Authorization header first: "Bearer <token>"
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer ").map(|s| s.to_string()))
        .or_else(|| {
            // Fallback to cookie: "access_token=<token>"
            headers
                .get("cookie")
                .and_then(|v| v.to_str().ok())
                .and_then(|cookies| {
                    cookies.split(';').find_map(|cookie| {
                        let parts: Vec<&str> = cookie.trim().splitn(2, '=').collect();
                        if parts.len() == 2 && parts[0] == "access_token" {
                            Some(parts[1].to_string())
                        } else {
                            None
                        }
                    })
                })
        })
}

/// JWT authentication middleware
///
/// Validates JWT tokens from the Authorization header or cookies and inserts
/// an [`AuthUser`] into request extensions on success.
///
/// # Example
///
/// ```ignore
/// use axum::Router;
/// use axum::routing::get;
/// use axum_helpers::{JwtAuth, jwt_auth_middleware};
///
/// let protected_routes = Router::new()
///     .route("/api/orders", get(my_orders))
///     .layer(axum::middleware::from_fn_with_state(
///         auth.clone(),
///         jwt_auth_middleware
///     ));
/// ```
pub async fn jwt_auth_middleware(
    State(auth): State<JwtAuth>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = match extract_token_from_request(&headers) {
        Some(t) => t,
        None => {
            tracing::debug!("No JWT found in Authorization header or cookie");
            return Err(
                AppError::Unauthorized("No token provided".to_string()).into_response()
            );
        }
    };

    let claims = match auth.verify_token(&token) {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!("JWT verification failed: {}", e);
            return Err(AppError::Unauthorized("Invalid token".to_string()).into_response());
        }
    };

    let user = match AuthUser::try_from(&claims) {
        Ok(u) => u,
        Err(e) => {
            tracing::debug!("JWT subject is not a valid UUID: {}", e);
            return Err(AppError::Unauthorized("Invalid token".to_string()).into_response());
        }
    };

    // Token is valid - make the caller available to handlers
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_token_from_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Bearer abc123".parse().unwrap());

        assert_eq!(extract_token_from_request(&headers), Some("abc123".to_string()));
    }

    #[test]
    fn test_extract_token_from_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert("cookie", "session=x; access_token=tok42".parse().unwrap());

        assert_eq!(extract_token_from_request(&headers), Some("tok42".to_string()));
    }

    #[test]
    fn test_extract_token_missing() {
        let headers = HeaderMap::new();
        assert_eq!(extract_token_from_request(&headers), None);
    }
}
