use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CustomerError {
    #[error("Customer not found: {0}")]
    NotFound(Uuid),

    #[error("Customer with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email already confirmed")]
    EmailAlreadyConfirmed,

    #[error("Invalid confirmation token")]
    InvalidToken,

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type CustomerResult<T> = Result<T, CustomerError>;

/// Convert CustomerError to AppError for standardized error responses
impl From<CustomerError> for AppError {
    fn from(err: CustomerError) -> Self {
        match err {
            CustomerError::NotFound(id) => {
                AppError::NotFound(format!("Customer {} not found", id))
            }
            CustomerError::DuplicateEmail(email) => {
                AppError::Conflict(format!("Customer with email '{}' already exists", email))
            }
            CustomerError::Validation(msg) => AppError::BadRequest(msg),
            CustomerError::InvalidCredentials => {
                AppError::Unauthorized("Invalid email or password".to_string())
            }
            CustomerError::EmailAlreadyConfirmed => {
                AppError::Conflict("Email already confirmed".to_string())
            }
            CustomerError::InvalidToken => {
                AppError::BadRequest("Invalid confirmation token".to_string())
            }
            CustomerError::PasswordHash(msg) => AppError::InternalServerError(msg),
            CustomerError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for CustomerError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
