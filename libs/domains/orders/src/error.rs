use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    OrderNotFound(Uuid),

    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    #[error("Buyer not found: {0}")]
    BuyerNotFound(Uuid),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    PermissionDenied(String),

    #[error("Staff privileges required")]
    StaffOnly,

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type OrderResult<T> = Result<T, OrderError>;

/// Convert OrderError to AppError for standardized error responses
impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::OrderNotFound(id) => AppError::NotFound(format!("Order {} not found", id)),
            OrderError::ProductNotFound(id) => {
                AppError::NotFound(format!("Product {} not found", id))
            }
            OrderError::BuyerNotFound(id) => {
                AppError::NotFound(format!("Buyer {} not found", id))
            }
            OrderError::Validation(msg) => AppError::BadRequest(msg),
            OrderError::Conflict(msg) => AppError::Conflict(msg),
            OrderError::PermissionDenied(msg) => AppError::Forbidden(msg),
            OrderError::StaffOnly => AppError::Forbidden("Staff privileges required".to_string()),
            OrderError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for OrderError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
