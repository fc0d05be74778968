use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Category not found: {0}")]
    CategoryNotFound(Uuid),

    #[error("Category '{0}' not found")]
    CategoryNameNotFound(String),

    #[error("Subcategory not found: {0}")]
    SubCategoryNotFound(Uuid),

    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    #[error("'{0}' already exists")]
    DuplicateName(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Staff privileges required")]
    StaffOnly,

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Convert CatalogError to AppError for standardized error responses
impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::CategoryNotFound(id) => {
                AppError::NotFound(format!("Category {} not found", id))
            }
            CatalogError::CategoryNameNotFound(name) => {
                AppError::NotFound(format!("Category '{}' not found", name))
            }
            CatalogError::SubCategoryNotFound(id) => {
                AppError::NotFound(format!("Subcategory {} not found", id))
            }
            CatalogError::ProductNotFound(id) => {
                AppError::NotFound(format!("Product {} not found", id))
            }
            CatalogError::DuplicateName(name) => {
                AppError::Conflict(format!("'{}' already exists", name))
            }
            CatalogError::Validation(msg) => AppError::BadRequest(msg),
            CatalogError::Conflict(msg) => AppError::Conflict(msg),
            CatalogError::StaffOnly => {
                AppError::Forbidden("Staff privileges required".to_string())
            }
            CatalogError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        // Convert to AppError for standardized error response format
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
