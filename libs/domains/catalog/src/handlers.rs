use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
};
use axum_helpers::{
    AuthUser, JwtAuth, UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, ConflictResponse, ForbiddenResponse,
        InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
    jwt_auth_middleware,
};
use std::sync::Arc;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::cascade::{CascadeReport, SubCategoryCascadeReport};
use crate::error::{CatalogError, CatalogResult};
use crate::models::{
    ActivatedSubCategories, Category, CreateCategory, CreateProduct, CreateSubCategory, Product,
    ProductFilter, SubCategory, UpdateProduct,
};
use crate::repository::{CategoryRepository, ProductRepository, SubCategoryRepository};
use crate::service::CatalogService;

const TAG: &str = "catalog";

/// OpenAPI documentation for the catalog API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_categories,
        create_category,
        activate_category,
        deactivate_category,
        activate_subcategories_of_category,
        list_subcategories,
        create_subcategory,
        activate_subcategory,
        deactivate_subcategory,
        list_products,
        get_product,
        create_product,
        update_product,
        activate_product,
        deactivate_product,
    ),
    components(
        schemas(
            Category,
            SubCategory,
            Product,
            CreateCategory,
            CreateSubCategory,
            CreateProduct,
            UpdateProduct,
            ProductFilter,
            CascadeReport,
            SubCategoryCascadeReport,
            ActivatedSubCategories,
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            ConflictResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Catalog hierarchy and status cascade endpoints")
    )
)]
pub struct ApiDoc;

/// Mutations are staff-only
fn require_staff(user: &AuthUser) -> CatalogResult<()> {
    if user.is_staff {
        Ok(())
    } else {
        Err(CatalogError::StaffOnly)
    }
}

/// Create the catalog router.
///
/// Reads are public; mutations sit behind the JWT middleware and require a
/// staff account.
pub fn router<R>(service: CatalogService<R>, auth: JwtAuth) -> Router
where
    R: CategoryRepository + SubCategoryRepository + ProductRepository + 'static,
{
    let shared_service = Arc::new(service);

    let public = Router::new()
        .route("/categories", get(list_categories))
        .route("/categories/{id}/subcategories", get(list_subcategories))
        .route("/products", get(list_products))
        .route("/products/{id}", get(get_product))
        .with_state(shared_service.clone());

    let staff = Router::new()
        .route("/categories", post(create_category))
        .route("/categories/{id}/activate", post(activate_category))
        .route("/categories/{id}/deactivate", post(deactivate_category))
        .route(
            "/categories/{id}/activate-subcategories",
            post(activate_subcategories_of_category),
        )
        .route("/subcategories", post(create_subcategory))
        .route("/subcategories/{id}/activate", post(activate_subcategory))
        .route(
            "/subcategories/{id}/deactivate",
            post(deactivate_subcategory),
        )
        .route("/products", post(create_product))
        .route("/products/{id}", put(update_product))
        .route("/products/{id}/activate", post(activate_product))
        .route("/products/{id}/deactivate", post(deactivate_product))
        .with_state(shared_service)
        .layer(middleware::from_fn_with_state(auth, jwt_auth_middleware));

    public.merge(staff)
}

/// List all categories
#[utoipa::path(
    get,
    path = "/categories",
    tag = TAG,
    responses(
        (status = 200, description = "List of categories", body = Vec<Category>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_categories<R>(
    State(service): State<Arc<CatalogService<R>>>,
) -> CatalogResult<Json<Vec<Category>>>
where
    R: CategoryRepository + SubCategoryRepository + ProductRepository,
{
    let categories = service.list_categories().await?;
    Ok(Json(categories))
}

/// Create a new category (staff only)
#[utoipa::path(
    post,
    path = "/categories",
    tag = TAG,
    request_body = CreateCategory,
    responses(
        (status = 201, description = "Category created successfully", body = Category),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_category<R>(
    State(service): State<Arc<CatalogService<R>>>,
    user: AuthUser,
    ValidatedJson(input): ValidatedJson<CreateCategory>,
) -> CatalogResult<impl IntoResponse>
where
    R: CategoryRepository + SubCategoryRepository + ProductRepository,
{
    require_staff(&user)?;
    let category = service.create_category(input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// Activate a category. Its subcategories and products stay as they are.
#[utoipa::path(
    post,
    path = "/categories/{id}/activate",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category activated", body = Category),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn activate_category<R>(
    State(service): State<Arc<CatalogService<R>>>,
    user: AuthUser,
    UuidPath(id): UuidPath,
) -> CatalogResult<Json<Category>>
where
    R: CategoryRepository + SubCategoryRepository + ProductRepository,
{
    require_staff(&user)?;
    let category = service.activate_category(id).await?;
    Ok(Json(category))
}

/// Deactivate a category, cascading down the hierarchy per the configured
/// cascade depth. The whole walk is atomic.
#[utoipa::path(
    post,
    path = "/categories/{id}/deactivate",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category deactivated with cascade", body = CascadeReport),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn deactivate_category<R>(
    State(service): State<Arc<CatalogService<R>>>,
    user: AuthUser,
    UuidPath(id): UuidPath,
) -> CatalogResult<Json<CascadeReport>>
where
    R: CategoryRepository + SubCategoryRepository + ProductRepository,
{
    require_staff(&user)?;
    let report = service.deactivate_category(id).await?;
    Ok(Json(report))
}

/// Bulk-activate every inactive subcategory of an active category
#[utoipa::path(
    post,
    path = "/categories/{id}/activate-subcategories",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Subcategories activated", body = ActivatedSubCategories),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn activate_subcategories_of_category<R>(
    State(service): State<Arc<CatalogService<R>>>,
    user: AuthUser,
    UuidPath(id): UuidPath,
) -> CatalogResult<Json<ActivatedSubCategories>>
where
    R: CategoryRepository + SubCategoryRepository + ProductRepository,
{
    require_staff(&user)?;
    let result = service.activate_all_subcategories(id).await?;
    Ok(Json(result))
}

/// List direct subcategories of a category
#[utoipa::path(
    get,
    path = "/categories/{id}/subcategories",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "List of subcategories", body = Vec<SubCategory>),
        (status = 400, response = BadRequestUuidResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_subcategories<R>(
    State(service): State<Arc<CatalogService<R>>>,
    UuidPath(id): UuidPath,
) -> CatalogResult<Json<Vec<SubCategory>>>
where
    R: CategoryRepository + SubCategoryRepository + ProductRepository,
{
    let subs = service.list_subcategories(id).await?;
    Ok(Json(subs))
}

/// Create a new subcategory under an existing category (staff only)
#[utoipa::path(
    post,
    path = "/subcategories",
    tag = TAG,
    request_body = CreateSubCategory,
    responses(
        (status = 201, description = "Subcategory created successfully", body = SubCategory),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_subcategory<R>(
    State(service): State<Arc<CatalogService<R>>>,
    user: AuthUser,
    ValidatedJson(input): ValidatedJson<CreateSubCategory>,
) -> CatalogResult<impl IntoResponse>
where
    R: CategoryRepository + SubCategoryRepository + ProductRepository,
{
    require_staff(&user)?;
    let sub = service.create_subcategory(input).await?;
    Ok((StatusCode::CREATED, Json(sub)))
}

/// Activate a subcategory. Fails while its parent category is inactive.
#[utoipa::path(
    post,
    path = "/subcategories/{id}/activate",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Subcategory ID")
    ),
    responses(
        (status = 200, description = "Subcategory activated", body = SubCategory),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn activate_subcategory<R>(
    State(service): State<Arc<CatalogService<R>>>,
    user: AuthUser,
    UuidPath(id): UuidPath,
) -> CatalogResult<Json<SubCategory>>
where
    R: CategoryRepository + SubCategoryRepository + ProductRepository,
{
    require_staff(&user)?;
    let sub = service.activate_subcategory(id).await?;
    Ok(Json(sub))
}

/// Deactivate a subcategory, cascading to its products per the configured depth
#[utoipa::path(
    post,
    path = "/subcategories/{id}/deactivate",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Subcategory ID")
    ),
    responses(
        (status = 200, description = "Subcategory deactivated with cascade", body = SubCategoryCascadeReport),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn deactivate_subcategory<R>(
    State(service): State<Arc<CatalogService<R>>>,
    user: AuthUser,
    UuidPath(id): UuidPath,
) -> CatalogResult<Json<SubCategoryCascadeReport>>
where
    R: CategoryRepository + SubCategoryRepository + ProductRepository,
{
    require_staff(&user)?;
    let report = service.deactivate_subcategory(id).await?;
    Ok(Json(report))
}

/// List products with optional filtering and search
#[utoipa::path(
    get,
    path = "/products",
    tag = TAG,
    params(ProductFilter),
    responses(
        (status = 200, description = "List of products", body = Vec<Product>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R>(
    State(service): State<Arc<CatalogService<R>>>,
    Query(filter): Query<ProductFilter>,
) -> CatalogResult<Json<Vec<Product>>>
where
    R: CategoryRepository + SubCategoryRepository + ProductRepository,
{
    let products = service.list_products(filter).await?;
    Ok(Json(products))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R>(
    State(service): State<Arc<CatalogService<R>>>,
    UuidPath(id): UuidPath,
) -> CatalogResult<Json<Product>>
where
    R: CategoryRepository + SubCategoryRepository + ProductRepository,
{
    let product = service.get_product(id).await?;
    Ok(Json(product))
}

/// Create a new product (staff only)
#[utoipa::path(
    post,
    path = "/products",
    tag = TAG,
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created successfully", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R>(
    State(service): State<Arc<CatalogService<R>>>,
    user: AuthUser,
    ValidatedJson(input): ValidatedJson<CreateProduct>,
) -> CatalogResult<impl IntoResponse>
where
    R: CategoryRepository + SubCategoryRepository + ProductRepository,
{
    require_staff(&user)?;
    let product = service.create_product(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Update a product's name, brand, description, price or quantity (staff only)
#[utoipa::path(
    put,
    path = "/products/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product updated successfully", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R>(
    State(service): State<Arc<CatalogService<R>>>,
    user: AuthUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateProduct>,
) -> CatalogResult<Json<Product>>
where
    R: CategoryRepository + SubCategoryRepository + ProductRepository,
{
    require_staff(&user)?;
    let product = service.update_product(id, input).await?;
    Ok(Json(product))
}

/// Activate a product (staff only)
#[utoipa::path(
    post,
    path = "/products/{id}/activate",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product activated", body = Product),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn activate_product<R>(
    State(service): State<Arc<CatalogService<R>>>,
    user: AuthUser,
    UuidPath(id): UuidPath,
) -> CatalogResult<Json<Product>>
where
    R: CategoryRepository + SubCategoryRepository + ProductRepository,
{
    require_staff(&user)?;
    let product = service.activate_product(id).await?;
    Ok(Json(product))
}

/// Deactivate a product, stamping its deletion time (staff only)
#[utoipa::path(
    post,
    path = "/products/{id}/deactivate",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product deactivated", body = Product),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn deactivate_product<R>(
    State(service): State<Arc<CatalogService<R>>>,
    user: AuthUser,
    UuidPath(id): UuidPath,
) -> CatalogResult<Json<Product>>
where
    R: CategoryRepository + SubCategoryRepository + ProductRepository,
{
    require_staff(&user)?;
    let product = service.deactivate_product(id).await?;
    Ok(Json(product))
}
