use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
};
use axum_helpers::{
    AuthUser, JwtAuth, ValidatedJson,
    errors::responses::{
        BadRequestValidationResponse, ConflictResponse, InternalServerErrorResponse,
        NotFoundResponse, UnauthorizedResponse,
    },
    jwt_auth_middleware,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::CustomerResult;
use crate::models::{
    Address, ConfirmEmail, CustomerAddress, CustomerProfile, Login, RegisterCustomer,
    TokenResponse, UpsertAddress,
};
use crate::repository::CustomerRepository;
use crate::service::CustomerService;

const TAG: &str = "customers";

/// OpenAPI documentation for the customers API
#[derive(OpenApi)]
#[openapi(
    paths(register, login, confirm_email, me, upsert_address),
    components(
        schemas(
            RegisterCustomer,
            Login,
            ConfirmEmail,
            UpsertAddress,
            Address,
            CustomerProfile,
            CustomerAddress,
            TokenResponse,
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            ConflictResponse,
            UnauthorizedResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Customer account endpoints")
    )
)]
pub struct ApiDoc;

/// Create the customers router.
///
/// Registration, login and email confirmation are public; profile access
/// sits behind the JWT middleware.
pub fn router<R: CustomerRepository + 'static>(
    service: CustomerService<R>,
    auth: JwtAuth,
) -> Router {
    let shared_service = Arc::new(service);

    let public = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/confirm-email", post(confirm_email))
        .with_state(shared_service.clone());

    let authed = Router::new()
        .route("/me", get(me))
        .route("/me/address", put(upsert_address))
        .with_state(shared_service)
        .layer(middleware::from_fn_with_state(auth, jwt_auth_middleware));

    public.merge(authed)
}

/// Register a new customer account
#[utoipa::path(
    post,
    path = "/register",
    tag = TAG,
    request_body = RegisterCustomer,
    responses(
        (status = 201, description = "Account created", body = CustomerProfile),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn register<R: CustomerRepository>(
    State(service): State<Arc<CustomerService<R>>>,
    ValidatedJson(input): ValidatedJson<RegisterCustomer>,
) -> CustomerResult<impl IntoResponse> {
    let profile = service.register(input).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// Exchange credentials for an access token
#[utoipa::path(
    post,
    path = "/login",
    tag = TAG,
    request_body = Login,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn login<R: CustomerRepository>(
    State(service): State<Arc<CustomerService<R>>>,
    ValidatedJson(input): ValidatedJson<Login>,
) -> CustomerResult<Json<TokenResponse>> {
    let token = service.login(input).await?;
    Ok(Json(token))
}

/// Confirm an email address with the token from the confirmation email
#[utoipa::path(
    post,
    path = "/confirm-email",
    tag = TAG,
    request_body = ConfirmEmail,
    responses(
        (status = 200, description = "Email confirmed", body = CustomerProfile),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn confirm_email<R: CustomerRepository>(
    State(service): State<Arc<CustomerService<R>>>,
    ValidatedJson(input): ValidatedJson<ConfirmEmail>,
) -> CustomerResult<Json<CustomerProfile>> {
    let profile = service.confirm_email(&input.token).await?;
    Ok(Json(profile))
}

/// Current customer's profile with the on-file address
#[utoipa::path(
    get,
    path = "/me",
    tag = TAG,
    responses(
        (status = 200, description = "Profile", body = CustomerProfile),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn me<R: CustomerRepository>(
    State(service): State<Arc<CustomerService<R>>>,
    user: AuthUser,
) -> CustomerResult<Json<CustomerProfile>> {
    let profile = service.profile(user.id).await?;
    Ok(Json(profile))
}

/// Create or replace the current customer's profile address
#[utoipa::path(
    put,
    path = "/me/address",
    tag = TAG,
    request_body = UpsertAddress,
    responses(
        (status = 200, description = "Address stored", body = CustomerAddress),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn upsert_address<R: CustomerRepository>(
    State(service): State<Arc<CustomerService<R>>>,
    user: AuthUser,
    ValidatedJson(input): ValidatedJson<UpsertAddress>,
) -> CustomerResult<Json<CustomerAddress>> {
    let address = service.upsert_address(user.id, input).await?;
    Ok(Json(address))
}
