use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, patch, post},
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

use crate::buyer::BuyerDirectory;
use crate::error::{OrderError, OrderResult};
use crate::models::{
    AddressFields, CreateOrder, DeliveryAddress, Order, OrderDetails, OrderItem, OrderItemInput,
    OrderStatus, UpdateOrderStatus,
};
use crate::repository::OrderRepository;
use crate::service::OrderService;

const TAG: &str = "orders";

/// OpenAPI documentation for the orders API
#[derive(OpenApi)]
#[openapi(
    paths(create_order, list_orders, get_order, update_order_status),
    components(
        schemas(
            CreateOrder,
            OrderItemInput,
            AddressFields,
            UpdateOrderStatus,
            Order,
            OrderItem,
            DeliveryAddress,
            OrderDetails,
            OrderStatus,
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
        (name = TAG, description = "Order placement and status endpoints")
    )
)]
pub struct ApiDoc;

/// Create the orders router. Every route requires authentication.
pub fn router<R, B>(service: OrderService<R, B>, auth: JwtAuth) -> Router
where
    R: OrderRepository + 'static,
    B: BuyerDirectory + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", post(create_order).get(list_orders))
        .route("/{id}", get(get_order))
        .route("/{id}/status", patch(update_order_status))
        .with_state(shared_service)
        .layer(middleware::from_fn_with_state(auth, jwt_auth_middleware))
}

/// Place an order.
///
/// Requires a confirmed email. With `use_new_address` the supplied address is
/// stored; otherwise the buyer's on-file address is snapshotted onto the
/// order. Stock is decremented atomically with order creation.
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateOrder,
    responses(
        (status = 201, description = "Order placed", body = OrderDetails),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_order<R, B>(
    State(service): State<Arc<OrderService<R, B>>>,
    user: AuthUser,
    ValidatedJson(input): ValidatedJson<CreateOrder>,
) -> OrderResult<impl IntoResponse>
where
    R: OrderRepository,
    B: BuyerDirectory,
{
    let details = service.place_order(user.id, input).await?;
    Ok((StatusCode::CREATED, Json(details)))
}

/// List the authenticated buyer's orders
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    responses(
        (status = 200, description = "The buyer's orders", body = Vec<Order>),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_orders<R, B>(
    State(service): State<Arc<OrderService<R, B>>>,
    user: AuthUser,
) -> OrderResult<Json<Vec<Order>>>
where
    R: OrderRepository,
    B: BuyerDirectory,
{
    let orders = service.list_orders(user.id).await?;
    Ok(Json(orders))
}

/// Get one of the buyer's orders with items and delivery address.
///
/// Orders owned by other buyers read as 404.
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order found", body = OrderDetails),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_order<R, B>(
    State(service): State<Arc<OrderService<R, B>>>,
    user: AuthUser,
    UuidPath(id): UuidPath,
) -> OrderResult<Json<OrderDetails>>
where
    R: OrderRepository,
    B: BuyerDirectory,
{
    let details = service.get_order_for_buyer(id, user.id).await?;
    Ok(Json(details))
}

/// Update an order's status (staff only).
///
/// Terminal orders (delivered, cancelled) reject all changes.
#[utoipa::path(
    patch,
    path = "/{id}/status",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    request_body = UpdateOrderStatus,
    responses(
        (status = 200, description = "Status updated", body = Order),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_order_status<R, B>(
    State(service): State<Arc<OrderService<R, B>>>,
    user: AuthUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateOrderStatus>,
) -> OrderResult<Json<Order>>
where
    R: OrderRepository,
    B: BuyerDirectory,
{
    if !user.is_staff {
        return Err(OrderError::StaffOnly);
    }

    let order = service.update_status(id, input.status).await?;
    Ok(Json(order))
}
