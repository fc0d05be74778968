use axum::Router;

pub mod health;

use crate::buyers::CustomerBuyerDirectory;
use domain_catalog::{CascadePolicy, CatalogService, PgCatalogRepository};
use domain_customers::{CustomerService, LoggingEmailSender, PgCustomerRepository};
use domain_orders::{OrderService, PgOrderRepository};
use std::sync::Arc;

/// Creates the API routes without the `/api` prefix.
/// The `/api` prefix will be added by the `create_router` helper.
///
/// This function takes a reference to AppState and initializes all services.
/// Returns a stateless Router (all sub-routers have state already applied).
pub fn routes(state: &crate::state::AppState) -> Router {
    let catalog_service = CatalogService::new(
        PgCatalogRepository::new(state.db.clone()),
        CascadePolicy::new(state.config.cascade_depth),
    );

    let customer_service = CustomerService::new(
        PgCustomerRepository::new(state.db.clone()),
        Arc::new(LoggingEmailSender),
        &state.config.jwt,
    );

    let order_service = OrderService::new(
        PgOrderRepository::new(state.db.clone()),
        CustomerBuyerDirectory::new(customer_service.clone()),
    );

    Router::new()
        .nest(
            "/catalog",
            domain_catalog::handlers::router(catalog_service, state.jwt_auth.clone()),
        )
        .nest(
            "/customers",
            domain_customers::handlers::router(customer_service, state.jwt_auth.clone()),
        )
        .nest(
            "/orders",
            domain_orders::handlers::router(order_service, state.jwt_auth.clone()),
        )
}

/// Creates a router with the /ready endpoint that performs actual health checks.
///
/// This router has state applied and can be merged with the stateless app
/// router from `create_router`. The /ready endpoint pings the database.
pub fn ready_router(state: crate::state::AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
