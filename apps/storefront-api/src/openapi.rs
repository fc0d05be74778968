use utoipa::OpenApi;

/// Combined API documentation, one nested doc per domain.
#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Storefront API",
        version = "0.1.0",
        description = "E-commerce backend: customer accounts, product catalog with status cascades, and transactional order placement"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = "/catalog", api = domain_catalog::handlers::ApiDoc),
        (path = "/customers", api = domain_customers::handlers::ApiDoc),
        (path = "/orders", api = domain_orders::handlers::ApiDoc)
    )
)]
pub struct ApiDoc;
