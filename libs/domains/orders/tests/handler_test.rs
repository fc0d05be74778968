//! Handler tests for the orders domain
//!
//! These tests drive the full placement path over HTTP against the in-memory
//! repositories: auth middleware, buyer preconditions, stock validation and
//! the all-or-nothing placement effect.

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum_helpers::{JwtAuth, JwtConfig};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceExt; // For oneshot()
use uuid::Uuid;

use domain_catalog::{
    CategoryRepository, CreateCategory, CreateProduct, CreateSubCategory,
    InMemoryCatalogRepository, Product, ProductRepository, SubCategoryRepository,
};
use domain_orders::{
    AddressFields, BuyerDirectory, BuyerProfile, InMemoryOrderRepository, OrderDetails,
    OrderResult, OrderService, handlers,
};

/// Buyer directory stub with per-test profiles
#[derive(Default, Clone)]
struct StubBuyers {
    profiles: Arc<RwLock<HashMap<Uuid, BuyerProfile>>>,
}

impl StubBuyers {
    async fn insert(&self, profile: BuyerProfile) {
        self.profiles.write().await.insert(profile.id, profile);
    }
}

#[async_trait]
impl BuyerDirectory for StubBuyers {
    async fn buyer(&self, id: Uuid) -> OrderResult<Option<BuyerProfile>> {
        Ok(self.profiles.read().await.get(&id).cloned())
    }
}

struct TestHarness {
    app: Router,
    auth: JwtAuth,
    catalog: Arc<InMemoryCatalogRepository>,
    buyers: StubBuyers,
}

fn harness() -> TestHarness {
    let auth = JwtAuth::new(&JwtConfig::new("orders-handler-test-secret"));
    let catalog = Arc::new(InMemoryCatalogRepository::new());
    let buyers = StubBuyers::default();
    let service = OrderService::new(
        InMemoryOrderRepository::new(catalog.clone()),
        buyers.clone(),
    );

    TestHarness {
        app: handlers::router(service, auth.clone()),
        auth,
        catalog,
        buyers,
    }
}

fn address() -> AddressFields {
    AddressFields {
        city: "Berlin".to_string(),
        street_address: "Unter den Linden 1".to_string(),
        apartment_address: "Apt 4".to_string(),
        postal_code: "10117".to_string(),
    }
}

impl TestHarness {
    async fn seed_buyer(&self, confirmed: bool) -> (Uuid, String) {
        let id = Uuid::now_v7();
        self.buyers
            .insert(BuyerProfile {
                id,
                is_confirmed_email: confirmed,
                address: Some(address()),
            })
            .await;
        let token = self
            .auth
            .create_access_token(&id.to_string(), "buyer@example.com", false)
            .unwrap();
        (id, token)
    }

    fn staff_token(&self) -> String {
        self.auth
            .create_access_token(&Uuid::now_v7().to_string(), "staff@example.com", true)
            .unwrap()
    }

    async fn seed_product(&self, name: &str, quantity: i32, price: i64) -> Product {
        let category = self
            .catalog
            .create_category(CreateCategory {
                name: format!("Category for {}", name),
            })
            .await
            .unwrap();
        let sub = self
            .catalog
            .create_subcategory(CreateSubCategory {
                category_id: category.id,
                name: format!("Subcategory for {}", name),
            })
            .await
            .unwrap();
        self.catalog
            .create_product(CreateProduct {
                sub_category_id: sub.id,
                name: name.to_string(),
                brand: "Acme".to_string(),
                description: String::new(),
                price: Decimal::new(price, 0),
                quantity,
            })
            .await
            .unwrap()
    }

    async fn stock_of(&self, product_id: Uuid) -> i32 {
        self.catalog
            .product_by_id(product_id)
            .await
            .unwrap()
            .unwrap()
            .quantity
    }
}

async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn request(method: &str, uri: &str, token: &str, body: Option<serde_json::Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", token));

    match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

#[tokio::test]
async fn test_place_order_decrements_stock_and_reports_total() {
    let harness = harness();
    let (_, token) = harness.seed_buyer(true).await;
    let product = harness.seed_product("Phone X", 100, 500).await;

    let response = harness
        .app
        .clone()
        .oneshot(request(
            "POST",
            "/",
            &token,
            Some(json!({
                "order_items": [{"product": product.id, "quantity": 10}],
                "use_new_address": false
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let details: OrderDetails = json_body(response.into_body()).await;
    assert_eq!(details.order.status.to_string(), "pending");
    assert_eq!(details.total_cost, Decimal::new(5000, 0));
    assert_eq!(details.delivery_address.city, "Berlin");

    assert_eq!(harness.stock_of(product.id).await, 90);
}

#[tokio::test]
async fn test_place_order_exceeding_stock_is_rejected() {
    let harness = harness();
    let (_, token) = harness.seed_buyer(true).await;
    let product = harness.seed_product("Phone X", 90, 500).await;

    let response = harness
        .app
        .clone()
        .oneshot(request(
            "POST",
            "/",
            &token,
            Some(json!({
                "order_items": [{"product": product.id, "quantity": 200}],
                "use_new_address": false
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(harness.stock_of(product.id).await, 90);
}

#[tokio::test]
async fn test_place_order_requires_authentication() {
    let harness = harness();
    let product = harness.seed_product("Phone X", 100, 500).await;

    let req = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "order_items": [{"product": product.id, "quantity": 1}],
                "use_new_address": false
            })
            .to_string(),
        ))
        .unwrap();

    let response = harness.app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_place_order_requires_confirmed_email() {
    let harness = harness();
    let (_, token) = harness.seed_buyer(false).await;
    let product = harness.seed_product("Phone X", 100, 500).await;

    let response = harness
        .app
        .clone()
        .oneshot(request(
            "POST",
            "/",
            &token,
            Some(json!({
                "order_items": [{"product": product.id, "quantity": 1}],
                "use_new_address": false
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_place_order_with_empty_items_is_rejected() {
    let harness = harness();
    let (_, token) = harness.seed_buyer(true).await;

    let response = harness
        .app
        .clone()
        .oneshot(request(
            "POST",
            "/",
            &token,
            Some(json!({
                "order_items": [],
                "use_new_address": false
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_place_order_with_new_address_snapshot() {
    let harness = harness();
    let (_, token) = harness.seed_buyer(true).await;
    let product = harness.seed_product("Phone X", 100, 500).await;

    let response = harness
        .app
        .clone()
        .oneshot(request(
            "POST",
            "/",
            &token,
            Some(json!({
                "order_items": [{"product": product.id, "quantity": 1}],
                "use_new_address": true,
                "delivery_address": {
                    "city": "Hamburg",
                    "street_address": "Speicherstadt 2",
                    "apartment_address": "Apt 9",
                    "postal_code": "20457"
                }
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let details: OrderDetails = json_body(response.into_body()).await;
    assert_eq!(details.delivery_address.city, "Hamburg");
}

#[tokio::test]
async fn test_get_order_of_other_buyer_is_404() {
    let harness = harness();
    let (_, owner_token) = harness.seed_buyer(true).await;
    let (_, other_token) = harness.seed_buyer(true).await;
    let product = harness.seed_product("Phone X", 100, 500).await;

    let response = harness
        .app
        .clone()
        .oneshot(request(
            "POST",
            "/",
            &owner_token,
            Some(json!({
                "order_items": [{"product": product.id, "quantity": 1}],
                "use_new_address": false
            })),
        ))
        .await
        .unwrap();
    let details: OrderDetails = json_body(response.into_body()).await;

    // Owner sees it
    let response = harness
        .app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/{}", details.order.id),
            &owner_token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Another buyer doesn't
    let response = harness
        .app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/{}", details.order.id),
            &other_token,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_status_update_flow_and_terminal_conflict() {
    let harness = harness();
    let (_, buyer_token) = harness.seed_buyer(true).await;
    let staff_token = harness.staff_token();
    let product = harness.seed_product("Phone X", 100, 500).await;

    let response = harness
        .app
        .clone()
        .oneshot(request(
            "POST",
            "/",
            &buyer_token,
            Some(json!({
                "order_items": [{"product": product.id, "quantity": 1}],
                "use_new_address": false
            })),
        ))
        .await
        .unwrap();
    let details: OrderDetails = json_body(response.into_body()).await;
    let status_uri = format!("/{}/status", details.order.id);

    // Buyers can't update status
    let response = harness
        .app
        .clone()
        .oneshot(request(
            "PATCH",
            &status_uri,
            &buyer_token,
            Some(json!({"status": "shipped"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Staff moves it forward
    for status in ["shipped", "delivered"] {
        let response = harness
            .app
            .clone()
            .oneshot(request(
                "PATCH",
                &status_uri,
                &staff_token,
                Some(json!({"status": status})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    // Delivered is terminal
    let response = harness
        .app
        .clone()
        .oneshot(request(
            "PATCH",
            &status_uri,
            &staff_token,
            Some(json!({"status": "cancelled"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Cancellation never happened, and no restock either way
    assert_eq!(harness.stock_of(product.id).await, 99);
}
