//! Handler tests for the customers domain
//!
//! Drives registration, login and profile access over HTTP against the
//! in-memory repository.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum_helpers::{JwtAuth, JwtConfig};
use domain_customers::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use test_utils::TestDataBuilder;
use tower::ServiceExt; // For oneshot()

fn app() -> Router {
    let auth = JwtAuth::new(&JwtConfig::new("customers-handler-test-secret"));
    let service = CustomerService::new(
        InMemoryCustomerRepository::new(),
        Arc::new(LoggingEmailSender),
        &JwtConfig::new("customers-handler-test-secret"),
    );
    handlers::router(service, auth)
}

async fn json_body(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_register_returns_201() {
    let app = app();
    let builder = TestDataBuilder::from_test_name("customers_register_201");

    let response = app
        .oneshot(post_json(
            "/register",
            json!({
                "email": builder.email("buyer"),
                "password": "s3cret-pass",
                "first_name": "Jo"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let body = json_body(response.into_body()).await;
    assert_eq!(body["email"], builder.email("buyer"));
    assert_eq!(body["is_confirmed_email"], false);
    // The hash never leaks
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_duplicate_email_returns_409() {
    let app = app();
    let builder = TestDataBuilder::from_test_name("customers_register_dup");

    let payload = json!({
        "email": builder.email("buyer"),
        "password": "s3cret-pass"
    });

    let response = app
        .clone()
        .oneshot(post_json("/register", payload.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.oneshot(post_json("/register", payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_short_password_returns_400() {
    let app = app();
    let builder = TestDataBuilder::from_test_name("customers_register_shortpw");

    let response = app
        .oneshot(post_json(
            "/register",
            json!({
                "email": builder.email("buyer"),
                "password": "1234567"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_and_me_roundtrip() {
    let app = app();
    let builder = TestDataBuilder::from_test_name("customers_login_me");
    let email = builder.email("buyer");

    app.clone()
        .oneshot(post_json(
            "/register",
            json!({"email": email, "password": "s3cret-pass"}),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(post_json(
            "/login",
            json!({"email": email, "password": "s3cret-pass"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response.into_body()).await;
    let token = body["access_token"].as_str().unwrap().to_string();

    let request = Request::builder()
        .method("GET")
        .uri("/me")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response.into_body()).await;
    assert_eq!(body["email"], email);
    assert!(body["address"].is_null());
}

#[tokio::test]
async fn test_login_wrong_password_returns_401() {
    let app = app();
    let builder = TestDataBuilder::from_test_name("customers_login_wrongpw");
    let email = builder.email("buyer");

    app.clone()
        .oneshot(post_json(
            "/register",
            json!({"email": email, "password": "s3cret-pass"}),
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(post_json(
            "/login",
            json!({"email": email, "password": "wrong-pass"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_without_token_returns_401() {
    let app = app();

    let request = Request::builder()
        .method("GET")
        .uri("/me")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_address_upsert_roundtrip() {
    let app = app();
    let builder = TestDataBuilder::from_test_name("customers_address_upsert");
    let email = builder.email("buyer");

    app.clone()
        .oneshot(post_json(
            "/register",
            json!({"email": email, "password": "s3cret-pass"}),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(post_json(
            "/login",
            json!({"email": email, "password": "s3cret-pass"}),
        ))
        .await
        .unwrap();
    let token = json_body(response.into_body()).await["access_token"]
        .as_str()
        .unwrap()
        .to_string();

    let request = Request::builder()
        .method("PUT")
        .uri("/me/address")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(
            json!({
                "city": "Berlin",
                "street_address": "Unter den Linden 1",
                "apartment_address": "Apt 4",
                "postal_code": "10117"
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Profile now carries the address
    let request = Request::builder()
        .method("GET")
        .uri("/me")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let body = json_body(response.into_body()).await;
    assert_eq!(body["address"]["city"], "Berlin");
}
