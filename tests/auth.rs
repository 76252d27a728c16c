mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{ADMIN_EMAIL, ADMIN_PASSWORD, spawn_app};

#[tokio::test]
async fn test_health_endpoints() {
    let app = spawn_app().await;

    for uri in ["/api/health", "/api/auth/health"] {
        let (status, body) = app.get(uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "UP");
        assert_eq!(body["service"], "SpinGo Bike Rental API");
        assert!(body["timestamp"].is_string());
    }
}

#[tokio::test]
async fn test_register_and_login_flow() {
    let app = spawn_app().await;

    let payload = json!({
        "name": "John Doe",
        "email": "john@example.com",
        "phone": "9876543211",
        "password": "password123",
        "role": "CUSTOMER",
        "address": "123 Main St, Delhi"
    });

    let (status, body) = app.post("/api/auth/register", None, payload.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User registered successfully");
    let user_id = body["userId"].as_i64().unwrap();

    let (status, body) = app.post("/api/auth/register", None, payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email is already taken!");

    let (status, body) = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "john@example.com", "password": "password123", "role": "customer" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["userId"].as_i64().unwrap(), user_id);
    assert_eq!(body["role"], "CUSTOMER");
    assert_eq!(body["name"], "John Doe");
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn test_register_rejects_invalid_fields() {
    let app = spawn_app().await;

    let base = json!({
        "name": "John Doe",
        "email": "john@example.com",
        "phone": "9876543211",
        "password": "password123",
        "role": "CUSTOMER",
        "address": "123 Main St, Delhi"
    });

    let cases = [
        ("email", json!("@"), "A valid email is required"),
        ("phone", json!("9".repeat(40)), "Phone must be at most 20 characters"),
        ("address", json!("x".repeat(400)), "Address must be at most 255 characters"),
        ("name", json!("   "), "Name is required"),
    ];

    for (field, value, message) in cases {
        let mut payload = base.clone();
        payload[field] = value;
        let (status, body) = app.post("/api/auth/register", None, payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{field}");
        assert_eq!(body["error"], message);
    }

    let admin = app.admin_token().await;
    let (_, users) = app.get("/api/users", Some(&admin)).await;
    assert_eq!(users.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_login_rejections() {
    let app = spawn_app().await;

    let cases = [
        (json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD, "role": "CUSTOMER" }), "Role mismatch"),
        (json!({ "email": ADMIN_EMAIL, "password": "nope", "role": "ADMIN" }), "Invalid credentials"),
        (json!({ "email": "ghost@example.com", "password": "x", "role": "ADMIN" }), "User not found"),
        (json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD, "role": "PILOT" }), "Invalid role"),
    ];

    for (payload, expected) in cases {
        let (status, body) = app.post("/api/auth/login", None, payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(
            body["error"].as_str().unwrap().starts_with(expected),
            "unexpected error: {body}"
        );
    }
}

#[tokio::test]
async fn test_admin_cannot_self_register() {
    let app = spawn_app().await;

    let (status, _) = app
        .post(
            "/api/auth/register",
            None,
            json!({
                "name": "Mallory",
                "email": "mallory@example.com",
                "password": "password123",
                "role": "ADMIN"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_body_is_json_400() {
    let app = spawn_app().await;

    let (status, body) = app
        .post("/api/auth/register", None, json!({ "name": "No Email" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_protected_routes_need_token() {
    let app = spawn_app().await;

    let (status, _) = app.get("/api/bookings", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.get("/api/bookings", Some("not-a-jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.get("/api/users", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
