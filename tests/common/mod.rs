#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use bike_rental_backend::{AppState, config::Config, db::seed, routes};
use http_body_util::BodyExt;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use serde_json::{Value, json};
use tower::ServiceExt;

pub const ADMIN_EMAIL: &str = "admin@spingo.com";
pub const ADMIN_PASSWORD: &str = "admin123";

pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
}

fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        database_max_connections: 1,
        jwt_secret: "test-secret".to_string(),
        jwt_expiration_hours: 1,
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        rate_limit_per_second: 60,
        rate_limit_burst: 100,
        seed_demo_data: false,
    }
}

/// Fresh in-memory database, migrated and holding only the admin account.
pub async fn spawn_app() -> TestApp {
    let config = test_config();

    // One connection, otherwise every pooled connection gets its own empty
    // in-memory database.
    let mut options = ConnectOptions::new(config.database_url.clone());
    options.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("Failed to open sqlite database");

    migration::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    seed::ensure_admin(&db).await.expect("Failed to seed admin");

    let router = routes::create_router(AppState {
        db: db.clone(),
        config,
    });

    TestApp { router, db }
}

impl TestApp {
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request("GET", uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request("POST", uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        self.request("PUT", uri, token, body).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request("DELETE", uri, token, None).await
    }

    pub async fn login(&self, email: &str, password: &str, role: &str) -> String {
        let (status, body) = self
            .post(
                "/api/auth/login",
                None,
                json!({ "email": email, "password": password, "role": role }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["token"].as_str().unwrap().to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD, "ADMIN").await
    }

    /// Register a user and return `(id, token)`.
    pub async fn register(&self, name: &str, email: &str, role: &str) -> (i32, String) {
        let (status, body) = self
            .post(
                "/api/auth/register",
                None,
                json!({
                    "name": name,
                    "email": email,
                    "phone": "9876543210",
                    "password": "password123",
                    "role": role,
                    "address": "1 Test Street"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "register failed: {body}");
        let id = body["userId"].as_i64().unwrap() as i32;
        let token = self.login(email, "password123", role).await;
        (id, token)
    }

    /// List a bike as `token`'s user and return its id.
    pub async fn create_bike(&self, token: &str, city: &str, price_per_hour: &str) -> i32 {
        let (status, body) = self
            .post(
                "/api/bikes",
                Some(token),
                json!({
                    "brand": "Honda",
                    "model": "CBR600RR",
                    "year": 2023,
                    "type": "SPORT",
                    "city": city,
                    "pricePerHour": price_per_hour,
                    "pricePerDay": "3000.00",
                    "pricePerMonth": "60000.00",
                    "description": "Test bike"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create bike failed: {body}");
        body["id"].as_i64().unwrap() as i32
    }

    pub async fn book(&self, token: &str, bike_id: i32, pickup: &str, dropoff: &str) -> (StatusCode, Value) {
        self.post(
            "/api/bookings",
            Some(token),
            json!({
                "bikeId": bike_id,
                "pickupDate": pickup,
                "dropoffDate": dropoff,
                "pickupTime": "09:00",
                "dropTime": "18:00"
            }),
        )
        .await
    }
}
