mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::spawn_app;

#[tokio::test]
async fn test_public_browsing_and_filters() {
    let app = spawn_app().await;
    let (owner_id, owner) = app.register("Mike Johnson", "mike@example.com", "INDIVIDUAL_OWNER").await;

    let mumbai = app.create_bike(&owner, "Mumbai", "500.00").await;
    app.create_bike(&owner, "Delhi", "600.00").await;

    let (status, body) = app.get("/api/bikes", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, body) = app.get(&format!("/api/bikes/{mumbai}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "SPORT");
    assert_eq!(body["status"], "AVAILABLE");
    assert_eq!(body["pricePerHour"], "500.00");
    assert_eq!(body["ownerId"].as_i64().unwrap() as i32, owner_id);
    assert_eq!(body["ownerName"], "Mike Johnson");

    let (_, body) = app.get("/api/bikes/filter?city=Mumbai", None).await;
    let bikes = body.as_array().unwrap();
    assert_eq!(bikes.len(), 1);
    assert_eq!(bikes[0]["city"], "Mumbai");

    let (_, body) = app.get("/api/bikes/filter?type=sport&status=AVAILABLE", None).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (_, body) = app.get("/api/bikes/city/Delhi", None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (_, body) = app.get("/api/bikes/brand/Honda", None).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (_, body) = app.get(&format!("/api/bikes/owner/{owner_id}"), None).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, _) = app.get("/api/bikes/status/flying", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.get("/api/bikes/9999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Bike not found");
}

#[tokio::test]
async fn test_popular_is_first_three_available() {
    let app = spawn_app().await;
    let (_, owner) = app.register("Sarah Wilson", "sarah@example.com", "RENTAL_BUSINESS").await;

    let mut ids = Vec::new();
    for _ in 0..4 {
        ids.push(app.create_bike(&owner, "Chennai", "400.00").await);
    }

    let (status, body) = app.get("/api/bikes/popular", None).await;
    assert_eq!(status, StatusCode::OK);
    let popular: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["id"].as_i64().unwrap())
        .collect();
    assert_eq!(popular, ids[..3].iter().map(|&i| i as i64).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_role_checks_on_bike_writes() {
    let app = spawn_app().await;
    let (_, customer) = app.register("John Doe", "john@example.com", "CUSTOMER").await;
    let (_, owner) = app.register("Mike Johnson", "mike@example.com", "INDIVIDUAL_OWNER").await;
    let (_, rival) = app.register("Sarah Wilson", "sarah@example.com", "RENTAL_BUSINESS").await;

    let (status, _) = app
        .post(
            "/api/bikes",
            Some(&customer),
            json!({
                "brand": "Yamaha", "model": "FZ", "year": 2023, "type": "SPORT",
                "city": "Pune", "pricePerHour": 350, "pricePerDay": 2100, "pricePerMonth": 42000
            }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let bike = app.create_bike(&owner, "Pune", "350.00").await;

    let update = json!({
        "brand": "Yamaha", "model": "FZ-S", "year": 2024, "type": "SPORT",
        "city": "Pune", "pricePerHour": 375, "pricePerDay": 2200, "pricePerMonth": 43000
    });

    let (status, _) = app.put(&format!("/api/bikes/{bike}"), Some(&rival), Some(update.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.put(&format!("/api/bikes/{bike}"), Some(&owner), Some(update)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model"], "FZ-S");
    assert_eq!(body["pricePerHour"], "375.00");

    let (status, _) = app.delete(&format!("/api/bikes/{bike}"), Some(&owner)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = app.admin_token().await;
    let (status, body) = app.delete(&format!("/api/bikes/{bike}"), Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Bike deleted successfully");

    let (status, _) = app.delete(&format!("/api/bikes/{bike}"), Some(&admin)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_validation_rejects_bad_listing() {
    let app = spawn_app().await;
    let (_, owner) = app.register("Mike Johnson", "mike@example.com", "INDIVIDUAL_OWNER").await;

    let (status, body) = app
        .post(
            "/api/bikes",
            Some(&owner),
            json!({
                "brand": "Honda", "model": "Activa", "year": 2022, "type": "SCOOTER",
                "city": "Pune", "pricePerHour": 0, "pricePerDay": 800, "pricePerMonth": 15000
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "pricePerHour must be greater than 0 and at most 99999999.99"
    );

    let (status, body) = app
        .post(
            "/api/bikes",
            Some(&owner),
            json!({
                "brand": "Honda", "model": "Activa", "year": 2022, "type": "SCOOTER",
                "city": "Pune", "pricePerHour": "10000000000000000000000000000",
                "pricePerDay": 800, "pricePerMonth": 15000
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "pricePerHour must be greater than 0 and at most 99999999.99"
    );

    let (status, body) = app
        .post(
            "/api/bikes",
            Some(&owner),
            json!({
                "brand": "Honda", "model": "Activa", "year": 2022, "type": "SCOOTER",
                "city": "x".repeat(51), "pricePerHour": 100, "pricePerDay": 800,
                "pricePerMonth": 15000
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "city must be at most 50 characters");

    let (status, _) = app
        .post(
            "/api/bikes",
            Some(&owner),
            json!({
                "brand": "Honda", "model": "Activa", "year": 2022, "type": "SCOOTER",
                "city": "Pune", "pricePerHour": 100, "pricePerDay": 800, "pricePerMonth": 15000,
                "status": "BOOKED"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_availability_follows_status() {
    let app = spawn_app().await;
    let (_, owner) = app.register("Mike Johnson", "mike@example.com", "INDIVIDUAL_OWNER").await;
    let (_, customer) = app.register("John Doe", "john@example.com", "CUSTOMER").await;
    let bike = app.create_bike(&owner, "Mumbai", "500.00").await;

    let uri = format!("/api/bikes/{bike}/availability?startDate=2024-01-01T09:00&endDate=2024-01-01T18:00");

    let (status, body) = app.get(&uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["available"], true);
    assert_eq!(body["bike"]["id"].as_i64().unwrap() as i32, bike);

    let (status, _) = app.book(&customer, bike, "2024-01-01T09:00", "2024-01-01T18:00").await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.get(&uri, None).await;
    assert_eq!(body["available"], false);
    assert_eq!(body["reason"], "Bike is currently booked");
    assert!(body.get("bike").is_none());
}

#[tokio::test]
async fn test_availability_reason_uses_status_name() {
    let app = spawn_app().await;
    let (_, owner) = app.register("Mike Johnson", "mike@example.com", "INDIVIDUAL_OWNER").await;
    let bike = app.create_bike(&owner, "Mumbai", "500.00").await;

    let (status, body) = app
        .put(
            &format!("/api/bikes/{bike}"),
            Some(&owner),
            Some(json!({
                "brand": "Honda", "model": "CBR600RR", "year": 2023, "type": "SPORT",
                "city": "Mumbai", "pricePerHour": "500.00", "pricePerDay": "3000.00",
                "pricePerMonth": "60000.00", "status": "OUT_OF_SERVICE"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let uri = format!("/api/bikes/{bike}/availability?startDate=2024-01-01T09:00&endDate=2024-01-01T18:00");
    let (_, body) = app.get(&uri, None).await;
    assert_eq!(body["available"], false);
    assert_eq!(body["reason"], "Bike is currently out_of_service");
}
