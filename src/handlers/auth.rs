use axum::{Json, extract::State};
use sea_orm::ActiveEnum;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::entities::user::UserRole;
use crate::error::{AppError, AppResult};
use crate::services::users::{self, NewUser};
use crate::utils::datetime;
use crate::utils::extract::AppJson;
use crate::utils::jwt::create_token;
use crate::utils::password::verify_password;
use crate::AppState;

pub const SERVICE_NAME: &str = "SpinGo Bike Rental API";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub role: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user_id: i32,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

/// Login with email, password and the role the client is signing in as
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let requested_role = UserRole::parse(&payload.role)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid role: {}", payload.role)))?;

    let user = users::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| {
            AppError::BadRequest(format!("User not found with email: {}", payload.email.trim()))
        })?;

    if user.role != requested_role {
        return Err(AppError::BadRequest(format!(
            "Role mismatch. Expected: {}, but user has: {}",
            requested_role.to_value(),
            user.role.to_value()
        )));
    }

    if !verify_password(&payload.password, &user.password)? {
        return Err(AppError::BadRequest("Invalid credentials".to_string()));
    }

    if !user.is_active {
        return Err(AppError::BadRequest("Account is deactivated".to_string()));
    }

    let token = create_token(
        user.id,
        &user.email,
        user.role,
        &state.config.jwt_secret,
        state.config.jwt_expiration_hours,
    )?;

    tracing::info!(user_id = user.id, role = ?user.role, "User logged in");

    Ok(Json(LoginResponse {
        token,
        user_id: user.id,
        name: user.name,
        email: user.email,
        role: user.role,
    }))
}

/// Self-service sign-up for every role except ADMIN
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<NewUser>,
) -> AppResult<Json<Value>> {
    if payload.role == UserRole::Admin {
        return Err(AppError::BadRequest(
            "Admin accounts cannot be self-registered".to_string(),
        ));
    }

    let user = users::create(&state.db, payload).await?;
    tracing::info!(user_id = user.id, role = ?user.role, "User registered");

    Ok(Json(json!({
        "message": "User registered successfully",
        "userId": user.id,
    })))
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "UP",
        "service": SERVICE_NAME,
        "timestamp": datetime::now().format("%Y-%m-%dT%H:%M:%S%.3f").to_string(),
    }))
}
