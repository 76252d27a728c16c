use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde_json::{Value, json};

use crate::entities::user::{self, UserRole};
use crate::error::{AppError, AppResult};
use crate::handlers::parse_enum;
use crate::middleware::access::ensure_self_or_admin;
use crate::services::users::{self as store, NewUser, UserChanges};
use crate::utils::extract::AppJson;
use crate::utils::jwt::Claims;
use crate::AppState;

pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<user::Model>>> {
    Ok(Json(store::list_all(&state.db).await?))
}

pub async fn list_active(State(state): State<AppState>) -> AppResult<Json<Vec<user::Model>>> {
    Ok(Json(store::list_active(&state.db).await?))
}

pub async fn list_by_role(
    State(state): State<AppState>,
    Path(role): Path<String>,
) -> AppResult<Json<Vec<user::Model>>> {
    let role = parse_enum::<UserRole>(&role, "role")?;
    Ok(Json(store::list_by_role(&state.db, role).await?))
}

/// Create an account. Only an admin can create another admin.
pub async fn create_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppJson(payload): AppJson<NewUser>,
) -> AppResult<Json<user::Model>> {
    if payload.role == UserRole::Admin && !claims.is_admin() {
        return Err(AppError::Forbidden(
            "Only an admin can create admin accounts".to_string(),
        ));
    }

    Ok(Json(store::create(&state.db, payload).await?))
}

pub async fn get_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> AppResult<Json<user::Model>> {
    ensure_self_or_admin(&claims, id)?;
    Ok(Json(store::find_by_id(&state.db, id).await?))
}

/// Profile edit. Activation is an admin decision and is ignored otherwise.
pub async fn update_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
    AppJson(mut payload): AppJson<UserChanges>,
) -> AppResult<Json<user::Model>> {
    ensure_self_or_admin(&claims, id)?;
    if !claims.is_admin() {
        payload.is_active = None;
    }

    Ok(Json(store::update(&state.db, id, payload).await?))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> AppResult<Json<Value>> {
    if claims.sub == id {
        return Err(AppError::BadRequest(
            "Cannot delete your own account".to_string(),
        ));
    }

    store::delete(&state.db, id).await?;
    Ok(Json(json!({ "message": "User deleted successfully" })))
}
