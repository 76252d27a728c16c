use axum::{
    Extension, Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::services::dashboard::{
    self, AdminDashboard, BusinessDashboard, CustomerDashboard, OwnerDashboard, PartnerDashboard,
};
use crate::utils::jwt::Claims;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQuery {
    pub user_id: Option<i32>,
}

/// `userId` may be omitted; when given it has to be the caller's own id.
fn subject(claims: &Claims, query: &DashboardQuery) -> AppResult<i32> {
    match query.user_id {
        Some(id) if id != claims.sub => Err(AppError::Forbidden(
            "You can only view your own dashboard".to_string(),
        )),
        Some(id) => Ok(id),
        None => Ok(claims.sub),
    }
}

pub async fn customer(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<DashboardQuery>,
) -> AppResult<Json<CustomerDashboard>> {
    let user_id = subject(&claims, &query)?;
    Ok(Json(dashboard::customer(&state.db, user_id).await?))
}

pub async fn admin(State(state): State<AppState>) -> AppResult<Json<AdminDashboard>> {
    Ok(Json(dashboard::admin(&state.db).await?))
}

pub async fn owner(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<DashboardQuery>,
) -> AppResult<Json<OwnerDashboard>> {
    let user_id = subject(&claims, &query)?;
    Ok(Json(dashboard::owner(&state.db, user_id).await?))
}

pub async fn business(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<DashboardQuery>,
) -> AppResult<Json<BusinessDashboard>> {
    let user_id = subject(&claims, &query)?;
    Ok(Json(dashboard::business(&state.db, user_id).await?))
}

pub async fn partner(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<DashboardQuery>,
) -> AppResult<Json<PartnerDashboard>> {
    let user_id = subject(&claims, &query)?;
    Ok(Json(dashboard::partner(&state.db, user_id).await?))
}
