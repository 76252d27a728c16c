use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::entities::bike::{self, BikeStatus, BikeType};
use crate::entities::user;
use crate::error::{AppError, AppResult};
use crate::handlers::parse_enum;
use crate::services::bikes::{self as store, BikeFilter, BikeInput, BikeWithOwner};
use crate::utils::extract::AppJson;
use crate::utils::jwt::Claims;
use crate::AppState;

/// A listing with its owner's display fields.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BikeResponse {
    #[serde(flatten)]
    pub bike: bike::Model,
    pub owner_name: Option<String>,
    pub owner_email: Option<String>,
}

impl From<BikeWithOwner> for BikeResponse {
    fn from((bike, owner): BikeWithOwner) -> Self {
        let (owner_name, owner_email) = match owner {
            Some(user::Model { name, email, .. }) => (Some(name), Some(email)),
            None => (None, None),
        };
        Self {
            bike,
            owner_name,
            owner_email,
        }
    }
}

fn respond(rows: Vec<BikeWithOwner>) -> Json<Vec<BikeResponse>> {
    Json(rows.into_iter().map(BikeResponse::from).collect())
}

#[derive(Debug, Deserialize)]
pub struct FilterQuery {
    pub city: Option<String>,
    #[serde(rename = "type")]
    pub bike_type: Option<String>,
    pub brand: Option<String>,
    pub status: Option<String>,
}

impl FilterQuery {
    fn into_filter(self) -> AppResult<BikeFilter> {
        let non_blank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Ok(BikeFilter {
            city: non_blank(self.city),
            bike_type: non_blank(self.bike_type)
                .map(|t| parse_enum::<BikeType>(&t, "bike type"))
                .transpose()?,
            brand: non_blank(self.brand),
            status: non_blank(self.status)
                .map(|s| parse_enum::<BikeStatus>(&s, "bike status"))
                .transpose()?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bike: Option<BikeResponse>,
}

pub async fn list_bikes(State(state): State<AppState>) -> AppResult<Json<Vec<BikeResponse>>> {
    Ok(respond(store::list_active(&state.db).await?))
}

pub async fn list_available(State(state): State<AppState>) -> AppResult<Json<Vec<BikeResponse>>> {
    Ok(respond(store::list_available(&state.db).await?))
}

pub async fn list_popular(State(state): State<AppState>) -> AppResult<Json<Vec<BikeResponse>>> {
    Ok(respond(store::list_popular(&state.db).await?))
}

pub async fn get_bike(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<BikeResponse>> {
    Ok(Json(store::find_with_owner(&state.db, id).await?.into()))
}

pub async fn list_by_status(
    State(state): State<AppState>,
    Path(status): Path<String>,
) -> AppResult<Json<Vec<BikeResponse>>> {
    let status = parse_enum::<BikeStatus>(&status, "bike status")?;
    Ok(respond(store::list_by_status(&state.db, status).await?))
}

pub async fn list_by_type(
    State(state): State<AppState>,
    Path(bike_type): Path<String>,
) -> AppResult<Json<Vec<BikeResponse>>> {
    let bike_type = parse_enum::<BikeType>(&bike_type, "bike type")?;
    Ok(respond(store::list_by_type(&state.db, bike_type).await?))
}

pub async fn list_by_city(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> AppResult<Json<Vec<BikeResponse>>> {
    Ok(respond(store::list_by_city(&state.db, &city).await?))
}

pub async fn list_by_brand(
    State(state): State<AppState>,
    Path(brand): Path<String>,
) -> AppResult<Json<Vec<BikeResponse>>> {
    Ok(respond(store::list_by_brand(&state.db, &brand).await?))
}

pub async fn list_by_owner(
    State(state): State<AppState>,
    Path(owner_id): Path<i32>,
) -> AppResult<Json<Vec<BikeResponse>>> {
    Ok(respond(store::list_by_owner(&state.db, owner_id).await?))
}

pub async fn filter_bikes(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> AppResult<Json<Vec<BikeResponse>>> {
    let filter = query.into_filter()?;
    Ok(respond(store::filter(&state.db, &filter).await?))
}

/// Status-only check; the requested window is accepted but not compared
/// against existing bookings.
pub async fn check_availability(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<AvailabilityResponse>> {
    let (bike, owner) = store::find_with_owner(&state.db, id).await?;

    if bike.status != BikeStatus::Available {
        return Ok(Json(AvailabilityResponse {
            available: false,
            reason: Some(format!("Bike is currently {}", bike.status.label())),
            bike: None,
        }));
    }

    Ok(Json(AvailabilityResponse {
        available: true,
        reason: None,
        bike: Some((bike, owner).into()),
    }))
}

/// List a bike. Owners and businesses always list under their own account.
pub async fn create_bike(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppJson(mut payload): AppJson<BikeInput>,
) -> AppResult<Json<BikeResponse>> {
    if !claims.is_admin() {
        payload.owner_id = Some(claims.sub);
    }

    let bike = store::create(&state.db, payload).await?;
    Ok(Json(store::find_with_owner(&state.db, bike.id).await?.into()))
}

pub async fn update_bike(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
    AppJson(mut payload): AppJson<BikeInput>,
) -> AppResult<Json<BikeResponse>> {
    if !claims.is_admin() {
        let bike = store::find_by_id(&state.db, id).await?;
        if bike.owner_id != Some(claims.sub) {
            return Err(AppError::Forbidden(
                "You can only update your own bikes".to_string(),
            ));
        }
        payload.owner_id = None;
    }

    store::update(&state.db, id, payload, claims.is_admin()).await?;
    Ok(Json(store::find_with_owner(&state.db, id).await?.into()))
}

pub async fn delete_bike(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Value>> {
    store::delete(&state.db, id).await?;
    Ok(Json(json!({ "message": "Bike deleted successfully" })))
}
