use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::rest::principal::Principal;
use crate::error::AppError;
use crate::identity;
use crate::models::location::{DriverLocation, DriverPosition};
use crate::models::profile::Actor;
use crate::state::AppState;
use crate::tracker::positions;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/locations", post(report_location).get(recent_locations))
        .route("/locations/:driver_id", get(latest_location))
}

#[derive(Deserialize)]
pub struct ReportLocationRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub recorded_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
pub struct RecentLocationsQuery {
    pub limit: Option<usize>,
}

async fn report_location(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Json(payload): Json<ReportLocationRequest>,
) -> Result<Json<DriverLocation>, AppError> {
    let actor = identity::resolve_actor(&state, principal.0)?;
    let driver_id = match &actor {
        Actor::Driver(profile) => profile.id,
        Actor::Customer(_) | Actor::Owner(_) => {
            return Err(AppError::InvalidRole(
                "only drivers report locations".to_string(),
            ))
        }
    };

    if !payload.latitude.is_finite() || payload.latitude.abs() > 90.0 {
        return Err(AppError::BadRequest(
            "latitude must be within [-90, 90]".to_string(),
        ));
    }
    if !payload.longitude.is_finite() || payload.longitude.abs() > 180.0 {
        return Err(AppError::BadRequest(
            "longitude must be within [-180, 180]".to_string(),
        ));
    }

    let recorded_at = payload.recorded_at.unwrap_or_else(Utc::now);
    let outcome = positions::report(
        &state,
        driver_id,
        payload.latitude,
        payload.longitude,
        recorded_at,
    );

    Ok(Json(outcome.row().clone()))
}

async fn recent_locations(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Query(params): Query<RecentLocationsQuery>,
) -> Result<Json<Vec<DriverPosition>>, AppError> {
    identity::resolve_actor(&state, principal.0)?;

    let limit = params
        .limit
        .unwrap_or(state.config.recent_locations_limit);

    Ok(Json(positions::list_recent(&state, limit)))
}

async fn latest_location(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Path(driver_id): Path<Uuid>,
) -> Result<Json<DriverLocation>, AppError> {
    identity::resolve_actor(&state, principal.0)?;

    let location = positions::latest(&state, driver_id).ok_or_else(|| {
        AppError::NotFound(format!("no location reported for driver {driver_id}"))
    })?;

    Ok(Json(location))
}
