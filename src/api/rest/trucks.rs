use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::Json;
use axum::Router;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::rest::principal::Principal;
use crate::error::AppError;
use crate::fleet::{self, NewTruck, TruckChanges};
use crate::identity;
use crate::models::truck::{FleetSummary, Truck, TruckEarning};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/trucks", post(add_truck).get(list_trucks))
        .route("/trucks/:id", patch(update_truck).delete(remove_truck))
        .route("/trucks/:id/earnings", post(record_earning))
        .route("/fleet/summary", get(fleet_summary))
}

async fn add_truck(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Json(payload): Json<NewTruck>,
) -> Result<Json<Truck>, AppError> {
    let actor = identity::resolve_actor(&state, principal.0)?;
    let truck = fleet::add_truck(&state, &actor, payload)?;
    Ok(Json(truck))
}

async fn list_trucks(
    State(state): State<Arc<AppState>>,
    principal: Principal,
) -> Result<Json<Vec<Truck>>, AppError> {
    let actor = identity::resolve_actor(&state, principal.0)?;
    let trucks = fleet::list_trucks(&state, &actor)?;
    Ok(Json(trucks))
}

async fn update_truck(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Path(id): Path<Uuid>,
    Json(payload): Json<TruckChanges>,
) -> Result<Json<Truck>, AppError> {
    let actor = identity::resolve_actor(&state, principal.0)?;
    let truck = fleet::update_truck(&state, &actor, id, payload)?;
    Ok(Json(truck))
}

async fn remove_truck(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let actor = identity::resolve_actor(&state, principal.0)?;
    fleet::remove_truck(&state, &actor, id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct RecordEarningRequest {
    pub amount: f64,
}

async fn record_earning(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecordEarningRequest>,
) -> Result<Json<TruckEarning>, AppError> {
    let actor = identity::resolve_actor(&state, principal.0)?;
    let earning = fleet::record_earning(&state, &actor, id, payload.amount)?;
    Ok(Json(earning))
}

async fn fleet_summary(
    State(state): State<Arc<AppState>>,
    principal: Principal,
) -> Result<Json<FleetSummary>, AppError> {
    let actor = identity::resolve_actor(&state, principal.0)?;
    let summary = fleet::summary(&state, &actor)?;
    Ok(Json(summary))
}
