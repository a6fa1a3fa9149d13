use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::Json;
use axum::Router;

use crate::api::rest::principal::Principal;
use crate::error::AppError;
use crate::identity::{self, NewOwnerRecord, NewProfile, ProfileChanges};
use crate::models::profile::{Actor, OwnerRecord, Profile};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/profiles", post(register_profile))
        .route("/profiles/me", get(current_actor).patch(update_profile))
        .route("/owners", post(provision_owner))
}

async fn register_profile(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Json(payload): Json<NewProfile>,
) -> Result<Json<Profile>, AppError> {
    let profile = identity::register_profile(&state, principal.0, payload)?;
    Ok(Json(profile))
}

async fn current_actor(
    State(state): State<Arc<AppState>>,
    principal: Principal,
) -> Result<Json<Actor>, AppError> {
    let actor = identity::resolve_actor(&state, principal.0)?;
    Ok(Json(actor))
}

async fn update_profile(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Json(payload): Json<ProfileChanges>,
) -> Result<Json<Profile>, AppError> {
    let profile = identity::update_profile(&state, principal.0, payload)?;
    Ok(Json(profile))
}

async fn provision_owner(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewOwnerRecord>,
) -> Result<Json<OwnerRecord>, AppError> {
    let record = identity::provision_owner(&state, payload)?;
    Ok(Json(record))
}
