use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::rest::principal::Principal;
use crate::dispatch::{bookings, matcher};
use crate::error::AppError;
use crate::geo::Pin;
use crate::identity;
use crate::models::booking::{Booking, BookingDetails, BookingStats, BookingStatus};
use crate::models::profile::Actor;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/bookings", post(create_booking).get(list_bookings))
        .route("/bookings/stats", get(booking_stats))
        .route("/bookings/:id", get(get_booking))
        .route("/bookings/:id/route", get(booking_route))
        .route("/bookings/:id/accept", post(accept_booking))
        .route("/bookings/:id/complete", post(complete_booking))
        .route("/dispatch/offers", get(dispatch_offers))
}

#[derive(Deserialize)]
pub struct ListBookingsQuery {
    pub q: Option<String>,
    pub status: Option<BookingStatus>,
}

async fn create_booking(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Json(payload): Json<bookings::NewBooking>,
) -> Result<Json<Booking>, AppError> {
    let actor = identity::resolve_actor(&state, principal.0)?;
    let booking = bookings::create(&state, &actor, payload)?;
    Ok(Json(booking))
}

async fn list_bookings(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Query(params): Query<ListBookingsQuery>,
) -> Result<Json<Vec<BookingDetails>>, AppError> {
    let actor = identity::resolve_actor(&state, principal.0)?;
    let results = bookings::search(&state, &actor, params.q.as_deref(), params.status);

    let details = results
        .into_iter()
        .map(|booking| bookings::with_details(&state, booking))
        .collect();

    Ok(Json(details))
}

async fn booking_stats(
    State(state): State<Arc<AppState>>,
    principal: Principal,
) -> Result<Json<BookingStats>, AppError> {
    identity::resolve_actor(&state, principal.0)?;
    Ok(Json(bookings::stats(&state)))
}

async fn get_booking(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingDetails>, AppError> {
    let actor = identity::resolve_actor(&state, principal.0)?;
    let booking = bookings::fetch_visible(&state, &actor, id)?;
    Ok(Json(bookings::with_details(&state, booking)))
}

#[derive(Serialize)]
struct RouteResponse {
    from: Option<Pin>,
    to: Option<Pin>,
}

async fn booking_route(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Path(id): Path<Uuid>,
) -> Result<Json<RouteResponse>, AppError> {
    let actor = identity::resolve_actor(&state, principal.0)?;
    let booking = bookings::fetch_visible(&state, &actor, id)?;

    let from = state.geocoder.pin_for(&booking.from_city).await;
    let to = state.geocoder.pin_for(&booking.to_city).await;

    Ok(Json(RouteResponse { from, to }))
}

async fn accept_booking(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Path(id): Path<Uuid>,
) -> Result<Json<Booking>, AppError> {
    let actor = identity::resolve_actor(&state, principal.0)?;
    let booking = matcher::claim(&state, &actor, id)?;
    Ok(Json(booking))
}

async fn complete_booking(
    State(state): State<Arc<AppState>>,
    principal: Principal,
    Path(id): Path<Uuid>,
) -> Result<Json<Booking>, AppError> {
    let actor = identity::resolve_actor(&state, principal.0)?;
    let driver_id = match &actor {
        Actor::Driver(profile) => profile.id,
        Actor::Customer(_) | Actor::Owner(_) => {
            return Err(AppError::InvalidRole(
                "only drivers complete bookings".to_string(),
            ))
        }
    };

    let booking = bookings::complete(&state, id, driver_id)?;
    Ok(Json(booking))
}

async fn dispatch_offers(
    State(state): State<Arc<AppState>>,
    principal: Principal,
) -> Result<Json<Vec<Booking>>, AppError> {
    let actor = identity::resolve_actor(&state, principal.0)?;
    let offers = matcher::offerable(&state, &actor)?;
    Ok(Json(offers))
}
