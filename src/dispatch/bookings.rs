use std::collections::HashMap;

use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::booking::{Booking, BookingDetails, BookingStats, BookingStatus, CityCount};
use crate::models::profile::Actor;
use crate::notify::{ChangeOp, Table};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NewBooking {
    pub from_city: String,
    pub to_city: String,
    pub load: String,
}

pub fn create(state: &AppState, actor: &Actor, new: NewBooking) -> Result<Booking, AppError> {
    let customer = match actor {
        Actor::Customer(profile) => profile,
        Actor::Driver(_) | Actor::Owner(_) => {
            return Err(AppError::InvalidRole(
                "only customers create bookings".to_string(),
            ))
        }
    };

    let from_city = non_empty(&new.from_city, "from_city")?;
    let to_city = non_empty(&new.to_city, "to_city")?;
    let load = non_empty(&new.load, "load")?;

    let booking = Booking {
        id: Uuid::new_v4(),
        customer_id: customer.id,
        driver_id: None,
        from_city,
        to_city,
        load,
        status: BookingStatus::Pending,
        created_at: Utc::now(),
    };

    state.bookings.insert(booking.id, booking.clone());
    state.metrics.bookings_created_total.inc();
    state.metrics.pending_bookings.inc();
    state.publish(Table::Bookings, ChangeOp::Insert, booking.id);

    info!(
        booking_id = %booking.id,
        customer_id = %customer.id,
        from = %booking.from_city,
        to = %booking.to_city,
        "booking created"
    );

    Ok(booking)
}

pub fn list_visible(state: &AppState, actor: &Actor) -> Vec<Booking> {
    let mut visible: Vec<Booking> = match actor {
        Actor::Customer(profile) => state
            .bookings
            .iter()
            .filter(|entry| entry.value().customer_id == profile.id)
            .map(|entry| entry.value().clone())
            .collect(),
        Actor::Driver(profile) => state
            .bookings
            .iter()
            .filter(|entry| {
                let booking = entry.value();
                booking.status == BookingStatus::Pending || booking.driver_id == Some(profile.id)
            })
            .map(|entry| entry.value().clone())
            .collect(),
        Actor::Owner(_) => Vec::new(),
    };

    visible.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    visible
}

pub fn search(
    state: &AppState,
    actor: &Actor,
    term: Option<&str>,
    status: Option<BookingStatus>,
) -> Vec<Booking> {
    let mut results = list_visible(state, actor);

    if let Some(status) = status {
        results.retain(|booking| booking.status == status);
    }

    if let Some(term) = term {
        let needle = term.trim().to_lowercase();
        if !needle.is_empty() {
            results.retain(|booking| {
                booking.from_city.to_lowercase().contains(&needle)
                    || booking.to_city.to_lowercase().contains(&needle)
                    || booking.load.to_lowercase().contains(&needle)
            });
        }
    }

    results
}

pub fn fetch_visible(state: &AppState, actor: &Actor, booking_id: Uuid) -> Result<Booking, AppError> {
    let booking = state
        .bookings
        .get(&booking_id)
        .map(|entry| entry.value().clone())
        .ok_or_else(|| AppError::NotFound(format!("booking {booking_id} not found")))?;

    let visible = match actor {
        Actor::Customer(profile) => booking.customer_id == profile.id,
        Actor::Driver(profile) => {
            booking.status == BookingStatus::Pending || booking.driver_id == Some(profile.id)
        }
        Actor::Owner(_) => false,
    };

    if !visible {
        return Err(AppError::NotFound(format!("booking {booking_id} not found")));
    }

    Ok(booking)
}

pub fn accept(state: &AppState, booking_id: Uuid, driver_id: Uuid) -> Result<Booking, AppError> {
    let outcome = {
        let mut entry = state
            .bookings
            .get_mut(&booking_id)
            .ok_or_else(|| AppError::NotFound(format!("booking {booking_id} not found")))?;

        match entry.status {
            BookingStatus::Pending => {
                entry.status = BookingStatus::Accepted;
                entry.driver_id = Some(driver_id);
                Ok(entry.clone())
            }
            BookingStatus::Accepted | BookingStatus::Completed => Err(AppError::Conflict(format!(
                "booking {booking_id} is already claimed"
            ))),
        }
    };

    match &outcome {
        Ok(booking) => {
            state.metrics.pending_bookings.dec();
            state
                .metrics
                .booking_transitions_total
                .with_label_values(&["accept", "success"])
                .inc();
            let waited = (Utc::now() - booking.created_at).num_milliseconds() as f64 / 1000.0;
            state.metrics.time_to_accept_seconds.observe(waited.max(0.0));
            state.publish(Table::Bookings, ChangeOp::Update, booking.id);

            info!(booking_id = %booking.id, driver_id = %driver_id, "booking accepted");
        }
        Err(err) => {
            state
                .metrics
                .booking_transitions_total
                .with_label_values(&["accept", "conflict"])
                .inc();
            debug!(booking_id = %booking_id, driver_id = %driver_id, error = %err, "accept rejected");
        }
    }

    outcome
}

pub fn complete(state: &AppState, booking_id: Uuid, driver_id: Uuid) -> Result<Booking, AppError> {
    let outcome = {
        let mut entry = state
            .bookings
            .get_mut(&booking_id)
            .ok_or_else(|| AppError::NotFound(format!("booking {booking_id} not found")))?;

        match entry.status {
            BookingStatus::Pending => Err(AppError::InvalidTransition(format!(
                "booking {booking_id} has not been accepted"
            ))),
            BookingStatus::Accepted => {
                if entry.driver_id != Some(driver_id) {
                    Err(AppError::Forbidden(format!(
                        "booking {booking_id} belongs to another driver"
                    )))
                } else {
                    entry.status = BookingStatus::Completed;
                    Ok(entry.clone())
                }
            }
            BookingStatus::Completed => {
                if entry.driver_id != Some(driver_id) {
                    Err(AppError::Forbidden(format!(
                        "booking {booking_id} belongs to another driver"
                    )))
                } else {
                    Err(AppError::InvalidTransition(format!(
                        "booking {booking_id} is already completed"
                    )))
                }
            }
        }
    };

    match &outcome {
        Ok(booking) => {
            state
                .metrics
                .booking_transitions_total
                .with_label_values(&["complete", "success"])
                .inc();
            state.publish(Table::Bookings, ChangeOp::Update, booking.id);

            info!(booking_id = %booking.id, driver_id = %driver_id, "booking completed");
        }
        Err(err) => {
            let outcome_label = match err {
                AppError::Forbidden(_) => "forbidden",
                _ => "invalid_transition",
            };
            state
                .metrics
                .booking_transitions_total
                .with_label_values(&["complete", outcome_label])
                .inc();
            debug!(booking_id = %booking_id, driver_id = %driver_id, error = %err, "complete rejected");
        }
    }

    outcome
}

pub fn stats(state: &AppState) -> BookingStats {
    let mut total = 0;
    let mut pending = 0;
    let mut accepted = 0;
    let mut completed = 0;
    let mut city_counts: HashMap<String, usize> = HashMap::new();

    for entry in state.bookings.iter() {
        let booking = entry.value();
        total += 1;
        match booking.status {
            BookingStatus::Pending => pending += 1,
            BookingStatus::Accepted => accepted += 1,
            BookingStatus::Completed => completed += 1,
        }
        *city_counts.entry(booking.from_city.clone()).or_insert(0) += 1;
        *city_counts.entry(booking.to_city.clone()).or_insert(0) += 1;
    }

    let mut top_cities: Vec<CityCount> = city_counts
        .into_iter()
        .map(|(city, count)| CityCount { city, count })
        .collect();
    top_cities.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.city.cmp(&b.city)));
    top_cities.truncate(5);

    BookingStats {
        total,
        pending,
        accepted,
        completed,
        top_cities,
    }
}

pub fn with_details(state: &AppState, booking: Booking) -> BookingDetails {
    let customer = state
        .profiles
        .get(&booking.customer_id)
        .map(|entry| entry.value().clone());
    let driver = booking
        .driver_id
        .and_then(|id| state.profiles.get(&id).map(|entry| entry.value().clone()));

    let mut details = BookingDetails {
        customer_full_name: customer.as_ref().map(|p| p.full_name.clone()),
        customer_contact: customer.as_ref().map(|p| p.phone.clone()),
        driver_full_name: driver.as_ref().map(|p| p.full_name.clone()),
        driver_contact: driver.as_ref().map(|p| p.phone.clone()),
        license_number: None,
        vehicle_number: None,
        vehicle_capacity: None,
        booking,
    };

    if let Some(vehicle) = driver.as_ref().and_then(|p| p.driver.as_ref()) {
        details.license_number = Some(vehicle.driving_license.clone());
        details.vehicle_number = Some(vehicle.vehicle_number.clone());
        details.vehicle_capacity = Some(vehicle.vehicle_capacity.clone());
    }

    details
}

fn non_empty(value: &str, field: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest(format!("{field} cannot be empty")));
    }
    Ok(trimmed.to_string())
}
