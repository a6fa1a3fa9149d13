use uuid::Uuid;

use crate::dispatch::bookings;
use crate::error::AppError;
use crate::models::booking::{Booking, BookingStatus};
use crate::models::profile::Actor;
use crate::state::AppState;

pub fn offerable(state: &AppState, actor: &Actor) -> Result<Vec<Booking>, AppError> {
    match actor {
        Actor::Driver(_) => {}
        Actor::Customer(_) | Actor::Owner(_) => {
            return Err(AppError::InvalidRole(
                "only drivers receive dispatch offers".to_string(),
            ))
        }
    }

    Ok(bookings::list_visible(state, actor)
        .into_iter()
        .filter(|booking| booking.status == BookingStatus::Pending)
        .collect())
}

pub fn claim(state: &AppState, actor: &Actor, booking_id: Uuid) -> Result<Booking, AppError> {
    let driver = match actor {
        Actor::Driver(profile) => profile,
        Actor::Customer(_) | Actor::Owner(_) => {
            return Err(AppError::InvalidRole(
                "only drivers accept bookings".to_string(),
            ))
        }
    };

    bookings::accept(state, booking_id, driver.id)
}
