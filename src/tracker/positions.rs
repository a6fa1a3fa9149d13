use chrono::{DateTime, Duration, Utc};
use dashmap::mapref::entry::Entry;
use tracing::debug;
use uuid::Uuid;

use crate::models::location::{DriverLocation, DriverPosition};
use crate::notify::{ChangeOp, Table};
use crate::state::AppState;

#[derive(Debug, Clone)]
pub enum ReportOutcome {
    Applied(DriverLocation),
    Stale(DriverLocation),
}

impl ReportOutcome {
    pub fn row(&self) -> &DriverLocation {
        match self {
            ReportOutcome::Applied(row) | ReportOutcome::Stale(row) => row,
        }
    }

    pub fn applied(&self) -> bool {
        matches!(self, ReportOutcome::Applied(_))
    }
}

pub fn report(
    state: &AppState,
    driver_id: Uuid,
    latitude: f64,
    longitude: f64,
    recorded_at: DateTime<Utc>,
) -> ReportOutcome {
    let row = DriverLocation {
        driver_id,
        latitude,
        longitude,
        updated_at: recorded_at,
    };

    let (outcome, op) = match state.locations.entry(driver_id) {
        Entry::Vacant(slot) => {
            slot.insert(row.clone());
            (ReportOutcome::Applied(row), Some(ChangeOp::Insert))
        }
        Entry::Occupied(mut slot) => {
            if recorded_at < slot.get().updated_at {
                (ReportOutcome::Stale(slot.get().clone()), None)
            } else {
                slot.insert(row.clone());
                (ReportOutcome::Applied(row), Some(ChangeOp::Update))
            }
        }
    };

    match op {
        Some(op) => {
            state
                .metrics
                .location_reports_total
                .with_label_values(&["applied"])
                .inc();
            state.publish(Table::DriverLocations, op, driver_id);
        }
        None => {
            state
                .metrics
                .location_reports_total
                .with_label_values(&["stale"])
                .inc();
            debug!(
                driver_id = %driver_id,
                reported_at = %recorded_at,
                stored_at = %outcome.row().updated_at,
                "dropping out-of-order location report"
            );
        }
    }

    outcome
}

pub fn latest(state: &AppState, driver_id: Uuid) -> Option<DriverLocation> {
    state
        .locations
        .get(&driver_id)
        .map(|entry| entry.value().clone())
}

pub fn list_recent(state: &AppState, limit: usize) -> Vec<DriverPosition> {
    let mut rows: Vec<DriverLocation> = state
        .locations
        .iter()
        .map(|entry| entry.value().clone())
        .collect();
    rows.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    rows.truncate(limit);

    let now = Utc::now();
    let threshold = state.config.location_stale_secs;

    rows.into_iter()
        .map(|location| {
            let profile = state
                .profiles
                .get(&location.driver_id)
                .map(|entry| entry.value().clone());

            DriverPosition {
                driver_name: profile.as_ref().map(|p| p.full_name.clone()),
                driver_phone: profile.as_ref().map(|p| p.phone.clone()),
                stale: is_stale(&location, now, threshold),
                location,
            }
        })
        .collect()
}

pub fn is_stale(location: &DriverLocation, now: DateTime<Utc>, threshold_secs: i64) -> bool {
    now - location.updated_at > Duration::seconds(threshold_secs)
}
