use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::profile::Actor;
use crate::models::truck::{
    FleetSummary, Truck, TruckEarning, TruckEarningsSummary, TruckStatus,
};
use crate::notify::{ChangeOp, Table};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NewTruck {
    pub truck_number: String,
    pub model: String,
    pub capacity: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TruckChanges {
    pub status: Option<TruckStatus>,
    // Some(Some(id)) assigns, Some(None) clears, None leaves it alone.
    #[serde(default, deserialize_with = "double_option")]
    pub driver_id: Option<Option<Uuid>>,
}

fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<Uuid>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<Uuid>::deserialize(deserializer).map(Some)
}

pub fn add_truck(state: &AppState, actor: &Actor, new: NewTruck) -> Result<Truck, AppError> {
    let owner = owner_id(actor)?;

    let truck_number = new.truck_number.trim();
    if truck_number.is_empty() {
        return Err(AppError::BadRequest("truck_number cannot be empty".to_string()));
    }

    if let Some(capacity) = new.capacity {
        if !capacity.is_finite() || capacity <= 0.0 {
            return Err(AppError::BadRequest("capacity must be positive".to_string()));
        }
    }

    let truck = Truck {
        id: Uuid::new_v4(),
        owner_id: owner,
        truck_number: truck_number.to_string(),
        model: new.model.trim().to_string(),
        capacity: new.capacity,
        status: TruckStatus::Available,
        driver_id: None,
        created_at: Utc::now(),
    };

    state.trucks.insert(truck.id, truck.clone());
    state.publish(Table::Trucks, ChangeOp::Insert, truck.id);
    info!(truck_id = %truck.id, owner_id = %owner, "truck added");

    Ok(truck)
}

pub fn list_trucks(state: &AppState, actor: &Actor) -> Result<Vec<Truck>, AppError> {
    let owner = owner_id(actor)?;

    let mut trucks: Vec<Truck> = state
        .trucks
        .iter()
        .filter(|entry| entry.value().owner_id == owner)
        .map(|entry| entry.value().clone())
        .collect();

    trucks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(trucks)
}

pub fn update_truck(
    state: &AppState,
    actor: &Actor,
    truck_id: Uuid,
    changes: TruckChanges,
) -> Result<Truck, AppError> {
    let owner = owner_id(actor)?;

    let updated = {
        let mut truck = state
            .trucks
            .get_mut(&truck_id)
            .ok_or_else(|| AppError::NotFound(format!("truck {truck_id} not found")))?;

        if truck.owner_id != owner {
            return Err(AppError::Forbidden(format!(
                "truck {truck_id} belongs to another owner"
            )));
        }

        if let Some(status) = changes.status {
            truck.status = status;
        }
        if let Some(driver_id) = changes.driver_id {
            truck.driver_id = driver_id;
        }

        truck.clone()
    };

    state.publish(Table::Trucks, ChangeOp::Update, truck_id);
    Ok(updated)
}

pub fn remove_truck(state: &AppState, actor: &Actor, truck_id: Uuid) -> Result<(), AppError> {
    let owner = owner_id(actor)?;

    {
        let truck = state
            .trucks
            .get(&truck_id)
            .ok_or_else(|| AppError::NotFound(format!("truck {truck_id} not found")))?;

        if truck.owner_id != owner {
            return Err(AppError::Forbidden(format!(
                "truck {truck_id} belongs to another owner"
            )));
        }
    }

    state.trucks.remove(&truck_id);
    state
        .truck_earnings
        .retain(|_, earning| earning.truck_id != truck_id);
    state.publish(Table::Trucks, ChangeOp::Delete, truck_id);
    info!(truck_id = %truck_id, owner_id = %owner, "truck removed");

    Ok(())
}

pub fn record_earning(
    state: &AppState,
    actor: &Actor,
    truck_id: Uuid,
    amount: f64,
) -> Result<TruckEarning, AppError> {
    let owner = owner_id(actor)?;

    if !amount.is_finite() || amount < 0.0 {
        return Err(AppError::BadRequest(
            "amount must be a non-negative number".to_string(),
        ));
    }

    let owned = state
        .trucks
        .get(&truck_id)
        .map(|entry| entry.value().owner_id == owner)
        .ok_or_else(|| AppError::NotFound(format!("truck {truck_id} not found")))?;

    if !owned {
        return Err(AppError::Forbidden(format!(
            "truck {truck_id} belongs to another owner"
        )));
    }

    let earning = TruckEarning {
        id: Uuid::new_v4(),
        truck_id,
        amount,
        recorded_at: Utc::now(),
    };

    state.truck_earnings.insert(earning.id, earning.clone());
    Ok(earning)
}

pub fn summary(state: &AppState, actor: &Actor) -> Result<FleetSummary, AppError> {
    let trucks = list_trucks(state, actor)?;

    let mut per_truck = Vec::with_capacity(trucks.len());
    let mut total_earnings = 0.0;

    for truck in &trucks {
        let total: f64 = state
            .truck_earnings
            .iter()
            .filter(|entry| entry.value().truck_id == truck.id)
            .map(|entry| entry.value().amount)
            .sum();

        total_earnings += total;
        per_truck.push(TruckEarningsSummary {
            truck_id: truck.id,
            truck_number: truck.truck_number.clone(),
            total,
        });
    }

    per_truck.sort_by(|a, b| b.total.total_cmp(&a.total));

    Ok(FleetSummary {
        truck_count: trucks.len(),
        total_earnings,
        per_truck,
    })
}

fn owner_id(actor: &Actor) -> Result<Uuid, AppError> {
    match actor {
        Actor::Owner(owner) => Ok(owner.id),
        Actor::Customer(_) | Actor::Driver(_) => Err(AppError::InvalidRole(
            "only owners manage trucks".to_string(),
        )),
    }
}
