use chrono::Utc;
use dashmap::mapref::entry::Entry;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::profile::{
    Actor, DriverDetails, OwnerDetails, OwnerProfile, OwnerRecord, Profile, Role,
};
use crate::state::AppState;

lazy_static! {
    // Indian driving license format: state code, RTO code, issue year,
    // seven-digit serial.
    static ref LICENSE_PATTERN: Regex =
        Regex::new("^[A-Z]{2}[0-9]{2}[0-9]{4}[0-9]{7}$").expect("valid license pattern");
}

pub fn resolve_actor(state: &AppState, user_id: Uuid) -> Result<Actor, AppError> {
    if let Some(profile) = state.profiles.get(&user_id) {
        let profile = profile.value().clone();
        return Ok(match profile.role {
            Role::Customer => Actor::Customer(profile),
            Role::Driver => Actor::Driver(profile),
            Role::Owner => Actor::Owner(OwnerProfile::from_profile(&profile)),
        });
    }

    if let Some(record) = state.owners.get(&user_id) {
        return Ok(Actor::Owner(OwnerProfile::from_record(record.value())));
    }

    Err(AppError::NotFound(format!(
        "no profile or owner record for user {user_id}"
    )))
}

#[derive(Debug, Deserialize)]
pub struct NewProfile {
    pub full_name: String,
    pub role: Role,
    pub phone: String,
    pub driving_license: Option<String>,
    pub vehicle_number: Option<String>,
    pub vehicle_capacity: Option<String>,
    pub company_name: Option<String>,
    pub gst_number: Option<String>,
    pub truck_count: Option<u32>,
    pub company_address: Option<String>,
}

pub fn register_profile(
    state: &AppState,
    user_id: Uuid,
    new: NewProfile,
) -> Result<Profile, AppError> {
    let full_name = non_empty(&new.full_name, "full_name")?;
    let phone = non_empty(&new.phone, "phone")?;

    let (driver, owner) = match new.role {
        Role::Customer => (None, None),
        Role::Driver => (Some(driver_details(&new)?), None),
        Role::Owner => (None, Some(owner_details(&new)?)),
    };

    let profile = Profile {
        id: user_id,
        full_name,
        role: new.role,
        phone,
        driver,
        owner,
        created_at: Utc::now(),
    };

    match state.profiles.entry(user_id) {
        Entry::Occupied(_) => Err(AppError::Conflict(format!(
            "profile {user_id} already exists"
        ))),
        Entry::Vacant(slot) => {
            slot.insert(profile.clone());
            info!(user_id = %user_id, role = ?profile.role, "profile registered");
            Ok(profile)
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ProfileChanges {
    pub full_name: Option<String>,
    pub phone: Option<String>,
}

pub fn update_profile(
    state: &AppState,
    user_id: Uuid,
    changes: ProfileChanges,
) -> Result<Profile, AppError> {
    let full_name = changes
        .full_name
        .map(|name| non_empty(&name, "full_name"))
        .transpose()?;
    let phone = changes
        .phone
        .map(|phone| non_empty(&phone, "phone"))
        .transpose()?;

    let mut profile = state
        .profiles
        .get_mut(&user_id)
        .ok_or_else(|| AppError::NotFound(format!("profile {user_id} not found")))?;

    if let Some(full_name) = full_name {
        profile.full_name = full_name;
    }
    if let Some(phone) = phone {
        profile.phone = phone;
    }

    Ok(profile.clone())
}

#[derive(Debug, Deserialize)]
pub struct NewOwnerRecord {
    pub id: Uuid,
    pub owner_name: String,
    pub company_name: Option<String>,
    pub phone: Option<String>,
    pub total_trucks: Option<u32>,
}

pub fn provision_owner(state: &AppState, new: NewOwnerRecord) -> Result<OwnerRecord, AppError> {
    let owner_name = non_empty(&new.owner_name, "owner_name")?;

    let record = OwnerRecord {
        id: new.id,
        owner_name,
        company_name: new.company_name,
        phone: new.phone,
        total_trucks: new.total_trucks,
        created_at: Utc::now(),
    };

    match state.owners.entry(record.id) {
        Entry::Occupied(_) => Err(AppError::Conflict(format!(
            "owner {} already exists",
            record.id
        ))),
        Entry::Vacant(slot) => {
            slot.insert(record.clone());
            info!(owner_id = %record.id, "owner record provisioned");
            Ok(record)
        }
    }
}

fn driver_details(new: &NewProfile) -> Result<DriverDetails, AppError> {
    let driving_license = required(&new.driving_license, "driving_license")?.to_uppercase();
    let vehicle_number = required(&new.vehicle_number, "vehicle_number")?.to_uppercase();
    let vehicle_capacity = required(&new.vehicle_capacity, "vehicle_capacity")?;

    if !LICENSE_PATTERN.is_match(&driving_license) {
        return Err(AppError::BadRequest(format!(
            "driving license {driving_license} is not valid"
        )));
    }

    Ok(DriverDetails {
        driving_license,
        vehicle_number,
        vehicle_capacity,
    })
}

fn owner_details(new: &NewProfile) -> Result<OwnerDetails, AppError> {
    let truck_count = new
        .truck_count
        .ok_or_else(|| AppError::BadRequest("truck_count is required".to_string()))?;

    Ok(OwnerDetails {
        company_name: required(&new.company_name, "company_name")?,
        gst_number: required(&new.gst_number, "gst_number")?.to_uppercase(),
        truck_count,
        company_address: required(&new.company_address, "company_address")?,
    })
}

fn non_empty(value: &str, field: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest(format!("{field} cannot be empty")));
    }
    Ok(trimmed.to_string())
}

fn required(value: &Option<String>, field: &str) -> Result<String, AppError> {
    match value {
        Some(value) => non_empty(value, field),
        None => Err(AppError::BadRequest(format!("{field} is required"))),
    }
}
