use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Role {
    Customer,
    Driver,
    Owner,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverDetails {
    pub driving_license: String,
    pub vehicle_number: String,
    pub vehicle_capacity: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerDetails {
    pub company_name: String,
    pub gst_number: String,
    pub truck_count: u32,
    pub company_address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub full_name: String,
    pub role: Role,
    pub phone: String,
    #[serde(flatten)]
    pub driver: Option<DriverDetails>,
    #[serde(flatten)]
    pub owner: Option<OwnerDetails>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerRecord {
    pub id: Uuid,
    pub owner_name: String,
    pub company_name: Option<String>,
    pub phone: Option<String>,
    pub total_trucks: Option<u32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OwnerProfile {
    pub id: Uuid,
    pub role: Role,
    pub owner_name: String,
    pub company_name: Option<String>,
    pub phone: Option<String>,
    pub total_trucks: u32,
}

impl OwnerProfile {
    pub fn from_record(record: &OwnerRecord) -> Self {
        Self {
            id: record.id,
            role: Role::Owner,
            owner_name: record.owner_name.clone(),
            company_name: record.company_name.clone(),
            phone: record.phone.clone(),
            total_trucks: record.total_trucks.unwrap_or(0),
        }
    }

    pub fn from_profile(profile: &Profile) -> Self {
        let details = profile.owner.as_ref();
        Self {
            id: profile.id,
            role: Role::Owner,
            owner_name: profile.full_name.clone(),
            company_name: details.map(|d| d.company_name.clone()),
            phone: Some(profile.phone.clone()),
            total_trucks: details.map(|d| d.truck_count).unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Actor {
    Customer(Profile),
    Driver(Profile),
    Owner(OwnerProfile),
}

impl Actor {
    pub fn id(&self) -> Uuid {
        match self {
            Actor::Customer(profile) | Actor::Driver(profile) => profile.id,
            Actor::Owner(owner) => owner.id,
        }
    }
}
