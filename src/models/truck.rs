use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TruckStatus {
    Available,
    Maintenance,
    Inactive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Truck {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub truck_number: String,
    pub model: String,
    pub capacity: Option<f64>,
    pub status: TruckStatus,
    pub driver_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TruckEarning {
    pub id: Uuid,
    pub truck_id: Uuid,
    pub amount: f64,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TruckEarningsSummary {
    pub truck_id: Uuid,
    pub truck_number: String,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FleetSummary {
    pub truck_count: usize,
    pub total_earnings: f64,
    pub per_truck: Vec<TruckEarningsSummary>,
}
