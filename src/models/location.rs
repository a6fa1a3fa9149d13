use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverLocation {
    pub driver_id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DriverPosition {
    #[serde(flatten)]
    pub location: DriverLocation,
    pub driver_name: Option<String>,
    pub driver_phone: Option<String>,
    pub stale: bool,
}
