use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BookingStatus {
    Pending,
    Accepted,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub driver_id: Option<Uuid>,
    pub from_city: String,
    pub to_city: String,
    pub load: String,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn assignment_consistent(&self) -> bool {
        match self.status {
            BookingStatus::Pending => self.driver_id.is_none(),
            BookingStatus::Accepted | BookingStatus::Completed => self.driver_id.is_some(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingDetails {
    #[serde(flatten)]
    pub booking: Booking,
    pub customer_full_name: Option<String>,
    pub customer_contact: Option<String>,
    pub driver_full_name: Option<String>,
    pub driver_contact: Option<String>,
    pub license_number: Option<String>,
    pub vehicle_number: Option<String>,
    pub vehicle_capacity: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CityCount {
    pub city: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingStats {
    pub total: usize,
    pub pending: usize,
    pub accepted: usize,
    pub completed: usize,
    pub top_cities: Vec<CityCount>,
}
