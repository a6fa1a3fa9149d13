use dashmap::DashMap;
use uuid::Uuid;

use crate::config::Config;
use crate::geo::Geocoder;
use crate::models::booking::Booking;
use crate::models::location::DriverLocation;
use crate::models::profile::{OwnerRecord, Profile};
use crate::models::truck::{Truck, TruckEarning};
use crate::notify::{ChangeNotifier, ChangeOp, Table};
use crate::observability::metrics::Metrics;

pub struct AppState {
    pub config: Config,
    pub profiles: DashMap<Uuid, Profile>,
    pub owners: DashMap<Uuid, OwnerRecord>,
    pub bookings: DashMap<Uuid, Booking>,
    pub locations: DashMap<Uuid, DriverLocation>,
    pub trucks: DashMap<Uuid, Truck>,
    pub truck_earnings: DashMap<Uuid, TruckEarning>,
    pub notifier: ChangeNotifier,
    pub geocoder: Geocoder,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let notifier = ChangeNotifier::new(config.event_buffer_size);
        let geocoder = Geocoder::new(config.geocoder_base_url.clone(), config.geocoder_timeout_ms);

        Self {
            config,
            profiles: DashMap::new(),
            owners: DashMap::new(),
            bookings: DashMap::new(),
            locations: DashMap::new(),
            trucks: DashMap::new(),
            truck_earnings: DashMap::new(),
            notifier,
            geocoder,
            metrics: Metrics::new(),
        }
    }

    pub fn publish(&self, table: Table, op: ChangeOp, row_id: Uuid) {
        self.metrics
            .change_events_total
            .with_label_values(&[table.as_str()])
            .inc();
        self.notifier.publish(table, op, row_id);
    }
}
