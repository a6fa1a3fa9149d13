use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::time::{interval, Duration};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;
use crate::tracker::positions;

#[derive(Debug, Clone, Copy)]
pub struct PositionFix {
    pub latitude: f64,
    pub longitude: f64,
    pub recorded_at: DateTime<Utc>,
}

#[async_trait]
pub trait PositionSource: Send {
    async fn next_fix(&mut self) -> Option<Result<PositionFix, AppError>>;
}

pub async fn run_report_loop<S: PositionSource>(state: Arc<AppState>, driver_id: Uuid, source: S) {
    let period = Duration::from_secs(state.config.report_interval_secs);
    run_with_period(state, driver_id, source, period).await;
}

async fn run_with_period<S: PositionSource>(
    state: Arc<AppState>,
    driver_id: Uuid,
    mut source: S,
    period: Duration,
) {
    info!(driver_id = %driver_id, "location reporting started");

    let mut ticker = interval(period);

    loop {
        ticker.tick().await;

        match source.next_fix().await {
            Some(Ok(fix)) => {
                positions::report(&state, driver_id, fix.latitude, fix.longitude, fix.recorded_at);
            }
            Some(Err(err)) => {
                warn!(driver_id = %driver_id, error = %err, "position fix unavailable; skipping report");
            }
            None => break,
        }
    }

    info!(driver_id = %driver_id, "location reporting stopped: session ended");
}
