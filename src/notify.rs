use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing::warn;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Bookings,
    DriverLocations,
    Trucks,
}

impl Table {
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Bookings => "bookings",
            Table::DriverLocations => "driver_locations",
            Table::Trucks => "trucks",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeOp {
    Insert,
    Update,
    Delete,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub table: Table,
    pub op: ChangeOp,
    pub row_id: Uuid,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedSignal {
    Change(ChangeEvent),
    Resync,
}

pub struct ChangeNotifier {
    tx: broadcast::Sender<ChangeEvent>,
}

impl ChangeNotifier {
    pub fn new(buffer: usize) -> Self {
        let (tx, _unused_rx) = broadcast::channel(buffer);
        Self { tx }
    }

    pub fn publish(&self, table: Table, op: ChangeOp, row_id: Uuid) {
        let event = ChangeEvent {
            table,
            op,
            row_id,
            occurred_at: Utc::now(),
        };
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self, table: Option<Table>) -> ChangeFeed {
        ChangeFeed {
            rx: self.tx.subscribe(),
            table,
        }
    }
}

pub struct ChangeFeed {
    rx: broadcast::Receiver<ChangeEvent>,
    table: Option<Table>,
}

impl ChangeFeed {
    pub async fn next(&mut self) -> Option<FeedSignal> {
        loop {
            match self.rx.recv().await {
                Ok(event) => {
                    if self.table.map_or(true, |table| table == event.table) {
                        return Some(FeedSignal::Change(event));
                    }
                }
                Err(RecvError::Lagged(missed)) => {
                    warn!(missed, "change feed lagged; subscriber must resync");
                    return Some(FeedSignal::Resync);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}
