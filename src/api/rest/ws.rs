use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use futures::SinkExt;
use futures::StreamExt;
use serde::Deserialize;
use tracing::{info, warn};

use crate::notify::Table;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct FeedParams {
    table: Option<Table>,
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<FeedParams>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, params.table))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, table: Option<Table>) {
    let (mut sender, mut receiver) = socket.split();
    let mut feed = state.notifier.subscribe(table);

    info!(table = ?table, "change feed client connected");

    let send_task = tokio::spawn(async move {
        while let Some(signal) = feed.next().await {
            let json = match serde_json::to_string(&signal) {
                Ok(json) => json,
                Err(err) => {
                    warn!(error = %err, "failed to serialize change signal");
                    continue;
                }
            };

            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    let recv_task = tokio::spawn(async move {
        while let Some(Ok(_msg)) = receiver.next().await {}
    });

    tokio::select! {
        _ = send_task => {},
        _ = recv_task => {},
    }

    info!("change feed client disconnected");
}
