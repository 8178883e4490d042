//! WebSocket upgrade handler.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::Response;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use notify_core::error::AppError;

use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters for WebSocket authentication.
#[derive(Debug, Deserialize)]
pub struct WsQuery {
    /// JWT access token; the Authorization header is the alternative.
    pub token: Option<String>,
}

/// GET /ws — WebSocket upgrade.
///
/// The token comes from the `token` query parameter or a bearer header.
/// Without a token the connection is admitted anonymously only when
/// `gateway.allow_anonymous` is set; anonymous connections receive
/// broadcasts but cannot query or join a room.
pub async fn ws_handler(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
) -> Result<Response, ApiError> {
    let token = query
        .token
        .or_else(|| bearer.map(|TypedHeader(auth)| auth.token().to_string()));

    let user_id = match token {
        Some(token) => Some(state.verifier.verify(&token)?.user_id()),
        None if state.config.gateway.allow_anonymous => None,
        None => {
            return Err(AppError::authentication("Missing authentication token").into());
        }
    };

    Ok(ws.on_upgrade(move |socket| handle_socket(state, user_id, socket)))
}

/// Drives one established WebSocket connection.
async fn handle_socket(state: AppState, user_id: Option<Uuid>, socket: WebSocket) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    let (handle, mut outbound_rx) = state.gateway.register(user_id).await;
    let conn_id = handle.id;

    // Outbound: serialized server messages to the wire.
    let outbound_task = tokio::spawn(async move {
        while let Some(message) = outbound_rx.recv().await {
            let json = match serde_json::to_string(&message) {
                Ok(json) => json,
                Err(e) => {
                    warn!(conn_id = %conn_id, error = %e, "Failed to serialize outbound message");
                    continue;
                }
            };
            if ws_tx.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    // Inbound: every text frame goes through the gateway.
    while let Some(result) = ws_rx.next().await {
        match result {
            Ok(Message::Text(text)) => {
                state.gateway.handle_message(&handle, &text).await;
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(conn_id = %conn_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    outbound_task.abort();
    state.gateway.unregister(conn_id).await;
    info!(conn_id = %conn_id, "WebSocket connection closed");
}
