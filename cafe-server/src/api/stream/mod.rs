//! Real-time event stream (WebSocket)
//!
//! Subscribers connect over a persistent channel and receive lifecycle
//! events as JSON text frames. Delivery is at-most-once: events
//! published while a subscriber is disconnected are gone, and the
//! subscriber re-pulls authoritative state (pending count, order
//! status) over the query API after reconnecting.
//!
//! `?room=admin` / `?room=order:{id}` narrows what a connection
//! receives; without the param it gets the unscoped broadcast.

use axum::{
    Router,
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
    routing::get,
};
use serde::Deserialize;
use shared::message::Room;
use tokio::sync::broadcast::error::RecvError;

use crate::core::ServerState;
use crate::message::Notifier;

/// Stream router
pub fn router() -> Router<ServerState> {
    Router::new().route("/api/stream", get(stream))
}

#[derive(Debug, Deserialize)]
pub struct StreamQuery {
    pub room: Option<String>,
}

fn parse_room(raw: Option<&str>) -> Room {
    match raw {
        Some("admin") => Room::Admin,
        Some(s) if s.starts_with("order:") => Room::Order(s.to_string()),
        _ => Room::All,
    }
}

async fn stream(
    State(state): State<ServerState>,
    Query(query): Query<StreamQuery>,
    ws: WebSocketUpgrade,
) -> Response {
    let interest = parse_room(query.room.as_deref());
    let notifier = state.notifier.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, notifier, interest))
}

async fn handle_socket(mut socket: WebSocket, notifier: Notifier, interest: Room) {
    let mut rx = notifier.subscribe();
    let shutdown = notifier.shutdown_token().clone();

    tracing::debug!(room = %interest, "Stream subscriber connected");

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,

            // Drain client frames; any close/error ends the session
            incoming = socket.recv() => {
                match incoming {
                    None | Some(Err(_)) => break,
                    Some(Ok(Message::Close(_))) => break,
                    Some(Ok(_)) => {}
                }
            }

            event = rx.recv() => {
                match event {
                    Ok(event) if event.room.matches(&interest) => {
                        let Ok(text) = serde_json::to_string(&event) else {
                            continue;
                        };
                        if socket.send(Message::Text(text.into())).await.is_err() {
                            break;
                        }
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(missed)) => {
                        // Subscriber fell behind; it must reconcile by
                        // re-querying authoritative state
                        tracing::warn!(missed, "Stream subscriber lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::debug!(room = %interest, "Stream subscriber disconnected");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_param_parsing() {
        assert_eq!(parse_room(None), Room::All);
        assert_eq!(parse_room(Some("admin")), Room::Admin);
        assert_eq!(
            parse_room(Some("order:abc")),
            Room::Order("order:abc".to_string())
        );
        assert_eq!(parse_room(Some("bogus")), Room::All);
    }
}
