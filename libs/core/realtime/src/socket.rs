use axum::{
    Router,
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
    routing::get,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::broadcaster::Broadcaster;

/// Router serving the event stream on `GET /socket`.
pub fn socket_router(broadcaster: Broadcaster) -> Router {
    Router::new()
        .route("/socket", get(socket_handler))
        .with_state(broadcaster)
}

/// Upgrade to a WebSocket that receives every published event.
pub async fn socket_handler(
    ws: WebSocketUpgrade,
    State(broadcaster): State<Broadcaster>,
) -> Response {
    debug!("WebSocket connection requested");
    ws.on_upgrade(move |socket| handle_socket(socket, broadcaster))
}

async fn handle_socket(socket: WebSocket, broadcaster: Broadcaster) {
    info!("Client connected");

    let (mut sender, mut receiver) = socket.split();
    let mut events = broadcaster.subscribe();

    // Inbound frames carry no commands; read them only to notice disconnects.
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Close(_) => {
                    debug!("Client requested close");
                    break;
                }
                Message::Text(_) | Message::Binary(_) => {
                    debug!("Ignoring inbound message");
                }
                Message::Ping(_) | Message::Pong(_) => {}
            }
        }
    });

    let mut send_task = tokio::spawn(async move {
        loop {
            tokio::select! {
                () = broadcaster.closed() => {
                    let _ = sender.send(Message::Close(None)).await;
                    break;
                }
                event = events.recv() => match event {
                    Ok(message) => {
                        let text = match serde_json::to_string(&message) {
                            Ok(text) => text,
                            Err(e) => {
                                warn!(error = %e, "Failed to encode event");
                                continue;
                            }
                        };
                        if sender.send(Message::Text(text.into())).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Client lagging, skipped events");
                    }
                    Err(RecvError::Closed) => break,
                },
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => {
            recv_task.abort();
        },
        _ = (&mut recv_task) => {
            send_task.abort();
        },
    }

    info!("Client disconnected");
}
