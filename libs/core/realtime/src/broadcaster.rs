use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tracing::{debug, warn};

use crate::config::RealtimeConfig;

/// One published event as delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BroadcastMessage {
    pub event: String,
    pub data: serde_json::Value,
}

/// Fan-out channel for change events.
///
/// Cloning is cheap; all clones publish into the same channel. After
/// [`Broadcaster::close`] publishing becomes a no-op and open sockets are
/// told to close.
///
/// ```ignore
/// let broadcaster = Broadcaster::new(&RealtimeConfig::default());
/// let mut rx = broadcaster.subscribe();
///
/// broadcaster.publish("products", &json!({ "action": "delete", "product": id }));
/// let message = rx.recv().await?;
/// ```
#[derive(Clone)]
pub struct Broadcaster {
    tx: broadcast::Sender<BroadcastMessage>,
    closed: Arc<watch::Sender<bool>>,
}

impl Broadcaster {
    pub fn new(config: &RealtimeConfig) -> Self {
        let (tx, _) = broadcast::channel(config.capacity.max(1));
        let (closed, _) = watch::channel(false);
        Self {
            tx,
            closed: Arc::new(closed),
        }
    }

    /// Publish `payload` under `event` to every current subscriber.
    ///
    /// Fire-and-forget: returns how many subscribers the event was queued
    /// for, which is zero when nobody listens, the payload cannot be
    /// serialized, or the broadcaster is closed.
    pub fn publish<T: Serialize + ?Sized>(&self, event: &str, payload: &T) -> usize {
        if self.is_closed() {
            debug!(event, "Broadcaster closed, dropping event");
            return 0;
        }

        let data = match serde_json::to_value(payload) {
            Ok(data) => data,
            Err(e) => {
                warn!(event, error = %e, "Failed to serialize broadcast payload");
                return 0;
            }
        };

        let message = BroadcastMessage {
            event: event.to_string(),
            data,
        };

        match self.tx.send(message) {
            Ok(receivers) => {
                debug!(event, receivers, "Event published");
                receivers
            }
            Err(_) => {
                debug!(event, "No subscribers for event");
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BroadcastMessage> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Stop accepting events and signal every socket to close.
    pub fn close(&self) {
        if !self.closed.send_replace(true) {
            debug!("Broadcaster closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }

    /// Completes once [`Broadcaster::close`] has been called.
    pub async fn closed(&self) {
        let mut rx = self.closed.subscribe();
        loop {
            let done = *rx.borrow_and_update();
            if done || rx.changed().await.is_err() {
                return;
            }
        }
    }
}
