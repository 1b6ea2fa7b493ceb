//! Process-wide publish/subscribe channel with a WebSocket endpoint.
//!
//! A [`Broadcaster`] is created at startup, handed to whatever publishes
//! change events, and served to clients through [`socket_router`]. Every
//! published event reaches every connected socket as one JSON text frame:
//!
//! ```json
//! { "event": "products", "data": { "action": "create", "product": { ... } } }
//! ```
//!
//! Publishing never fails the caller; undeliverable events are dropped.

pub mod broadcaster;
pub mod config;
pub mod socket;

pub use broadcaster::{BroadcastMessage, Broadcaster};
pub use config::RealtimeConfig;
pub use socket::{socket_handler, socket_router};
