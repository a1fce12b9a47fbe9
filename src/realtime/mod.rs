//! Real-time click notifications.
//!
//! - [`hub`] - The serialized owner → connection registry and delivery
//! - [`session`] - Glue between an upgraded WebSocket and the hub

pub mod hub;
pub mod session;

pub use hub::{
    ConnectionHandle, ConnectionId, Delivery, HubLoop, NotificationHub, Subscription,
    SubscriptionEvent,
};
pub use session::run_session;
