//! Process-wide registry of live subscribers.
//!
//! The registry map is owned by a single [`HubLoop`] task. Every register,
//! unregister and delivery attempt travels through one bounded command
//! channel, so registry operations and sends are strictly serialized and
//! linearizable. [`NotificationHub`] is the cheap, cloneable handle the rest of
//! the service talks to.
//!
//! Delivery is point-to-point and best-effort: a notification for an owner
//! with no live subscriber is dropped, and a subscriber whose outbox is
//! closed or full is removed from the registry.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::domain::OwnerId;
use crate::domain::notification::Notification;

/// Identity of one live connection.
///
/// Used to guard unregistration against a handle that has already been
/// replaced by a newer connection for the same owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Sending half of a live connection, owned by the hub once registered.
///
/// Not `Clone`. Dropping the handle (replacement by a newer connection)
/// detaches the connection without closing it; [`ConnectionHandle::close`]
/// (removal from the registry) asks the connection to shut down.
#[derive(Debug)]
pub struct ConnectionHandle {
    id: ConnectionId,
    outbox: mpsc::Sender<Notification>,
    close: oneshot::Sender<()>,
}

impl ConnectionHandle {
    /// Creates a handle and the [`Subscription`] the connection drains.
    ///
    /// `capacity` bounds the number of undelivered notifications; a full
    /// outbox is treated as a dead subscriber.
    pub fn new(capacity: usize) -> (Self, Subscription) {
        let (outbox, notifications) = mpsc::channel(capacity.max(1));
        let (close, closed) = oneshot::channel();
        (
            Self {
                id: ConnectionId::next(),
                outbox,
                close,
            },
            Subscription {
                notifications,
                closed,
            },
        )
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    fn try_deliver(&self, notification: Notification) -> Result<(), DeliveryFailure> {
        self.outbox.try_send(notification).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => DeliveryFailure::OutboxFull,
            mpsc::error::TrySendError::Closed(_) => DeliveryFailure::Disconnected,
        })
    }

    fn close(self) {
        let _ = self.close.send(());
    }
}

/// What a connection observes from the hub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionEvent {
    /// A notification to forward to the client.
    Notify(Notification),
    /// The hub removed this connection; it should close.
    Closed,
    /// A newer connection replaced this one; nothing more will arrive.
    Detached,
}

/// Receiving half of a live connection.
#[derive(Debug)]
pub struct Subscription {
    notifications: mpsc::Receiver<Notification>,
    closed: oneshot::Receiver<()>,
}

impl Subscription {
    /// Waits for the next event.
    ///
    /// Queued notifications are always yielded before `Closed` or `Detached`.
    /// Must not be called again after `Closed` or `Detached` was returned.
    pub async fn next(&mut self) -> SubscriptionEvent {
        tokio::select! {
            biased;
            Some(notification) = self.notifications.recv() => SubscriptionEvent::Notify(notification),
            closed = &mut self.closed => match closed {
                Ok(()) => SubscriptionEvent::Closed,
                Err(_) => SubscriptionEvent::Detached,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeliveryFailure {
    OutboxFull,
    Disconnected,
}

/// Outcome of a single broadcast.
///
/// Informational only; a failed delivery is never an error for the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Handed to the owner's connection.
    Delivered,
    /// The owner has no live subscriber.
    NoSubscriber,
    /// The send failed and the subscriber was removed.
    SubscriberDropped,
    /// The hub loop is no longer running.
    HubStopped,
}

enum HubCommand {
    Register {
        owner: OwnerId,
        handle: ConnectionHandle,
        done: oneshot::Sender<()>,
    },
    Unregister {
        owner: OwnerId,
        id: ConnectionId,
        done: oneshot::Sender<bool>,
    },
    Broadcast {
        owner: OwnerId,
        notification: Notification,
        done: oneshot::Sender<Delivery>,
    },
    Count {
        done: oneshot::Sender<usize>,
    },
}

/// Handle to the process-wide notification hub.
///
/// Construct once at startup and pass clones to every component that needs
/// to register, unregister or broadcast.
#[derive(Clone)]
pub struct NotificationHub {
    commands: mpsc::Sender<HubCommand>,
}

impl NotificationHub {
    /// Creates a hub handle and the loop that owns the registry.
    ///
    /// The loop must be driven (usually via `tokio::spawn(hub_loop.run())`)
    /// for any command to complete.
    pub fn new(command_capacity: usize) -> (Self, HubLoop) {
        let (commands, rx) = mpsc::channel(command_capacity.max(1));
        (
            Self { commands },
            HubLoop {
                rx,
                subscribers: HashMap::new(),
            },
        )
    }

    /// Creates a hub and spawns its loop on the current Tokio runtime.
    pub fn spawn(command_capacity: usize) -> Self {
        let (hub, hub_loop) = Self::new(command_capacity);
        tokio::spawn(hub_loop.run());
        hub
    }

    /// Registers `handle` as the live connection for `owner`.
    ///
    /// Replaces any existing entry for the same owner. The replaced
    /// connection is detached, not closed.
    pub async fn register(&self, owner: OwnerId, handle: ConnectionHandle) {
        let (done, ack) = oneshot::channel();
        let cmd = HubCommand::Register {
            owner,
            handle,
            done,
        };

        if self.commands.send(cmd).await.is_err() {
            warn!(owner, "Hub stopped; registration ignored");
            return;
        }
        let _ = ack.await;
    }

    /// Removes the entry for `owner` only if it still belongs to `id`.
    ///
    /// Returns `true` if an entry was removed. The removed connection is
    /// asked to close.
    pub async fn unregister(&self, owner: OwnerId, id: ConnectionId) -> bool {
        let (done, ack) = oneshot::channel();
        let cmd = HubCommand::Unregister { owner, id, done };

        if self.commands.send(cmd).await.is_err() {
            return false;
        }
        ack.await.unwrap_or(false)
    }

    /// Sends `{link_id, count}` to the owner's live connection, if any.
    ///
    /// Never fails: an absent owner is a no-op and a failed send removes the
    /// subscriber.
    pub async fn broadcast(&self, owner: OwnerId, link_id: &str, count: i64) -> Delivery {
        let (done, ack) = oneshot::channel();
        let cmd = HubCommand::Broadcast {
            owner,
            notification: Notification::new(link_id, count),
            done,
        };

        if self.commands.send(cmd).await.is_err() {
            debug!(owner, link_id, "Hub stopped; notification dropped");
            return Delivery::HubStopped;
        }
        ack.await.unwrap_or(Delivery::HubStopped)
    }

    /// Returns the number of live subscribers, or `None` if the hub stopped.
    pub async fn subscriber_count(&self) -> Option<usize> {
        let (done, ack) = oneshot::channel();

        self.commands.send(HubCommand::Count { done }).await.ok()?;
        ack.await.ok()
    }

    /// Returns true while the hub loop is accepting commands.
    pub fn is_running(&self) -> bool {
        !self.commands.is_closed()
    }
}

/// Single owner of the subscriber registry.
pub struct HubLoop {
    rx: mpsc::Receiver<HubCommand>,
    subscribers: HashMap<OwnerId, ConnectionHandle>,
}

impl HubLoop {
    /// Processes commands until every [`NotificationHub`] handle is dropped.
    pub async fn run(mut self) {
        info!("Notification hub started");

        while let Some(cmd) = self.rx.recv().await {
            match cmd {
                HubCommand::Register {
                    owner,
                    handle,
                    done,
                } => {
                    self.register(owner, handle);
                    let _ = done.send(());
                }
                HubCommand::Unregister { owner, id, done } => {
                    let _ = done.send(self.unregister(owner, id));
                }
                HubCommand::Broadcast {
                    owner,
                    notification,
                    done,
                } => {
                    let _ = done.send(self.broadcast(owner, notification));
                }
                HubCommand::Count { done } => {
                    let _ = done.send(self.subscribers.len());
                }
            }
        }

        info!("Notification hub stopped");
    }

    fn register(&mut self, owner: OwnerId, handle: ConnectionHandle) {
        let id = handle.id();
        match self.subscribers.insert(owner, handle) {
            Some(previous) => info!(
                owner,
                connection = %id,
                replaced = %previous.id(),
                "Subscriber replaced"
            ),
            None => info!(owner, connection = %id, "Subscriber registered"),
        }
    }

    fn unregister(&mut self, owner: OwnerId, id: ConnectionId) -> bool {
        match self.subscribers.get(&owner) {
            Some(current) if current.id() == id => {
                if let Some(handle) = self.subscribers.remove(&owner) {
                    handle.close();
                }
                info!(owner, connection = %id, "Subscriber unregistered");
                true
            }
            Some(current) => {
                debug!(
                    owner,
                    stale = %id,
                    current = %current.id(),
                    "Ignoring unregister for replaced connection"
                );
                false
            }
            None => false,
        }
    }

    fn broadcast(&mut self, owner: OwnerId, notification: Notification) -> Delivery {
        let Some(handle) = self.subscribers.get(&owner) else {
            debug!(owner, link_id = %notification.link_id, "No live subscriber");
            return Delivery::NoSubscriber;
        };

        match handle.try_deliver(notification) {
            Ok(()) => {
                metrics::counter!("linkpulse_notifications_delivered_total").increment(1);
                Delivery::Delivered
            }
            Err(failure) => {
                let id = handle.id();
                warn!(owner, connection = %id, ?failure, "Send failed; dropping subscriber");
                self.unregister(owner, id);
                metrics::counter!("linkpulse_subscribers_dropped_total").increment(1);
                Delivery::SubscriberDropped
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_register_then_broadcast_delivers_once() {
        let hub = NotificationHub::spawn(16);
        let (handle, mut sub) = ConnectionHandle::new(4);

        hub.register(1, handle).await;
        let delivery = hub.broadcast(1, "abc12345", 3).await;

        assert_eq!(delivery, Delivery::Delivered);
        assert_eq!(
            sub.next().await,
            SubscriptionEvent::Notify(Notification::new("abc12345", 3))
        );
        assert!(sub.notifications.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_broadcast_without_subscriber_is_noop() {
        let hub = NotificationHub::spawn(16);

        assert_eq!(hub.broadcast(42, "abc12345", 1).await, Delivery::NoSubscriber);
        assert_eq!(hub.subscriber_count().await, Some(0));
    }

    #[tokio::test]
    async fn test_connection_ids_are_unique() {
        let (a, _sub_a) = ConnectionHandle::new(1);
        let (b, _sub_b) = ConnectionHandle::new(1);

        assert_ne!(a.id(), b.id());
    }

    #[tokio::test]
    async fn test_unregister_closes_connection() {
        let hub = NotificationHub::spawn(16);
        let (handle, mut sub) = ConnectionHandle::new(4);
        let id = handle.id();

        hub.register(1, handle).await;
        assert!(hub.unregister(1, id).await);

        assert_eq!(sub.next().await, SubscriptionEvent::Closed);
    }

    #[tokio::test]
    async fn test_replacement_detaches_without_closing() {
        let hub = NotificationHub::spawn(16);
        let (first, mut first_sub) = ConnectionHandle::new(4);
        let (second, _second_sub) = ConnectionHandle::new(4);

        hub.register(1, first).await;
        hub.register(1, second).await;

        assert_eq!(first_sub.next().await, SubscriptionEvent::Detached);
        assert_eq!(hub.subscriber_count().await, Some(1));
    }

    #[tokio::test]
    async fn test_full_outbox_drops_subscriber() {
        let hub = NotificationHub::spawn(16);
        let (handle, mut sub) = ConnectionHandle::new(1);

        hub.register(5, handle).await;
        assert_eq!(hub.broadcast(5, "abc12345", 1).await, Delivery::Delivered);
        assert_eq!(
            hub.broadcast(5, "abc12345", 2).await,
            Delivery::SubscriberDropped
        );
        assert_eq!(hub.subscriber_count().await, Some(0));

        assert_eq!(
            sub.next().await,
            SubscriptionEvent::Notify(Notification::new("abc12345", 1))
        );
        assert_eq!(sub.next().await, SubscriptionEvent::Closed);
    }

    #[tokio::test]
    async fn test_stopped_hub_reports_stopped() {
        let (hub, hub_loop) = NotificationHub::new(4);
        drop(hub_loop);

        assert!(!hub.is_running());
        assert_eq!(hub.broadcast(1, "abc12345", 1).await, Delivery::HubStopped);
        assert_eq!(hub.subscriber_count().await, None);
    }
}
