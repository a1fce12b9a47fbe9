//! Lifecycle of one live WebSocket subscriber.

use axum::extract::ws::{Message, WebSocket};
use tracing::{debug, warn};

use crate::domain::OwnerId;
use crate::realtime::hub::{ConnectionHandle, NotificationHub, SubscriptionEvent};

/// Serves an upgraded connection for `owner` until either side goes away.
///
/// 1. Registers a fresh [`ConnectionHandle`] with the hub
/// 2. Forwards each notification as a JSON text frame
/// 3. Treats any inbound read error or close frame as a disconnect
/// 4. Unregisters (guarded by connection id) on the way out
///
/// Inbound data frames are ignored; the channel carries no client protocol
/// beyond liveness. A connection replaced by a newer one for the same owner
/// stays open but receives nothing further.
pub async fn run_session(
    mut socket: WebSocket,
    owner: OwnerId,
    hub: NotificationHub,
    outbox_capacity: usize,
) {
    let (handle, mut subscription) = ConnectionHandle::new(outbox_capacity);
    let id = handle.id();
    let mut attached = true;

    hub.register(owner, handle).await;

    loop {
        tokio::select! {
            inbound = socket.recv() => match inbound {
                Some(Ok(Message::Close(_))) | None => {
                    debug!(owner, connection = %id, "Client closed live connection");
                    break;
                }
                Some(Err(e)) => {
                    debug!(owner, connection = %id, "Live connection read error: {}", e);
                    break;
                }
                Some(Ok(_)) => {}
            },
            event = subscription.next(), if attached => match event {
                SubscriptionEvent::Notify(notification) => {
                    let payload = match serde_json::to_string(&notification) {
                        Ok(payload) => payload,
                        Err(e) => {
                            warn!("Failed to encode notification: {}", e);
                            continue;
                        }
                    };

                    if let Err(e) = socket.send(Message::Text(payload.into())).await {
                        debug!(owner, connection = %id, "Live connection write error: {}", e);
                        break;
                    }
                }
                SubscriptionEvent::Closed => {
                    debug!(owner, connection = %id, "Subscriber removed by hub");
                    let _ = socket.send(Message::Close(None)).await;
                    return;
                }
                SubscriptionEvent::Detached => {
                    debug!(owner, connection = %id, "Subscriber replaced by a newer connection");
                    attached = false;
                }
            },
        }
    }

    hub.unregister(owner, id).await;
}
