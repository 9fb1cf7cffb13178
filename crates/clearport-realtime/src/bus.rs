//! Process-wide event bus keyed by recipient id.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

use clearport_entity::notification::Notification;

use crate::stream::NotificationStream;

/// A single attached listener for one recipient.
#[derive(Debug)]
struct Listener {
    id: u64,
    tx: mpsc::Sender<Notification>,
}

/// In-process publish/subscribe relay for freshly persisted notifications.
///
/// Publishing is fire-and-forget and at-most-once per attached listener:
/// there is no queue and no replay. A recipient with zero listeners is the
/// normal offline state; the notifications table covers them via polling.
#[derive(Debug)]
pub struct EventBus {
    /// Recipient id → attached listeners (one per open push channel).
    listeners: DashMap<Uuid, Vec<Listener>>,
    /// Buffered events per listener before publish starts dropping.
    buffer_size: usize,
    /// Monotonic listener id source.
    next_listener_id: AtomicU64,
}

impl EventBus {
    /// Create a new event bus.
    pub fn new(buffer_size: usize) -> Self {
        Self {
            listeners: DashMap::new(),
            buffer_size,
            next_listener_id: AtomicU64::new(1),
        }
    }

    /// Attach a listener for one recipient.
    ///
    /// Multiple concurrent listeners per recipient are allowed (multi-tab).
    /// Dropping or closing the returned stream detaches the listener.
    pub fn subscribe(self: &Arc<Self>, recipient_id: Uuid) -> NotificationStream {
        let (tx, rx) = mpsc::channel(self.buffer_size);
        let listener_id = self.next_listener_id.fetch_add(1, Ordering::Relaxed);

        self.listeners
            .entry(recipient_id)
            .or_default()
            .push(Listener {
                id: listener_id,
                tx,
            });

        debug!(
            recipient_id = %recipient_id,
            listener_id,
            "Event bus listener attached"
        );

        NotificationStream::new(Arc::clone(self), recipient_id, listener_id, rx)
    }

    /// Detach a listener. Safe to call for an already-detached listener.
    pub(crate) fn unsubscribe(&self, recipient_id: Uuid, listener_id: u64) {
        if let Some(mut entry) = self.listeners.get_mut(&recipient_id) {
            entry.retain(|l| l.id != listener_id);
            let now_empty = entry.is_empty();
            drop(entry);
            if now_empty {
                self.listeners.remove_if(&recipient_id, |_, v| v.is_empty());
            }
        }
        debug!(
            recipient_id = %recipient_id,
            listener_id,
            "Event bus listener detached"
        );
    }

    /// Forward a just-persisted notification to every attached listener of
    /// its recipient.
    ///
    /// Never blocks and never errors: a listener with a full buffer misses
    /// this event (it remains durable in the store), and a closed listener
    /// is pruned.
    pub fn publish(&self, notification: &Notification) {
        let Some(mut entry) = self.listeners.get_mut(&notification.recipient_id) else {
            return;
        };

        entry.retain(|listener| match listener.tx.try_send(notification.clone()) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(
                    recipient_id = %notification.recipient_id,
                    listener_id = listener.id,
                    "Listener buffer full, dropping push event"
                );
                true
            }
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        });
    }

    /// Number of listeners currently attached for a recipient.
    pub fn listener_count(&self, recipient_id: Uuid) -> usize {
        self.listeners
            .get(&recipient_id)
            .map(|entry| entry.len())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use clearport_entity::notification::NotificationEntityType;
    use futures::StreamExt;

    fn notification(recipient_id: Uuid, message: &str) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            recipient_id,
            sender_id: Uuid::new_v4(),
            title: "Shipment Update".into(),
            message: message.into(),
            entity_type: NotificationEntityType::Shipment,
            entity_id: Uuid::new_v4(),
            shipment_id: None,
            is_read: false,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_publish_without_listeners_is_a_noop() {
        let bus = Arc::new(EventBus::new(8));
        // Must neither panic nor block.
        bus.publish(&notification(Uuid::new_v4(), "nobody home"));
    }

    #[tokio::test]
    async fn test_subscriber_receives_published_event() {
        let bus = Arc::new(EventBus::new(8));
        let recipient = Uuid::new_v4();
        let mut stream = bus.subscribe(recipient);

        bus.publish(&notification(recipient, "arrived at port"));

        let received = stream.next().await.expect("event");
        assert_eq!(received.message, "arrived at port");
        assert_eq!(received.recipient_id, recipient);
    }

    #[tokio::test]
    async fn test_events_are_scoped_to_recipient() {
        let bus = Arc::new(EventBus::new(8));
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let mut stream_a = bus.subscribe(a);
        let _stream_b = bus.subscribe(b);

        bus.publish(&notification(b, "for b only"));
        bus.publish(&notification(a, "for a"));

        let received = stream_a.next().await.expect("event");
        assert_eq!(received.message, "for a");
    }

    #[tokio::test]
    async fn test_multiple_listeners_per_recipient() {
        let bus = Arc::new(EventBus::new(8));
        let recipient = Uuid::new_v4();
        let mut tab_one = bus.subscribe(recipient);
        let mut tab_two = bus.subscribe(recipient);
        assert_eq!(bus.listener_count(recipient), 2);

        bus.publish(&notification(recipient, "fan out"));

        assert_eq!(tab_one.next().await.expect("event").message, "fan out");
        assert_eq!(tab_two.next().await.expect("event").message, "fan out");
    }

    #[tokio::test]
    async fn test_full_buffer_drops_event_without_blocking() {
        let bus = Arc::new(EventBus::new(1));
        let recipient = Uuid::new_v4();
        let mut stream = bus.subscribe(recipient);

        bus.publish(&notification(recipient, "first"));
        bus.publish(&notification(recipient, "second"));

        assert_eq!(stream.next().await.expect("event").message, "first");
        // The second event was dropped but the listener stays attached.
        assert_eq!(bus.listener_count(recipient), 1);
    }

    #[tokio::test]
    async fn test_drop_detaches_listener() {
        let bus = Arc::new(EventBus::new(8));
        let recipient = Uuid::new_v4();
        let stream = bus.subscribe(recipient);
        assert_eq!(bus.listener_count(recipient), 1);

        drop(stream);
        assert_eq!(bus.listener_count(recipient), 0);

        // Publishing after detach stays a no-op.
        bus.publish(&notification(recipient, "late"));
    }
}
