//! Per-connection notification stream backing one open push channel.

use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;
use uuid::Uuid;

use clearport_entity::notification::Notification;

use crate::bus::EventBus;

/// A live stream of notifications for one recipient.
///
/// One instance exists per open push connection. Closing (explicitly or by
/// drop) detaches the underlying bus listener exactly once; a second close
/// is a no-op.
#[derive(Debug)]
pub struct NotificationStream {
    bus: Arc<EventBus>,
    recipient_id: Uuid,
    listener_id: u64,
    rx: mpsc::Receiver<Notification>,
    closed: AtomicBool,
}

impl NotificationStream {
    pub(crate) fn new(
        bus: Arc<EventBus>,
        recipient_id: Uuid,
        listener_id: u64,
        rx: mpsc::Receiver<Notification>,
    ) -> Self {
        Self {
            bus,
            recipient_id,
            listener_id,
            rx,
            closed: AtomicBool::new(false),
        }
    }

    /// The recipient this stream is scoped to.
    pub fn recipient_id(&self) -> Uuid {
        self.recipient_id
    }

    /// Detach from the bus. Idempotent.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.bus.unsubscribe(self.recipient_id, self.listener_id);
        }
    }
}

impl Stream for NotificationStream {
    type Item = Notification;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.closed.load(Ordering::SeqCst) {
            return Poll::Ready(None);
        }
        self.get_mut().rx.poll_recv(cx)
    }
}

impl Drop for NotificationStream {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use clearport_entity::notification::NotificationEntityType;
    use futures::StreamExt;

    fn notification(recipient_id: Uuid) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            recipient_id,
            sender_id: Uuid::new_v4(),
            title: "Payment Completed".into(),
            message: "receipt attached".into(),
            entity_type: NotificationEntityType::Payment,
            entity_id: Uuid::new_v4(),
            shipment_id: None,
            is_read: false,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let bus = Arc::new(EventBus::new(8));
        let recipient = Uuid::new_v4();
        let stream = bus.subscribe(recipient);

        stream.close();
        stream.close();
        assert_eq!(bus.listener_count(recipient), 0);
    }

    #[tokio::test]
    async fn test_closed_stream_yields_end() {
        let bus = Arc::new(EventBus::new(8));
        let recipient = Uuid::new_v4();
        let mut stream = bus.subscribe(recipient);

        bus.publish(&notification(recipient));
        stream.close();

        assert!(stream.next().await.is_none());
    }
}
