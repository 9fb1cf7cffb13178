//! Live notification stream over server-sent events.
//!
//! One subscription per open connection; a user with several tabs holds
//! several independent subscriptions. Clients reconcile against
//! `GET /api/notifications` after reconnecting, since events produced
//! while disconnected are not replayed.

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::{Stream, StreamExt};
use serde::Serialize;
use tracing::warn;

use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/events
pub async fn subscribe(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = encode_events(state.bus.subscribe(auth.user_id));

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(state.config.realtime.keep_alive_seconds))
            .text("keep-alive"),
    )
}

/// Encodes bus items as `notification` SSE events.
///
/// An item that fails to serialize ends the stream; the connection
/// closes and the client falls back to its reconnect path instead of
/// silently missing a frame.
fn encode_events<S, T>(inner: S) -> impl Stream<Item = Result<Event, Infallible>>
where
    S: Stream<Item = T>,
    T: Serialize,
{
    inner.scan((), |_, item| {
        let next = match Event::default().event("notification").json_data(&item) {
            Ok(event) => Some(Ok(event)),
            Err(e) => {
                warn!(error = %e, "Failed to encode push event, closing stream");
                None
            }
        };
        futures::future::ready(next)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serializer;

    enum Frame {
        Text(&'static str),
        Unencodable,
    }

    impl Serialize for Frame {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self {
                Frame::Text(s) => serializer.serialize_str(s),
                Frame::Unencodable => Err(serde::ser::Error::custom("unencodable frame")),
            }
        }
    }

    #[tokio::test]
    async fn test_stream_ends_on_encoding_fault() {
        let source = futures::stream::iter(vec![
            Frame::Text("first"),
            Frame::Unencodable,
            Frame::Text("never delivered"),
        ]);
        let mut events = Box::pin(encode_events(source));

        assert!(events.next().await.is_some());
        assert!(events.next().await.is_none(), "stream must close on fault");
        assert!(events.next().await.is_none());
    }

    #[tokio::test]
    async fn test_all_frames_delivered_when_encodable() {
        let source = futures::stream::iter(vec![Frame::Text("a"), Frame::Text("b")]);
        let events: Vec<_> = Box::pin(encode_events(source)).collect().await;
        assert_eq!(events.len(), 2);
    }
}
