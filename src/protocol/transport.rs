//! Server-Sent Events framing for JSON-RPC messages.
//!
//! A session stream always opens with an `endpoint` event carrying the
//! path the client must POST its requests to, followed by one `message`
//! event per JSON-RPC response.

use crate::error::Result;
use crate::protocol::types::JsonRpcResponse;
use crate::session::{SessionEvent, SessionGuard, SessionId, SessionReceiver};
use axum::response::sse::{Event, KeepAlive, KeepAliveStream, Sse};
use futures::stream::{self, Stream, StreamExt};
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::trace;

/// SSE event name announcing the message endpoint.
pub const ENDPOINT_EVENT: &str = "endpoint";

/// SSE event name for JSON-RPC payloads.
pub const MESSAGE_EVENT: &str = "message";

/// Text of the keep-alive comment frame.
pub const KEEP_ALIVE_TEXT: &str = "keep-alive";

/// Path a session's client must POST JSON-RPC requests to.
pub fn message_path(session_id: &SessionId) -> String {
    format!("/message/{}", session_id)
}

pub fn endpoint_event(session_id: &SessionId) -> Event {
    Event::default()
        .event(ENDPOINT_EVENT)
        .data(message_path(session_id))
}

pub fn message_event(json: impl AsRef<str>) -> Event {
    Event::default().event(MESSAGE_EVENT).data(json.as_ref())
}

/// Serialize a response for the wire.
pub fn encode_response(response: &JsonRpcResponse) -> Result<String> {
    Ok(serde_json::to_string(response)?)
}

/// Event stream for one session.
///
/// The guard is moved into the stream; when the client disconnects and
/// axum drops the stream, the session leaves the registry.
pub fn session_stream(
    session_id: SessionId,
    receiver: SessionReceiver,
    guard: SessionGuard,
) -> impl Stream<Item = std::result::Result<Event, Infallible>> + Send + 'static {
    let endpoint = stream::once(async move { Ok::<_, Infallible>(endpoint_event(&session_id)) });

    let messages = UnboundedReceiverStream::new(receiver).map(move |event| {
        trace!("Streaming event to session {}", guard.id());
        match event {
            SessionEvent::JsonRpc(json) => Ok::<_, Infallible>(message_event(json)),
        }
    });

    endpoint.chain(messages)
}

/// Wrap an event stream as an SSE response with keep-alive comments.
pub fn sse_response<S>(events: S, keep_alive: Duration) -> Sse<KeepAliveStream<S>>
where
    S: Stream<Item = std::result::Result<Event, Infallible>> + Send + 'static,
{
    Sse::new(events).keep_alive(
        KeepAlive::new()
            .interval(keep_alive)
            .text(KEEP_ALIVE_TEXT),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::types::JsonRpcError;
    use crate::session::SessionRegistry;
    use std::sync::Arc;

    #[test]
    fn test_encode_response_is_single_line() {
        let response = JsonRpcResponse::error(Some(1.into()), JsonRpcError::new(-32602, "bad"));
        let json = encode_response(&response).unwrap();
        assert!(!json.contains('\n'));
        assert!(json.contains("\"code\":-32602"));
    }

    #[tokio::test]
    async fn test_session_stream_order_and_cleanup() {
        let registry = Arc::new(SessionRegistry::new());
        let (id, receiver, guard) = registry.open();
        assert_eq!(message_path(&id), format!("/message/{}", id));

        registry
            .send(id.as_str(), SessionEvent::JsonRpc("{\"id\":1}".into()))
            .unwrap();

        let mut events = Box::pin(session_stream(id.clone(), receiver, guard));
        assert!(events.next().await.is_some());
        assert!(events.next().await.is_some());
        assert_eq!(registry.len(), 1);

        drop(events);
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_session_stream_ends_when_sender_dropped() {
        let registry = Arc::new(SessionRegistry::new());
        let (id, receiver, guard) = registry.open();

        let mut events = Box::pin(session_stream(id, receiver, guard));
        assert!(events.next().await.is_some());

        registry.close_all();
        assert!(events.next().await.is_none());
    }
}
