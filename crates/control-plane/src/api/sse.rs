// Live notification stream (SSE)
//
// Each connection subscribes to the broadcast hub. Messages are invalidation
// hints; a client that lags behind simply skips what it missed.

use axum::{
    extract::State,
    response::sse::{Event as SseEvent, KeepAlive, Sse},
    routing::get,
    Router,
};
use futures::{
    stream::{self, Stream},
    StreamExt,
};
use schedulink_core::{BroadcastHub, BroadcastMessage};
use std::convert::Infallible;
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};

/// App state for the SSE route
#[derive(Clone)]
pub struct AppState {
    pub hub: BroadcastHub,
}

impl AppState {
    pub fn new(hub: BroadcastHub) -> Self {
        Self { hub }
    }
}

/// Create SSE routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/sse", get(stream_sse))
        .with_state(state)
}

fn to_sse(message: &BroadcastMessage) -> SseEvent {
    let json = serde_json::to_string(message).unwrap_or_else(|_| "{}".to_string());
    SseEvent::default().event(message.kind.as_str()).data(json)
}

/// GET /v1/sse - Stream approval and conflict broadcasts
#[utoipa::path(
    get,
    path = "/v1/sse",
    responses(
        (status = 200, description = "Broadcast stream", content_type = "text/event-stream")
    ),
    tag = "notifications"
)]
pub async fn stream_sse(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>> {
    let receiver = state.hub.subscribe();
    tracing::info!(
        subscribers = state.hub.subscriber_count(),
        "SSE client connected"
    );

    let connected = stream::once(async {
        Ok(SseEvent::default()
            .event("connected")
            .data(r#"{"status":"connected"}"#))
    });

    let messages = BroadcastStream::new(receiver).filter_map(|item| async move {
        match item {
            Ok(message) => Some(Ok(to_sse(&message))),
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "SSE client lagged, messages dropped");
                None
            }
        }
    });

    Sse::new(connected.chain(messages)).keep_alive(KeepAlive::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;
    use schedulink_core::{BroadcastKind, Broadcaster};
    use std::time::Duration;

    /// Read body chunks until `needle` shows up
    async fn read_until<S>(body: &mut S, needle: &str) -> String
    where
        S: Stream<Item = Result<axum::body::Bytes, axum::Error>> + Unpin,
    {
        let mut text = String::new();
        while !text.contains(needle) {
            let chunk = tokio::time::timeout(Duration::from_secs(1), body.next())
                .await
                .unwrap()
                .unwrap()
                .unwrap();
            text.push_str(std::str::from_utf8(&chunk).unwrap());
        }
        text
    }

    #[tokio::test]
    async fn test_stream_starts_with_connected_then_relays_broadcasts() {
        let hub = BroadcastHub::new(8);
        let response = stream_sse(State(AppState::new(hub.clone())))
            .await
            .into_response();
        let mut body = response.into_body().into_data_stream();

        let connected = read_until(&mut body, "\n\n").await;
        assert!(connected.contains("event: connected"));
        assert!(connected.contains(r#"data: {"status":"connected"}"#));

        hub.publish(BroadcastMessage::new(
            BroadcastKind::EventApproved,
            "New event added! Check the calendar for new events.",
            None,
        ));

        let approved = read_until(&mut body, "event: event_approved").await;
        assert!(approved.contains(r#""type":"event_approved""#));
        assert!(approved.contains("New event added!"));
    }

    #[tokio::test]
    async fn test_dropping_stream_unsubscribes() {
        let hub = BroadcastHub::new(8);
        let sse = stream_sse(State(AppState::new(hub.clone()))).await;
        assert_eq!(hub.subscriber_count(), 1);

        drop(sse);
        assert_eq!(hub.subscriber_count(), 0);
    }
}
