// Live notification channel
//
// The workflows only ever call `Broadcaster::publish`. Connection lifecycles
// belong to whoever subscribes to the hub (the SSE endpoint).
// Delivery is best-effort: listeners treat messages as invalidation hints.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Broadcast message type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum BroadcastKind {
    EventApproved,
    EventConflict,
}

impl BroadcastKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BroadcastKind::EventApproved => "event_approved",
            BroadcastKind::EventConflict => "event_conflict",
        }
    }
}

/// Payload pushed to live listeners
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BroadcastMessage {
    #[serde(rename = "type")]
    pub kind: BroadcastKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<Uuid>,
}

impl BroadcastMessage {
    pub fn new(kind: BroadcastKind, message: impl Into<String>, event_id: Option<Uuid>) -> Self {
        Self {
            kind,
            message: message.into(),
            event_id,
        }
    }
}

/// Fire-and-forget publisher
pub trait Broadcaster: Send + Sync {
    fn publish(&self, message: BroadcastMessage);
}

/// In-process publish/subscribe hub backed by a tokio broadcast channel
#[derive(Debug, Clone)]
pub struct BroadcastHub {
    sender: broadcast::Sender<BroadcastMessage>,
}

impl BroadcastHub {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Receive every message published after this call
    pub fn subscribe(&self) -> broadcast::Receiver<BroadcastMessage> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new(256)
    }
}

impl Broadcaster for BroadcastHub {
    fn publish(&self, message: BroadcastMessage) {
        let kind = message.kind.as_str();
        match self.sender.send(message) {
            Ok(receivers) => tracing::debug!(kind, receivers, "Broadcast published"),
            // No listeners connected
            Err(_) => tracing::debug!(kind, "Broadcast dropped, no subscribers"),
        }
    }
}
