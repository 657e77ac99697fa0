use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Payload body of an inbound event: a JSON object
pub type EventPayload = Map<String, Value>;

/// Payload key carrying the provenance marker
pub const IS_ME_KEY: &str = "isMe";

/// One normalized record in a room's event log
///
/// Entries are append-only. `seq` is the insertion index inside the room and
/// defines display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomLogEntry {
    pub id: Uuid,
    pub seq: u64,
    pub kind: String,
    pub payload: EventPayload,
    pub reason: String,
    pub is_me: bool,
    pub timestamp: DateTime<Utc>,
}

impl RoomLogEntry {
    /// Convenience lookup into the payload
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }
}

/// An event that arrived while no room was current
#[derive(Debug, Clone, PartialEq)]
pub struct PendingEvent {
    pub kind: String,
    pub payload: EventPayload,
    pub reason: String,
    pub received_at: DateTime<Utc>,
}

impl PendingEvent {
    pub fn new(kind: impl Into<String>, payload: EventPayload, reason: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload,
            reason: reason.into(),
            received_at: Utc::now(),
        }
    }
}
