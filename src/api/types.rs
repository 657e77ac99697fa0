use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::room::{Room, RoomManager};

/// Request payload naming a room, used to open or focus one
#[derive(Debug, Deserialize)]
pub struct RoomNameRequest {
    pub name: String,
}

/// Room information returned by the API
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    pub name: String,
    pub current: bool,
    pub event_count: usize,
    pub created_at: DateTime<Utc>,
}

impl RoomSummary {
    pub fn from_room(room: &Room, rooms: &RoomManager) -> Self {
        Self {
            name: room.name().to_string(),
            current: rooms.is_current(room.name()),
            event_count: room.len(),
            created_at: room.created_at(),
        }
    }
}
