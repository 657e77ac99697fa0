use chrono::{DateTime, Utc};
use std::sync::{Mutex, PoisonError};
use tracing::debug;
use uuid::Uuid;

use super::models::{EventPayload, PendingEvent, RoomLogEntry, IS_ME_KEY};

/// A conversation context holding an ordered, append-only event log
///
/// Each room guards its own log, so appends to different rooms never contend.
#[derive(Debug)]
pub struct Room {
    name: String,
    created_at: DateTime<Utc>,
    log: Mutex<Vec<RoomLogEntry>>,
}

impl Room {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            created_at: Utc::now(),
            log: Mutex::new(Vec::new()),
        }
    }

    /// Display name as it was first opened
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Append one entry to the log
    ///
    /// The entry's `is_me` flag is lifted from the payload's `isMe` boolean
    /// (absent means false).
    pub fn add_event(
        &self,
        kind: impl Into<String>,
        payload: EventPayload,
        reason: impl Into<String>,
    ) {
        self.append(kind.into(), payload, reason.into(), Utc::now());
    }

    /// Append a buffered event, stamped with the time it arrived
    pub(crate) fn add_pending(&self, event: PendingEvent) {
        self.append(event.kind, event.payload, event.reason, event.received_at);
    }

    fn append(&self, kind: String, payload: EventPayload, reason: String, at: DateTime<Utc>) {
        let is_me = payload
            .get(IS_ME_KEY)
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

        let mut log = self.log.lock().unwrap_or_else(PoisonError::into_inner);
        let entry = RoomLogEntry {
            id: Uuid::new_v4(),
            seq: log.len() as u64,
            kind,
            payload,
            reason,
            is_me,
            timestamp: at,
        };

        debug!(
            room = %self.name,
            kind = %entry.kind,
            seq = entry.seq,
            is_me = entry.is_me,
            "Appended room event"
        );
        log.push(entry);
    }

    /// Snapshot of the log in insertion order
    pub fn events(&self) -> Vec<RoomLogEntry> {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last_event(&self) -> Option<RoomLogEntry> {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.log.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
