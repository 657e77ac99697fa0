use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, instrument, warn};

use super::{errors::RoomError, log::Room, models::PendingEvent};

/// Default bound on events held while no room is current
pub const DEFAULT_PENDING_CAPACITY: usize = 256;

/// Where `append_or_defer` put an event
#[derive(Debug)]
pub enum Delivery {
    Appended(Arc<Room>),
    Deferred,
    NoCurrentRoom,
}

#[derive(Debug, Default)]
struct ManagerState {
    // lowercased name -> room
    rooms: HashMap<String, Arc<Room>>,
    current: Option<String>,
    pending: VecDeque<PendingEvent>,
}

/// Tracks the open rooms and which one is current
///
/// Room names are matched case-insensitively, so `#Rust` and `#rust` are the
/// same room. The current pointer only moves through `set_current`,
/// `clear_current` or closing the current room.
#[derive(Debug)]
pub struct RoomManager {
    state: RwLock<ManagerState>,
    pending_capacity: usize,
}

impl Default for RoomManager {
    fn default() -> Self {
        Self::new(DEFAULT_PENDING_CAPACITY)
    }
}

impl RoomManager {
    pub fn new(pending_capacity: usize) -> Self {
        Self {
            state: RwLock::new(ManagerState::default()),
            pending_capacity,
        }
    }

    fn key(name: &str) -> String {
        name.trim().to_lowercase()
    }

    fn read(&self) -> RwLockReadGuard<'_, ManagerState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ManagerState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Open a room, or return the existing one with the same name
    #[instrument(skip(self))]
    pub fn open(&self, name: &str) -> Result<Arc<Room>, RoomError> {
        let key = Self::key(name);
        if key.is_empty() {
            return Err(RoomError::InvalidName(name.to_string()));
        }

        let mut state = self.write();
        if let Some(room) = state.rooms.get(&key) {
            debug!(room = %room.name(), "Room already open");
            return Ok(room.clone());
        }

        let room = Arc::new(Room::new(name.trim()));
        state.rooms.insert(key, room.clone());
        info!(room = %room.name(), "Opened room");
        Ok(room)
    }

    /// Close a room, returning whether it was open
    ///
    /// Closing the current room leaves no room current.
    #[instrument(skip(self))]
    pub fn close(&self, name: &str) -> bool {
        let key = Self::key(name);
        let mut state = self.write();

        if state.rooms.remove(&key).is_none() {
            debug!("Close requested for room that is not open");
            return false;
        }
        if state.current.as_deref() == Some(key.as_str()) {
            state.current = None;
            info!("Closed the current room, no room is current");
        } else {
            info!("Closed room");
        }
        true
    }

    pub fn get(&self, name: &str) -> Option<Arc<Room>> {
        self.read().rooms.get(&Self::key(name)).cloned()
    }

    /// All open rooms ordered by name
    pub fn list(&self) -> Vec<Arc<Room>> {
        let state = self.read();
        let mut rooms: Vec<(&String, &Arc<Room>)> = state.rooms.iter().collect();
        rooms.sort_by(|a, b| a.0.cmp(b.0));
        rooms.into_iter().map(|(_, room)| room.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.read().rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The room focused in the user's view, if any
    pub fn current(&self) -> Option<Arc<Room>> {
        let state = self.read();
        state
            .current
            .as_ref()
            .and_then(|key| state.rooms.get(key))
            .cloned()
    }

    pub fn is_current(&self, name: &str) -> bool {
        self.read().current.as_deref() == Some(Self::key(name).as_str())
    }

    /// Focus an open room
    ///
    /// Any pending events are flushed into the newly focused room in the
    /// order they arrived, before any other append can reach it.
    #[instrument(skip(self))]
    pub fn set_current(&self, name: &str) -> Result<Arc<Room>, RoomError> {
        let key = Self::key(name);
        let mut state = self.write();
        let room = state
            .rooms
            .get(&key)
            .cloned()
            .ok_or_else(|| RoomError::NotFound(name.to_string()))?;
        state.current = Some(key);

        // Lock order: manager state, then the room's log
        if !state.pending.is_empty() {
            info!(
                room = %room.name(),
                count = state.pending.len(),
                "Flushing pending events into current room"
            );
        }
        for event in state.pending.drain(..) {
            room.add_pending(event);
        }

        debug!(room = %room.name(), "Current room changed");
        Ok(room)
    }

    pub fn clear_current(&self) {
        self.write().current = None;
        debug!("Current room cleared");
    }

    /// Append to the current room, or hold the event when none is current
    ///
    /// The check and the append (or defer) happen under one write lock, so an
    /// event can never land between a focus change and the pending flush.
    pub fn append_or_defer(&self, event: PendingEvent, defer: bool) -> Delivery {
        let mut state = self.write();
        let current = state
            .current
            .as_ref()
            .and_then(|key| state.rooms.get(key))
            .cloned();

        match current {
            Some(room) => {
                room.add_event(event.kind, event.payload, event.reason);
                Delivery::Appended(room)
            }
            None if defer => {
                self.push_pending(&mut state, event);
                Delivery::Deferred
            }
            None => Delivery::NoCurrentRoom,
        }
    }

    /// Hold an event until a room becomes current
    pub fn defer(&self, event: PendingEvent) {
        let mut state = self.write();
        self.push_pending(&mut state, event);
    }

    fn push_pending(&self, state: &mut ManagerState, event: PendingEvent) {
        if self.pending_capacity == 0 {
            warn!(kind = %event.kind, "Pending buffer disabled, dropping event");
            return;
        }
        if state.pending.len() >= self.pending_capacity {
            if let Some(oldest) = state.pending.pop_front() {
                warn!(
                    kind = %oldest.kind,
                    capacity = self.pending_capacity,
                    "Pending buffer full, discarding oldest event"
                );
            }
        }
        debug!(kind = %event.kind, "Deferred event until a room is current");
        state.pending.push_back(event);
    }

    pub fn pending_len(&self) -> usize {
        self.read().pending.len()
    }
}
