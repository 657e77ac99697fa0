use serde_json::Value;
use std::sync::Arc;

use roomlog::{
    register_default_handlers, ErrorReplyHandler, EventStore, NoRoomPolicy, RoomManager,
    StoreOptions,
};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub store: Arc<EventStore>,
    pub rooms: Arc<RoomManager>,
    #[allow(dead_code)]
    pub handlers: Vec<Arc<ErrorReplyHandler>>,
}

pub struct TestSetupBuilder {
    rooms: Vec<String>,
    current: Option<String>,
    policy: NoRoomPolicy,
    wire_defaults: bool,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            rooms: vec![],
            current: None,
            policy: NoRoomPolicy::Drop,
            wire_defaults: true,
        }
    }

    pub fn with_rooms(mut self, rooms: Vec<&str>) -> Self {
        self.rooms = rooms.into_iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_current(mut self, room: &str) -> Self {
        self.current = Some(room.to_string());
        self
    }

    pub fn with_policy(mut self, policy: NoRoomPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[allow(dead_code)]
    pub fn without_default_handlers(mut self) -> Self {
        self.wire_defaults = false;
        self
    }

    pub fn build(self) -> TestSetup {
        let rooms = Arc::new(RoomManager::default());
        let store = EventStore::new(
            rooms.clone(),
            StoreOptions {
                no_room_policy: self.policy,
                strict_payloads: false,
            },
        );

        let handlers = if self.wire_defaults {
            register_default_handlers(&store)
        } else {
            Vec::new()
        };

        for room in &self.rooms {
            rooms.open(room).expect("room name should be valid");
        }
        if let Some(current) = &self.current {
            rooms.set_current(current).expect("current room should be open");
        }

        TestSetup {
            store,
            rooms,
            handlers,
        }
    }
}

/// Build a payload object from a JSON literal
pub fn payload(value: Value) -> Value {
    assert!(value.is_object(), "payload literal should be an object");
    value
}
