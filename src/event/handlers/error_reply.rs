use serde_json::Value;
use std::sync::{Arc, Weak};
use tracing::{debug, warn};

use crate::{
    event::{
        handler::{HandlerError, ReplyHandler},
        store::{EventStore, NoRoomPolicy},
        tags::ReplyTag,
    },
    room::{
        models::{PendingEvent, IS_ME_KEY},
        Delivery,
    },
};

/// Turns a server error reply into an entry in the current room's log
///
/// The entry kind is `error:<tag lowercased>`, the payload is carried whole
/// with an `isMe` provenance marker added, and the payload's `reason` is
/// lifted out as the display reason.
pub struct ErrorReplyHandler {
    tag: ReplyTag,
    is_me: bool,
    store: Weak<EventStore>,
}

impl ErrorReplyHandler {
    /// Build a handler for `tag` that marks entries as the local user's own
    pub fn new(store: &Arc<EventStore>, tag: ReplyTag) -> Self {
        Self {
            tag,
            is_me: true,
            store: Arc::downgrade(store),
        }
    }

    /// Override the provenance marker written into each entry
    pub fn with_is_me(mut self, is_me: bool) -> Self {
        self.is_me = is_me;
        self
    }

    pub fn is_me(&self) -> bool {
        self.is_me
    }
}

impl ReplyHandler for ErrorReplyHandler {
    fn tag(&self) -> ReplyTag {
        self.tag
    }

    fn name(&self) -> &'static str {
        "ErrorReplyHandler"
    }

    fn store(&self) -> Option<Arc<EventStore>> {
        self.store.upgrade()
    }

    fn handle(&self, payload: &Value) -> Result<(), HandlerError> {
        let body = payload
            .as_object()
            .ok_or_else(|| HandlerError::malformed("payload is not an object"))?;
        let reason = body
            .get("reason")
            .and_then(Value::as_str)
            .ok_or_else(|| HandlerError::malformed("missing string field `reason`"))?
            .to_string();

        let store = self.store().ok_or(HandlerError::StoreClosed)?;

        let mut entry = body.clone();
        entry.insert(IS_ME_KEY.to_string(), Value::Bool(self.is_me));
        let kind = self.tag.event_kind();

        let policy = store.options().no_room_policy;
        let event = PendingEvent::new(kind, entry, reason);
        let defer = policy == NoRoomPolicy::Buffer;

        match store.room_manager().append_or_defer(event, defer) {
            Delivery::Appended(room) => {
                debug!(tag = %self.tag, room = %room.name(), "Logged error reply");
                Ok(())
            }
            Delivery::Deferred => Ok(()),
            Delivery::NoCurrentRoom if policy == NoRoomPolicy::Fail => {
                Err(HandlerError::NoCurrentRoom)
            }
            Delivery::NoCurrentRoom => {
                warn!(tag = %self.tag, "No current room, dropping error reply");
                Ok(())
            }
        }
    }
}
