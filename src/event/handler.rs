use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use super::{store::EventStore, tags::ReplyTag};

/// Errors that can occur when handling a reply
///
/// These never leave the store's dispatch call; they are logged and counted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HandlerError {
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("No current room")]
    NoCurrentRoom,

    #[error("Event store has been dropped")]
    StoreClosed,

    #[error("Handler panicked: {0}")]
    Panic(String),
}

impl HandlerError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        HandlerError::MalformedPayload(msg.into())
    }

    /// Whether the payload itself was at fault
    pub fn is_malformed(&self) -> bool {
        matches!(self, HandlerError::MalformedPayload(_))
    }
}

/// A unit that subscribes to one tag and turns its payload into a room log
/// entry
///
/// `handle` runs synchronously inside the store's dispatch call: it must not
/// block or perform I/O.
pub trait ReplyHandler: Send + Sync + 'static {
    /// The one tag this handler answers to
    fn tag(&self) -> ReplyTag;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;

    /// The store this handler was built against, if it is still alive
    fn store(&self) -> Option<Arc<EventStore>>;

    /// Handle one payload for `tag()`
    fn handle(&self, payload: &Value) -> Result<(), HandlerError>;

    /// Register `handle` with the store for `tag()`
    ///
    /// Call exactly once per handler during wiring. A second call registers
    /// a second subscription and every dispatch then runs `handle` twice.
    fn listen(self: Arc<Self>)
    where
        Self: Sized,
    {
        let tag = self.tag();
        let name = self.name();

        let Some(store) = self.store() else {
            warn!(tag = %tag, handler = name, "Store dropped before listen, not registering");
            return;
        };

        debug!(tag = %tag, handler = name, "Handler listening");
        store.subscribe(tag, name, move |payload| self.handle(payload));
    }
}
