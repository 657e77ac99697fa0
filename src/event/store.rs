use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock};
use strum_macros::{Display, EnumString};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::{handler::HandlerError, tags::ReplyTag};
use crate::room::RoomManager;

type Callback = Arc<dyn Fn(&Value) -> Result<(), HandlerError> + Send + Sync>;

/// What a handler does with a reply when no room is current
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum NoRoomPolicy {
    /// Log a warning and discard the reply
    #[default]
    Drop,
    /// Hold the reply until a room becomes current
    Buffer,
    /// Report `HandlerError::NoCurrentRoom` to the store
    Fail,
}

/// Behaviour switches shared by the store and its handlers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    pub no_room_policy: NoRoomPolicy,
    /// Panic on malformed payloads instead of skipping them
    pub strict_payloads: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            no_room_policy: NoRoomPolicy::Drop,
            strict_payloads: cfg!(debug_assertions),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Unknown reply tag: {0}")]
    UnknownTag(String),
}

/// Wire shape of an inbound reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundEvent {
    pub tag: String,
    #[serde(default)]
    pub payload: Value,
}

/// Outcome of one dispatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    pub tag: ReplyTag,
    pub delivered: usize,
    pub failed: usize,
}

impl DispatchReport {
    fn new(tag: ReplyTag) -> Self {
        Self {
            tag,
            delivered: 0,
            failed: 0,
        }
    }
}

#[derive(Clone)]
struct Subscription {
    name: &'static str,
    callback: Callback,
}

/// Multiplexes inbound replies by tag
///
/// The store runs every subscriber for a tag synchronously, in registration
/// order, inside `dispatch`. A subscriber that errors or panics is isolated:
/// the failure is logged and the remaining subscribers still run.
pub struct EventStore {
    subscriptions: RwLock<HashMap<ReplyTag, Vec<Subscription>>>,
    rooms: Arc<RoomManager>,
    options: StoreOptions,
}

impl EventStore {
    pub fn new(rooms: Arc<RoomManager>, options: StoreOptions) -> Arc<Self> {
        Arc::new(Self {
            subscriptions: RwLock::new(HashMap::new()),
            rooms,
            options,
        })
    }

    pub fn room_manager(&self) -> &Arc<RoomManager> {
        &self.rooms
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Register an anonymous callback for `tag`
    pub fn on<F>(&self, tag: ReplyTag, callback: F)
    where
        F: Fn(&Value) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.subscribe(tag, "anonymous", callback);
    }

    /// Register a named callback for `tag`
    ///
    /// More than one subscriber per tag is accepted; the extra registration
    /// is logged so fan-out is never silent.
    pub fn subscribe<F>(&self, tag: ReplyTag, name: &'static str, callback: F)
    where
        F: Fn(&Value) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        let mut subscriptions = self
            .subscriptions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let subscribers = subscriptions.entry(tag).or_default();

        if !subscribers.is_empty() {
            warn!(
                tag = %tag,
                handler = name,
                existing = subscribers.len(),
                "Tag already has a subscriber, registering another"
            );
        }

        subscribers.push(Subscription {
            name,
            callback: Arc::new(callback),
        });
        info!(tag = %tag, handler = name, "Registered reply subscriber");
    }

    pub fn subscriber_count(&self, tag: ReplyTag) -> usize {
        self.subscriptions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&tag)
            .map_or(0, Vec::len)
    }

    /// Tags with at least one subscriber, in declaration order
    pub fn registered_tags(&self) -> Vec<ReplyTag> {
        let subscriptions = self
            .subscriptions
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let mut tags: Vec<ReplyTag> = subscriptions
            .iter()
            .filter(|(_, subs)| !subs.is_empty())
            .map(|(tag, _)| *tag)
            .collect();
        tags.sort();
        tags
    }

    /// Deliver one payload to every subscriber of `tag`
    ///
    /// Subscriber errors and panics are contained and counted in the report.
    /// The one exception is strict payload mode: a `MalformedPayload` failure
    /// is logged and then panics outside the containment, so subscribers
    /// registered after the failing one are skipped and the panic reaches the
    /// caller (an HTTP request through `POST /events` is torn down).
    pub fn dispatch(&self, tag: ReplyTag, payload: &Value) -> DispatchReport {
        // Cloned out so subscribers can register without deadlocking
        let subscribers: Vec<Subscription> = self
            .subscriptions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&tag)
            .cloned()
            .unwrap_or_default();

        let mut report = DispatchReport::new(tag);
        if subscribers.is_empty() {
            debug!(tag = %tag, "No subscribers for reply");
            return report;
        }

        debug!(
            tag = %tag,
            "Dispatching reply to {} subscribers",
            subscribers.len()
        );

        for subscriber in &subscribers {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| (subscriber.callback)(payload)))
                .unwrap_or_else(|panic| Err(HandlerError::Panic(panic_message(panic.as_ref()))));

            match outcome {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    report.failed += 1;
                    self.report_failure(tag, subscriber.name, &e);
                }
            }
        }

        report
    }

    /// Parse a wire tag and dispatch
    pub fn dispatch_raw(&self, tag: &str, payload: &Value) -> Result<DispatchReport, StoreError> {
        let parsed = ReplyTag::from_str(tag).map_err(|_| {
            debug!(tag = %tag, "Ignoring unknown reply tag");
            StoreError::UnknownTag(tag.to_string())
        })?;
        Ok(self.dispatch(parsed, payload))
    }

    pub fn dispatch_inbound(&self, event: &InboundEvent) -> Result<DispatchReport, StoreError> {
        self.dispatch_raw(&event.tag, &event.payload)
    }

    fn report_failure(&self, tag: ReplyTag, handler: &'static str, e: &HandlerError) {
        match e {
            HandlerError::NoCurrentRoom => {
                warn!(tag = %tag, handler = handler, "Reply has no current room");
            }
            _ => {
                error!(tag = %tag, handler = handler, error = %e, "Reply handler failed");
            }
        }

        if self.options.strict_payloads && e.is_malformed() {
            panic!("malformed payload for {tag} in {handler}: {e}");
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
