// Inbound reply dispatch
//
// Tagged server replies flow into the EventStore, which fans them out to the
// handlers subscribed to each tag. Handlers turn payloads into room log
// entries.

// Public API - what other modules can use
pub use handler::{HandlerError, ReplyHandler};
pub use handlers::{register_default_handlers, ErrorReplyHandler};
pub use store::{
    DispatchReport, EventStore, InboundEvent, NoRoomPolicy, StoreError, StoreOptions,
};
pub use tags::ReplyTag;

// Internal modules
mod handler;
pub mod handlers;
mod store;
mod tags;
