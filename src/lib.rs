// Library crate for the roomlog reply dispatcher
// This file exposes the public API for integration tests

pub mod api;
pub mod config;
pub mod event;
pub mod room;
pub mod shared;

// Re-export commonly used types for easier access in tests
pub use config::{Config, ConfigError};
pub use event::{
    register_default_handlers, DispatchReport, ErrorReplyHandler, EventStore, HandlerError,
    InboundEvent, NoRoomPolicy, ReplyHandler, ReplyTag, StoreError, StoreOptions,
};
pub use room::{Room, RoomError, RoomLogEntry, RoomManager};
pub use shared::{AppError, AppState};
