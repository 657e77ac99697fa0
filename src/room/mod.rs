// Rooms and their event logs
//
// A room is one conversation context (a channel or a query window). The
// manager owns the set of open rooms and the explicit "current" pointer
// that inbound replies are routed to.

// Public API - what other modules can use
pub use errors::RoomError;
pub use log::Room;
pub use manager::{Delivery, RoomManager, DEFAULT_PENDING_CAPACITY};
pub use models::{EventPayload, PendingEvent, RoomLogEntry};

// Internal modules
mod errors;
mod log;
mod manager;
pub mod models;
