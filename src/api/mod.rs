// Inspection API: feed inbound replies to the store and read room logs

// Public API - what other modules can use
pub use handlers::{
    clear_current, close_room, get_current, health, list_rooms, open_room, post_event,
    room_events, set_current,
};

// Internal modules
mod handlers;
pub mod types;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::shared::AppState;

/// Build the router with all inspection routes
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/events", post(post_event))
        .route("/rooms", get(list_rooms).post(open_room))
        .route("/rooms/:name", delete(close_room))
        .route("/rooms/:name/events", get(room_events))
        .route(
            "/current",
            get(get_current).put(set_current).delete(clear_current),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
