use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use tracing::info;

use crate::config::Config;
use crate::event::{register_default_handlers, EventStore, StoreError};
use crate::room::{RoomError, RoomManager};

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<EventStore>,
}

impl AppState {
    pub fn new(store: Arc<EventStore>) -> Self {
        Self { store }
    }

    /// Wire the store, room manager and default handlers from configuration
    ///
    /// Rooms listed in the config are opened and the first becomes current.
    pub fn from_config(config: &Config) -> Result<Self, RoomError> {
        let rooms = Arc::new(RoomManager::new(config.pending_capacity));
        let store = EventStore::new(rooms.clone(), config.store_options());
        register_default_handlers(&store);

        for name in &config.rooms {
            rooms.open(name)?;
        }
        if let Some(first) = config.rooms.first() {
            rooms.set_current(first)?;
            info!(room = %first, "Initial current room");
        }

        Ok(Self::new(store))
    }

    pub fn rooms(&self) -> &Arc<RoomManager> {
        self.store.room_manager()
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::UnknownTag(_) => AppError::BadRequest(e.to_string()),
        }
    }
}

impl From<RoomError> for AppError {
    fn from(e: RoomError) -> Self {
        match e {
            RoomError::NotFound(_) => AppError::NotFound(e.to_string()),
            RoomError::InvalidName(_) => AppError::BadRequest(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
