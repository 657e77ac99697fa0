use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};

use super::types::{RoomNameRequest, RoomSummary};
use crate::event::{DispatchReport, InboundEvent};
use crate::room::RoomLogEntry;
use crate::shared::{AppError, AppState};

pub async fn health() -> &'static str {
    "ok"
}

/// POST /events
///
/// Dispatches one inbound reply through the store
#[instrument(name = "post_event", skip(state))]
pub async fn post_event(
    State(state): State<AppState>,
    Json(event): Json<InboundEvent>,
) -> Result<(StatusCode, Json<DispatchReport>), AppError> {
    let report = state.store.dispatch_inbound(&event)?;

    info!(
        delivered = report.delivered,
        failed = report.failed,
        "Inbound reply dispatched"
    );

    Ok((StatusCode::ACCEPTED, Json(report)))
}

/// GET /rooms
#[instrument(name = "list_rooms", skip(state))]
pub async fn list_rooms(State(state): State<AppState>) -> Json<Vec<RoomSummary>> {
    let rooms = state.rooms();
    Json(
        rooms
            .list()
            .iter()
            .map(|room| RoomSummary::from_room(room, rooms))
            .collect(),
    )
}

/// POST /rooms
#[instrument(name = "open_room", skip(state))]
pub async fn open_room(
    State(state): State<AppState>,
    Json(request): Json<RoomNameRequest>,
) -> Result<(StatusCode, Json<RoomSummary>), AppError> {
    let room = state.rooms().open(&request.name)?;
    Ok((
        StatusCode::CREATED,
        Json(RoomSummary::from_room(&room, state.rooms())),
    ))
}

/// DELETE /rooms/:name
#[instrument(name = "close_room", skip(state))]
pub async fn close_room(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<StatusCode, AppError> {
    if state.rooms().close(&name) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Room not found: {name}")))
    }
}

/// GET /rooms/:name/events
#[instrument(name = "room_events", skip(state))]
pub async fn room_events(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<RoomLogEntry>>, AppError> {
    let room = state
        .rooms()
        .get(&name)
        .ok_or_else(|| AppError::NotFound(format!("Room not found: {name}")))?;
    Ok(Json(room.events()))
}

/// GET /current
#[instrument(name = "get_current", skip(state))]
pub async fn get_current(State(state): State<AppState>) -> Result<Json<RoomSummary>, AppError> {
    let room = state
        .rooms()
        .current()
        .ok_or_else(|| AppError::NotFound("No current room".to_string()))?;
    Ok(Json(RoomSummary::from_room(&room, state.rooms())))
}

/// PUT /current
#[instrument(name = "set_current", skip(state))]
pub async fn set_current(
    State(state): State<AppState>,
    Json(request): Json<RoomNameRequest>,
) -> Result<Json<RoomSummary>, AppError> {
    let room = state.rooms().set_current(&request.name)?;
    Ok(Json(RoomSummary::from_room(&room, state.rooms())))
}

/// DELETE /current
#[instrument(name = "clear_current", skip(state))]
pub async fn clear_current(State(state): State<AppState>) -> StatusCode {
    state.rooms().clear_current();
    StatusCode::NO_CONTENT
}
