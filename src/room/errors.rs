use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoomError {
    #[error("Room not found: {0}")]
    NotFound(String),

    #[error("Invalid room name: {0:?}")]
    InvalidName(String),
}
