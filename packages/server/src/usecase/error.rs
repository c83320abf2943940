//! Use case error types.

use thiserror::Error;

use crate::domain::{AuthError, RepositoryError, ValueObjectError};
use crate::infrastructure::hub::HubError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinRoomError {
    #[error("room not found: {0}")]
    RoomNotFound(String),
    #[error("room is closed: {0}")]
    RoomClosed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendMessageError {
    #[error("unauthorized: {0}")]
    Unauthorized(#[from] AuthError),
    #[error("message addressed to room '{actual}' on a connection to '{expected}'")]
    RoomMismatch { expected: String, actual: String },
    #[error("failed to persist message: {0}")]
    Persistence(#[from] RepositoryError),
    #[error(transparent)]
    RoomClosed(#[from] HubError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    #[error("failed to fetch rooms: {0}")]
    FetchFailed(#[from] RepositoryError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManageRoomsError {
    #[error("room name must not be empty")]
    InvalidName,
    #[error("room not found: {0}")]
    RoomNotFound(String),
    #[error(transparent)]
    InvalidRoomId(#[from] ValueObjectError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
