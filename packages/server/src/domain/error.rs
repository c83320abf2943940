//! Domain error types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("room id must not be empty")]
    RoomIdEmpty,
    #[error("room id is too long ({0} bytes)")]
    RoomIdTooLong(usize),
}

/// Errors reported by the room and message stores.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("room not found: {0}")]
    RoomNotFound(String),
    #[error("room already exists: {0}")]
    RoomAlreadyExists(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Errors reported by the connection authenticator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("missing credential")]
    MissingToken,
    #[error("invalid credential: {0}")]
    InvalidToken(String),
    #[error("credential does not match sender '{0}'")]
    IdentityMismatch(String),
    #[error("failed to issue credential: {0}")]
    IssueFailed(String),
}

/// Errors raised while writing to a single peer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("push failed: {0}")]
    PushFailed(String),
    #[error("push timed out")]
    Timeout,
    #[error("connection closed")]
    Closed,
}
