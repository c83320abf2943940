//! Domain layer for the chat server.
//!
//! Entities, value objects and the interfaces of the external collaborators
//! (room store, message store, authenticator, peer writer).

pub mod auth;
pub mod entity;
pub mod error;
pub mod message_pusher;
pub mod repository;
pub mod value_object;

pub use auth::Authenticator;
pub use entity::{AuthClaims, MessageDraft, Room, StoredMessage};
pub use error::{AuthError, MessagePushError, RepositoryError, ValueObjectError};
pub use message_pusher::MessagePusher;
pub use repository::{MessageRepository, RoomRepository};
pub use value_object::{ConnectionId, MessageId, RoomId, RoomIdFactory, Timestamp};

#[cfg(test)]
pub use auth::MockAuthenticator;
#[cfg(test)]
pub use repository::{MockMessageRepository, MockRoomRepository};
