//! Store implementations.

pub mod inmemory;

pub use inmemory::{InMemoryMessageRepository, InMemoryRoomRepository};
