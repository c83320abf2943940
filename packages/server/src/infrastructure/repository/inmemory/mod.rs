//! In-memory stores backed by `HashMap`s.

mod message;
mod room;

pub use message::InMemoryMessageRepository;
pub use room::InMemoryRoomRepository;
