//! Route handlers.

mod http;
mod websocket;

pub use http::{create_room, debug_hubs, delete_room, get_room_messages, health_check, list_rooms};
pub use websocket::websocket_handler;
