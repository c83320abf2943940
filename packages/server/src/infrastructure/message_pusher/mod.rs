//! Peer writer implementations.
//!
//! - `websocket`: writes to the sink half of an axum WebSocket

pub mod websocket;

pub use websocket::WebSocketPusher;
