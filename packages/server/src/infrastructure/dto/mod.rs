//! Data transfer objects for the wire formats.
//!
//! - `websocket`: chat frames
//! - `http`: REST request and response bodies

pub mod conversion;
pub mod http;
pub mod websocket;
