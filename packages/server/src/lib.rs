//! Agora chat room server.
//!
//! Each persisted room gets a live hub that fans stored chat messages out to
//! every WebSocket connection in that room. The set of hubs is reconciled
//! against the room store periodically and after every room mutation.

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
