//! Concrete implementations of the domain interfaces plus the live room state.
//!
//! - `auth`: JWT authenticator
//! - `dto`: wire formats
//! - `hub`: room hubs and the registry
//! - `message_pusher`: WebSocket peer writer
//! - `repository`: in-memory stores

pub mod auth;
pub mod dto;
pub mod hub;
pub mod message_pusher;
pub mod repository;
