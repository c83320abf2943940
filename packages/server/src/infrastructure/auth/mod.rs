//! Credential verification.

pub mod jwt;

pub use jwt::JwtAuthenticator;
