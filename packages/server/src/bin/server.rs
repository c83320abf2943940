//! Agora chat room server.
//!
//! Run with:
//! ```not_rust
//! JWT_SECRET=changeme cargo run --bin agora-server -- --room general --room random
//! cargo run --bin agora-server -- --host 0.0.0.0 --port 3000 --jwt-secret changeme
//! ```

use std::sync::Arc;

use agora_server::{
    config::ServerConfig,
    domain::{Room, RoomIdFactory, Timestamp},
    infrastructure::{
        auth::JwtAuthenticator,
        repository::{InMemoryMessageRepository, InMemoryRoomRepository},
    },
    ui::Server,
};
use agora_shared::{
    logger::setup_logger,
    time::{Clock, SystemClock},
};
use clap::Parser;

#[tokio::main]
async fn main() {
    // A missing .env is fine
    let _ = dotenvy::dotenv();
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let config = ServerConfig::parse();

    // 1. Stores
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let mut seeds = Vec::with_capacity(config.rooms.len());
    for name in &config.rooms {
        let id = match RoomIdFactory::generate() {
            Ok(id) => id,
            Err(e) => {
                tracing::error!("Failed to generate room id: {}", e);
                std::process::exit(1);
            }
        };
        tracing::info!(room_id = %id, name = %name, "Seeding room");
        seeds.push(Room::new(id, name.clone(), Timestamp::new(clock.now_millis())));
    }
    let room_repository = Arc::new(InMemoryRoomRepository::with_rooms(seeds));
    let message_repository = Arc::new(InMemoryMessageRepository::new(
        room_repository.clone(),
        clock.clone(),
    ));

    // 2. Authenticator
    let authenticator = Arc::new(JwtAuthenticator::new(
        &config.jwt_secret,
        chrono::Duration::hours(24),
    ));

    // 3. Server
    let server = Server::new(
        &config,
        room_repository,
        message_repository,
        authenticator,
        clock,
    );
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
