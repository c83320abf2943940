//! Server configuration from command-line flags and the environment.

use std::time::Duration;

use clap::Parser;

use crate::infrastructure::hub::HubConfig;

/// Largest accepted `--hub-queue-capacity`
pub const MAX_HUB_QUEUE_CAPACITY: u64 = 1_000_000;

#[derive(Parser, Debug, Clone)]
#[command(name = "agora-server")]
#[command(about = "Chat room server with per-room WebSocket broadcast", long_about = None)]
pub struct ServerConfig {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "AGORA_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value = "8080")]
    pub port: u16,

    /// HS256 secret used to verify chat credentials
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    /// Seconds between room reconciliations (0 disables the periodic pass)
    #[arg(long, env = "AGORA_RECONCILE_INTERVAL_SECS", default_value = "30")]
    pub reconcile_interval_secs: u64,

    /// Capacity of each room's broadcast queue
    #[arg(long, env = "AGORA_HUB_QUEUE_CAPACITY", default_value = "256",
          value_parser = clap::value_parser!(u64).range(1..=MAX_HUB_QUEUE_CAPACITY))]
    pub hub_queue_capacity: u64,

    /// Upper bound on a single socket write, in milliseconds
    #[arg(long, env = "AGORA_WRITE_TIMEOUT_MS", default_value = "5000")]
    pub write_timeout_ms: u64,

    /// Reject chat frames that carry no credential
    #[arg(long, env = "AGORA_REQUIRE_TOKEN")]
    pub require_token: bool,

    /// Room to create at startup (repeatable)
    #[arg(long = "room", value_name = "NAME")]
    pub rooms: Vec<String>,
}

impl ServerConfig {
    pub fn hub_config(&self) -> HubConfig {
        HubConfig {
            queue_capacity: self.hub_queue_capacity.clamp(1, MAX_HUB_QUEUE_CAPACITY) as usize,
            write_timeout: Duration::from_millis(self.write_timeout_ms),
        }
    }

    /// `None` when periodic reconciliation is disabled
    pub fn reconcile_interval(&self) -> Option<Duration> {
        (self.reconcile_interval_secs > 0).then(|| Duration::from_secs(self.reconcile_interval_secs))
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
