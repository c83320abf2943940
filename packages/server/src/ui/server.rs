//! Server wiring and execution.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use agora_shared::time::Clock;
use axum::{
    Router,
    routing::{delete, get},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{
    config::ServerConfig,
    domain::{Authenticator, MessageRepository, RoomRepository},
    infrastructure::hub::{ReconcileReport, RoomRegistry},
    usecase::{
        GetMessagesUseCase, JoinRoomUseCase, LeaveRoomUseCase, ManageRoomsUseCase,
        ReconcileError, ReconcileRoomsUseCase, SendMessageUseCase,
    },
};

use super::{
    handler::{
        create_room, debug_hubs, delete_room, get_room_messages, health_check, list_rooms,
        websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Chat room server
///
/// Owns the room registry and the reconciler that keeps it in sync with the
/// room store.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(&config, room_repository, message_repository, authenticator, clock);
/// server.run().await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
    registry: Arc<RoomRegistry>,
    reconciler: Arc<ReconcileRoomsUseCase>,
    bind_addr: String,
    reconcile_interval: Option<Duration>,
}

impl Server {
    pub fn new(
        config: &ServerConfig,
        room_repository: Arc<dyn RoomRepository>,
        message_repository: Arc<dyn MessageRepository>,
        authenticator: Arc<dyn Authenticator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let registry = Arc::new(RoomRegistry::new(config.hub_config()));
        let reconciler = Arc::new(ReconcileRoomsUseCase::new(
            room_repository.clone(),
            registry.clone(),
        ));

        let state = Arc::new(AppState {
            join_room_usecase: Arc::new(JoinRoomUseCase::new(registry.clone())),
            leave_room_usecase: Arc::new(LeaveRoomUseCase::new()),
            send_message_usecase: Arc::new(SendMessageUseCase::new(
                message_repository.clone(),
                authenticator,
                config.require_token,
            )),
            manage_rooms_usecase: Arc::new(ManageRoomsUseCase::new(
                room_repository.clone(),
                registry.clone(),
                reconciler.clone(),
                clock,
            )),
            get_messages_usecase: Arc::new(GetMessagesUseCase::new(
                room_repository,
                message_repository,
            )),
        });

        Self {
            state,
            registry,
            reconciler,
            bind_addr: config.bind_addr(),
            reconcile_interval: config.reconcile_interval(),
        }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/ws", get(websocket_handler))
            .route("/api/health", get(health_check))
            .route("/api/rooms", get(list_rooms).post(create_room))
            .route("/api/rooms/{room_id}", delete(delete_room))
            .route("/api/rooms/{room_id}/messages", get(get_room_messages))
            .route("/debug/hubs", get(debug_hubs))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    pub fn registry(&self) -> Arc<RoomRegistry> {
        self.registry.clone()
    }

    /// Reconcile the registry against the room store right away.
    pub async fn reconcile_now(&self) -> Result<ReconcileReport, ReconcileError> {
        self.reconciler.execute().await
    }

    /// Serve on `listener` until `shutdown` resolves.
    ///
    /// Populates the registry before accepting connections, runs the periodic
    /// reconciler, and on shutdown stops it and retires every hub.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if let Ok(report) = self.reconcile_now().await {
            tracing::info!(rooms = report.created.len(), "Initial room reconcile done");
        }

        let periodic = self
            .reconcile_interval
            .map(|interval| self.reconciler.clone().spawn_periodic(interval));

        let registry = self.registry.clone();
        let app = self.router();
        let graceful = async move {
            shutdown.await;
            if let Some(handle) = periodic {
                handle.abort();
            }
            registry.shutdown().await;
        };

        tracing::info!(
            "Chat server listening on {}",
            listener.local_addr()?
        );
        axum::serve(listener, app)
            .with_graceful_shutdown(graceful)
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    /// Bind the configured address and serve until Ctrl+C or SIGTERM.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let listener = TcpListener::bind(&self.bind_addr).await?;
        tracing::info!("Connect to: ws://{}/ws?id=<room id>", self.bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");
        self.serve(listener, shutdown_signal()).await?;
        Ok(())
    }
}
