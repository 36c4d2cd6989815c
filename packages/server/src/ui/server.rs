//! Server execution logic.

use std::{future::Future, path::PathBuf, sync::Arc};

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::usecase::{
    ConnectPeerUseCase, DisconnectPeerUseCase, GetRoomDetailUseCase, GetRoomsUseCase,
    JoinRoomUseCase, RelayDataUseCase,
};

use super::{
    handler::{get_room_detail, get_rooms, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// WebSocket signaling server
///
/// This struct encapsulates the server configuration and provides methods to run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     connect_peer_usecase,
///     join_room_usecase,
///     relay_data_usecase,
///     disconnect_peer_usecase,
///     get_rooms_usecase,
///     get_room_detail_usecase,
/// )
/// .with_static_dir("client/dist".into());
/// server.run("127.0.0.1".to_string(), 9000).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
    /// Browser client build output served at `/`
    static_dir: Option<PathBuf>,
}

impl Server {
    /// Create a new Server instance
    ///
    /// # Arguments
    ///
    /// * `connect_peer_usecase` - UseCase for registering a new connection
    /// * `join_room_usecase` - UseCase for `join` events
    /// * `relay_data_usecase` - UseCase for `data` events
    /// * `disconnect_peer_usecase` - UseCase for connection cleanup
    /// * `get_rooms_usecase` - UseCase for getting rooms list
    /// * `get_room_detail_usecase` - UseCase for getting room detail
    pub fn new(
        connect_peer_usecase: Arc<ConnectPeerUseCase>,
        join_room_usecase: Arc<JoinRoomUseCase>,
        relay_data_usecase: Arc<RelayDataUseCase>,
        disconnect_peer_usecase: Arc<DisconnectPeerUseCase>,
        get_rooms_usecase: Arc<GetRoomsUseCase>,
        get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    ) -> Self {
        Self {
            state: Arc::new(AppState {
                connect_peer_usecase,
                join_room_usecase,
                relay_data_usecase,
                disconnect_peer_usecase,
                get_rooms_usecase,
                get_room_detail_usecase,
            }),
            static_dir: None,
        }
    }

    /// Serve a single-page client from `dir`; unknown paths fall back to `index.html`.
    pub fn with_static_dir(mut self, dir: PathBuf) -> Self {
        self.static_dir = Some(dir);
        self
    }

    /// Build the application router
    pub fn router(&self) -> Router {
        let mut app = Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/rooms", get(get_rooms))
            .route("/api/rooms/{room}", get(get_room_detail))
            .with_state(self.state.clone());

        if let Some(dir) = &self.static_dir {
            let index = ServeFile::new(dir.join("index.html"));
            app = app.fallback_service(ServeDir::new(dir).fallback(index));
        }

        app.layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
    }

    /// Run the signaling server until Ctrl+C or SIGTERM
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 9000)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Signaling server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        if let Some(dir) = &self.static_dir {
            tracing::info!("Serving static client from {}", dir.display());
        }
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
    }
}
