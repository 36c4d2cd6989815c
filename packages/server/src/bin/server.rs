//! WebRTC signaling relay server.
//!
//! Peers join named rooms over WebSocket, learn about each other, and exchange
//! opaque signaling payloads (SDP offers/answers, ICE candidates) through the relay.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin sigrelay-server
//! cargo run --bin sigrelay-server -- --host 0.0.0.0 --port 9000 --relay-mode broadcast
//! cargo run --bin sigrelay-server -- --static-dir client/dist
//! ```

use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use sigrelay_server::{
    domain::{DuplicateNamePolicy, RelayMode, SignalingConfig},
    infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemorySignalingRepository,
    },
    ui::Server,
    usecase::{
        ConnectPeerUseCase, DEFAULT_ROOM_LOCK_SHARDS, DisconnectPeerUseCase,
        GetRoomDetailUseCase, GetRoomsUseCase, JoinRoomUseCase, RelayDataUseCase, RoomLocks,
    },
};
use sigrelay_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "sigrelay-server")]
#[command(about = "WebRTC signaling relay over WebSocket", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "9000")]
    port: u16,

    /// How `data` events are relayed: targeted | broadcast
    #[arg(long, default_value_t = RelayMode::Targeted)]
    relay_mode: RelayMode,

    /// What happens when a display name is already taken in a room: evict-old | allow-duplicate
    #[arg(long, default_value_t = DuplicateNamePolicy::EvictOld)]
    on_duplicate_display_name: DuplicateNamePolicy,

    /// Number of lock shards used for per-room mutual exclusion
    #[arg(long, default_value_t = DEFAULT_ROOM_LOCK_SHARDS)]
    room_lock_shards: usize,

    /// Directory containing the browser client build to serve at `/`
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let config = SignalingConfig {
        relay_mode: args.relay_mode,
        duplicate_name_policy: args.on_duplicate_display_name,
    };
    tracing::info!(
        "Relay mode: {}, duplicate display names: {}, room lock shards: {}",
        config.relay_mode,
        config.duplicate_name_policy,
        args.room_lock_shards
    );

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. Room locks
    // 4. UseCases
    // 5. Server

    // 1. Create Repository (in-memory registry + room directory)
    let repository = Arc::new(InMemorySignalingRepository::default());

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::default());

    // 3. Create per-room locks shared by join / relay / disconnect
    let room_locks = Arc::new(RoomLocks::new(args.room_lock_shards));

    // 4. Create UseCases
    let connect_peer_usecase = Arc::new(ConnectPeerUseCase::new(
        repository.clone(),
        message_pusher.clone(),
    ));
    let join_room_usecase = Arc::new(JoinRoomUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        room_locks.clone(),
        config.duplicate_name_policy,
    ));
    let relay_data_usecase = Arc::new(RelayDataUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        room_locks.clone(),
        config.relay_mode,
    ));
    let disconnect_peer_usecase = Arc::new(DisconnectPeerUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        room_locks,
    ));
    let get_rooms_usecase = Arc::new(GetRoomsUseCase::new(repository.clone()));
    let get_room_detail_usecase = Arc::new(GetRoomDetailUseCase::new(repository));

    // 5. Create and run the server
    let mut server = Server::new(
        connect_peer_usecase,
        join_room_usecase,
        relay_data_usecase,
        disconnect_peer_usecase,
        get_rooms_usecase,
        get_room_detail_usecase,
    );
    if let Some(dir) = args.static_dir {
        server = server.with_static_dir(dir);
    }
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
