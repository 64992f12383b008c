//! Kaiwa chat relay server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin kaiwa-server
//! cargo run --bin kaiwa-server -- --host 0.0.0.0 --port 3000 --log-level info
//! ```

use std::{collections::HashMap, sync::Arc};

use clap::Parser;
use kaiwa_server::{
    domain::{ChatState, Timestamp},
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryChatRepository},
    ui::Server,
    usecase::{
        ChatRouter, GetActiveUsersUseCase, GetRoomDetailUseCase, GetRoomsUseCase,
        spawn_coordinator,
    },
};
use kaiwa_shared::{
    logger::setup_logger,
    time::{Clock, SystemClock},
};
use tokio::sync::Mutex;

#[derive(Parser, Debug)]
#[command(name = "kaiwa-server")]
#[command(about = "Real-time chat relay with group, private and room conversations", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Default log level (overridden by RUST_LOG)
    #[arg(short = 'l', long, default_value = "debug")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. Router and coordinator
    // 4. Query UseCases
    // 5. Server
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // 1. Create Repository (in-memory state with the reserved room)
    let state = match ChatState::new(Timestamp::new(clock.now_millis())) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Failed to initialize chat state: {}", e);
            std::process::exit(1);
        }
    };
    let repository = Arc::new(InMemoryChatRepository::new(Arc::new(Mutex::new(state))));

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new(Arc::new(Mutex::new(
        HashMap::new(),
    ))));

    // 3. Start the coordinator that serializes every intent
    let router = ChatRouter::new(repository.clone(), message_pusher, clock);
    let (coordinator, coordinator_task) = spawn_coordinator(router);

    // 4. Create query UseCases for the HTTP API
    let get_rooms_usecase = Arc::new(GetRoomsUseCase::new(repository.clone()));
    let get_room_detail_usecase = Arc::new(GetRoomDetailUseCase::new(repository.clone()));
    let get_active_users_usecase = Arc::new(GetActiveUsersUseCase::new(repository));

    // 5. Create and run the server
    let server = Server::new(
        coordinator,
        get_rooms_usecase,
        get_room_detail_usecase,
        get_active_users_usecase,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    coordinator_task.abort();
}
