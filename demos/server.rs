//! Standalone room server. Usage: `rtype-server <port> [max_clients]`.

use std::sync::Arc;

use rtype_core::game::GameRules;
use rtype_core::net::{Transport, WsTransport};
use rtype_core::server::Server;

#[tokio::main]
async fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let port: u16 = args
        .next()
        .expect("usage: rtype-server <port> [max_clients]")
        .parse()
        .expect("port must be a u16");
    let max_clients: u32 = args.next().and_then(|v| v.parse().ok()).unwrap_or(4);

    let addr = format!("0.0.0.0:{port}");
    let transport: Arc<dyn Transport> = WsTransport::bind(&addr).await.expect("failed to bind transport");
    log::info!("listening on {addr}, room capacity {max_clients}");

    let server = Server::new(transport, GameRules::default());
    let room_manager = Arc::clone(server.room_manager());
    room_manager.create_room("lobby", max_clients, false);

    if let Err(err) = server.run().await {
        log::error!("server loop exited: {err}");
    }
}
