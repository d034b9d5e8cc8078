//! Headless demo client. Usage: `rtype-client <host> <port>`. Connects,
//! joins the lobby room, and logs game state as it arrives; exists to
//! exercise the protocol and client module end to end without a renderer.

use rtype_core::client::{GameLoopClient, Replicator};
use rtype_core::game::GameRules;
use rtype_core::protocol::ClientMessage;

#[tokio::main]
async fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let host = args.next().expect("usage: rtype-client <host> <port>");
    let port = args.next().expect("usage: rtype-client <host> <port>");

    let url = format!("ws://{host}:{port}");
    let replicator = Replicator::connect(&url).await.expect("failed to connect");
    replicator
        .send(&ClientMessage::HandshakeRequest { player_name: "demo".to_string() })
        .expect("failed to send handshake");
    replicator.send(&ClientMessage::JoinRoom { room_id: 1 }).expect("failed to send join");
    replicator.send(&ClientMessage::StartGame).expect("failed to send start");

    let mut client = GameLoopClient::new(replicator, &GameRules::default());

    let mut ticker = tokio::time::interval(std::time::Duration::from_millis(16));
    loop {
        ticker.tick().await;
        client.queue_input(1, 0, false);
        let _ = client.flush_input();
        client.poll();

        if client.my_entity_id().is_some() {
            let (x, y) = client.local_position();
            log::info!("tick {} local position ({x:.1}, {y:.1})", client.server_tick());
        }
        if client.is_game_over() {
            log::info!("game over at tick {}", client.server_tick());
            break;
        }
    }
}
