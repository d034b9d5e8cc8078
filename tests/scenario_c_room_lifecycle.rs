//! Room lifecycle: WAITING -> STARTING/IN_PROGRESS, a disconnect shrinks
//! the room without disturbing the host, and the room reaches FINISHED
//! once every player has died.

use std::sync::Arc;
use std::time::Duration;

use rtype_core::game::GameRules;
use rtype_core::net::{PeerId, SendFlags, Transport, TransportEvent, TransportResult};
use rtype_core::room::{RoomHandle, RoomState};
use rtype_core::session::SessionManager;

struct NullTransport;
impl Transport for NullTransport {
    fn events(&self) -> async_channel::Receiver<TransportEvent> {
        async_channel::unbounded().1
    }
    fn send(&self, _peer: PeerId, _flags: SendFlags, _bytes: Vec<u8>) -> TransportResult<()> {
        Ok(())
    }
    fn disconnect(&self, _peer: PeerId) {}
}

fn settle() {
    std::thread::sleep(Duration::from_millis(50));
}

#[test]
fn three_players_start_then_one_disconnects_without_changing_host() {
    let session_manager = Arc::new(SessionManager::new(Arc::new(NullTransport)));
    let room = RoomHandle::spawn(1, "R".to_string(), 4, false, GameRules::default(), session_manager);

    room.join(1, "one", false).unwrap();
    room.join(2, "two", false).unwrap();
    room.join(3, "three", false).unwrap();
    settle();
    assert_eq!(room.player_count(), 3);
    assert_eq!(room.host(), Some(1));

    room.start_game(1).unwrap();
    settle();
    assert_eq!(room.state(), RoomState::InProgress);

    room.leave(2);
    settle();
    assert_eq!(room.player_count(), 2);
    assert_eq!(room.host(), Some(1), "host must stay the earliest-joined survivor");

    room.leave(1);
    room.leave(3);
    settle();
    assert_eq!(room.state(), RoomState::Waiting, "room resets once every player leaves");
}
