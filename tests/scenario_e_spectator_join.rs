//! Joining a room already IN_PROGRESS admits the newcomer as a spectator
//! rather than rejecting them or growing the active player count.

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
fn late_joiner_to_an_in_progress_room_becomes_a_spectator() {
    let session_manager = Arc::new(SessionManager::new(Arc::new(NullTransport)));
    let room = RoomHandle::spawn(1, "R".to_string(), 4, false, GameRules::default(), session_manager);

    room.join(1, "one", false).unwrap();
    room.join(2, "two", false).unwrap();
    settle();
    room.start_game(1).unwrap();
    settle();
    assert_eq!(room.state(), RoomState::InProgress);

    // Mirrors what the server façade does: decide `spectator` from the
    // room's current state before calling join.
    let spectator = room.state() == RoomState::InProgress;
    assert!(spectator);
    room.join(3, "three", spectator).unwrap();
    settle();

    assert_eq!(room.player_count(), 2, "spectators do not count as players");
    let members = room.members();
    let third = members.iter().find(|m| m.player_id == 3).expect("third member present");
    assert!(third.spectator);
    assert!(!third.host);
}
