//! Session bookkeeping: which transport peer a player is, whether they
//! have authenticated, and which room they currently belong to (spec
//! §3/§5). Grounded in the teacher's `SessionManager` (`server/protocol.rs`),
//! generalized from "a channel per player" to "a peer + auth + room
//! record per player" since this protocol has an explicit handshake and
//! room membership instead of a generic pub/sub subscription table.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::net::{PeerId, SendFlags, Transport};
use crate::protocol::ServerMessage;

use super::error::{SessionError, SessionResult};

#[derive(Debug, Clone)]
pub struct Session {
    pub player_id: u64,
    pub peer: PeerId,
    pub display_name: String,
    pub authed_username: Option<String>,
    pub room_id: Option<u32>,
}

pub struct SessionManager {
    transport: Arc<dyn Transport>,
    sessions: RwLock<HashMap<u64, Session>>,
    peer_to_player: RwLock<HashMap<PeerId, u64>>,
    next_player_id: AtomicU64,
}

impl SessionManager {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            sessions: RwLock::new(HashMap::new()),
            peer_to_player: RwLock::new(HashMap::new()),
            next_player_id: AtomicU64::new(1),
        }
    }

    /// A new transport peer connected; assigns it a player id ahead of
    /// the handshake request being answered (spec §4.7 `S2C_HANDSHAKE_ACK`).
    pub fn register(&self, peer: PeerId, display_name: &str) -> u64 {
        let player_id = self.next_player_id.fetch_add(1, Ordering::Relaxed);
        let session = Session {
            player_id,
            peer,
            display_name: display_name.to_string(),
            authed_username: None,
            room_id: None,
        };
        self.sessions.write().expect("session map lock poisoned").insert(player_id, session);
        self.peer_to_player.write().expect("peer map lock poisoned").insert(peer, player_id);
        player_id
    }

    pub fn player_for_peer(&self, peer: PeerId) -> Option<u64> {
        self.peer_to_player.read().expect("peer map lock poisoned").get(&peer).copied()
    }

    pub fn authenticate(&self, player_id: u64, username: &str) -> SessionResult<()> {
        let mut sessions = self.sessions.write().expect("session map lock poisoned");
        let session = sessions.get_mut(&player_id).ok_or(SessionError::UnknownPlayer(player_id))?;
        session.authed_username = Some(username.to_string());
        Ok(())
    }

    pub fn set_room(&self, player_id: u64, room_id: Option<u32>) {
        if let Some(session) =
            self.sessions.write().expect("session map lock poisoned").get_mut(&player_id)
        {
            session.room_id = room_id;
        }
    }

    pub fn session(&self, player_id: u64) -> Option<Session> {
        self.sessions.read().expect("session map lock poisoned").get(&player_id).cloned()
    }

    pub fn disconnect(&self, player_id: u64) -> Option<Session> {
        let session =
            self.sessions.write().expect("session map lock poisoned").remove(&player_id)?;
        self.peer_to_player.write().expect("peer map lock poisoned").remove(&session.peer);
        self.transport.disconnect(session.peer);
        Some(session)
    }

    pub fn send(&self, player_id: u64, message: &ServerMessage) {
        let peer = match self.sessions.read().expect("session map lock poisoned").get(&player_id) {
            Some(session) => session.peer,
            None => return,
        };
        let flags: SendFlags = message.reliability().into();
        let _ = self.transport.send(peer, flags, message.encode());
    }

    pub fn broadcast<'a>(&self, player_ids: impl Iterator<Item = &'a u64>, message: &ServerMessage) {
        let flags: SendFlags = message.reliability().into();
        let bytes = message.encode();
        let sessions = self.sessions.read().expect("session map lock poisoned");
        for player_id in player_ids {
            if let Some(session) = sessions.get(player_id) {
                let _ = self.transport.send(session.peer, flags, bytes.clone());
            }
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::TransportEvent;

    struct NullTransport;
    impl Transport for NullTransport {
        fn events(&self) -> async_channel::Receiver<TransportEvent> {
            async_channel::unbounded().1
        }
        fn send(&self, _peer: PeerId, _flags: SendFlags, _bytes: Vec<u8>) -> crate::net::TransportResult<()> {
            Ok(())
        }
        fn disconnect(&self, _peer: PeerId) {}
    }

    #[test]
    fn register_then_disconnect_clears_peer_mapping() {
        let manager = SessionManager::new(Arc::new(NullTransport));
        let player_id = manager.register(PeerId(1), "alice");
        assert_eq!(manager.player_for_peer(PeerId(1)), Some(player_id));
        manager.disconnect(player_id);
        assert_eq!(manager.player_for_peer(PeerId(1)), None);
    }

    #[test]
    fn authenticate_unknown_player_is_an_error() {
        let manager = SessionManager::new(Arc::new(NullTransport));
        assert!(manager.authenticate(999, "bob").is_err());
    }
}
