//! Wires a [`Transport`], [`SessionManager`] and [`RoomManager`]
//! together and routes decoded messages between them (spec §4.7/§5).
//! Grounded in the teacher's `server/protocol.rs` `connect`/`process_message`
//! free functions, folded into methods on one façade since this protocol
//! has a fixed, closed message catalog rather than a generic dispatch table.

use std::sync::Arc;

use crate::game::GameRules;
use crate::net::{PeerId, Transport, TransportEvent};
use crate::protocol::{ClientMessage, ServerMessage};
use crate::room::RoomManager;
use crate::session::SessionManager;

use super::error::ServerResult;

pub struct Server {
    transport: Arc<dyn Transport>,
    session_manager: Arc<SessionManager>,
    room_manager: Arc<RoomManager>,
}

impl Server {
    pub fn new(transport: Arc<dyn Transport>, rules: GameRules) -> Self {
        let session_manager = Arc::new(SessionManager::new(Arc::clone(&transport)));
        let room_manager = Arc::new(RoomManager::new(rules, Arc::clone(&session_manager)));
        Self { transport, session_manager, room_manager }
    }

    pub fn room_manager(&self) -> &Arc<RoomManager> {
        &self.room_manager
    }

    /// Drains the transport's event stream until it closes. Intended to
    /// be the main loop of a server binary (spec §6).
    pub async fn run(self) -> ServerResult<()> {
        let events = self.transport.events();
        while let Ok(event) = events.recv().await {
            match event {
                TransportEvent::Connected(peer) => {
                    log::debug!("transport peer connected: {peer}");
                }
                TransportEvent::Message(peer, bytes) => {
                    self.handle_message(peer, &bytes);
                }
                TransportEvent::Disconnected(peer) => {
                    self.handle_disconnect(peer);
                }
            }
        }
        Ok(())
    }

    fn handle_message(&self, peer: PeerId, bytes: &[u8]) {
        let message = match ClientMessage::decode(bytes) {
            Ok(message) => message,
            Err(err) => {
                log::warn!("malformed message from {peer}: {err}");
                return;
            }
        };

        if let ClientMessage::HandshakeRequest { player_name } = &message {
            let player_id = self.session_manager.register(peer, player_name);
            self.session_manager.send(player_id, &ServerMessage::HandshakeAck { assigned_player_id: player_id });
            return;
        }

        let Some(player_id) = self.session_manager.player_for_peer(peer) else {
            log::warn!("dropping message from unregistered peer {peer}");
            return;
        };
        self.route(player_id, message);
    }

    fn route(&self, player_id: u64, message: ClientMessage) {
        match message {
            ClientMessage::HandshakeRequest { .. } => {}

            ClientMessage::RegisterAccount { username, .. }
            | ClientMessage::LoginAccount { username, .. } => {
                let _ = self.session_manager.authenticate(player_id, &username);
                self.session_manager.send(
                    player_id,
                    &ServerMessage::AuthResult { ok: true, message: String::new(), authed_name: username },
                );
            }

            ClientMessage::RequestRoomList => {
                self.session_manager.send(
                    player_id,
                    &ServerMessage::RoomList { rooms: self.room_manager.list_public_rooms() },
                );
            }

            ClientMessage::CreateRoom { name, max_players, private } => {
                let room = self.room_manager.create_room(&name, max_players, private);
                let display_name =
                    self.session_manager.session(player_id).map(|s| s.display_name).unwrap_or_default();
                if room.join(player_id, &display_name, false).is_ok() {
                    self.session_manager.set_room(player_id, Some(room.id));
                }
                self.session_manager.send(player_id, &ServerMessage::CreateRoomResult { room_id: room.id });
            }

            ClientMessage::JoinRoom { room_id } => {
                // room_id 0 never names a real room (ids are minted from 1)
                // and is reserved as the matchmaking sentinel: let the
                // configured policy pick or create a room instead of
                // looking one up by id.
                let found = if room_id == 0 {
                    Some(self.room_manager.find_or_create_room())
                } else {
                    self.room_manager.get(room_id).ok()
                };
                let Some(room) = found else {
                    self.session_manager.send(
                        player_id,
                        &ServerMessage::LeftRoom {
                            player_id,
                            reason: crate::protocol::LeftRoomReason::RoomClosed,
                            message: "room does not exist".to_string(),
                        },
                    );
                    return;
                };
                let room_id = room.id;
                let spectator = room.state() == crate::room::RoomState::InProgress;
                let display_name =
                    self.session_manager.session(player_id).map(|s| s.display_name).unwrap_or_default();
                if room.join(player_id, &display_name, spectator).is_ok() {
                    self.session_manager.set_room(player_id, Some(room_id));
                }
            }

            ClientMessage::LeaveRoom => {
                if let Some(session) = self.session_manager.session(player_id) {
                    if let Some(room_id) = session.room_id {
                        if let Ok(room) = self.room_manager.get(room_id) {
                            room.leave(player_id);
                        }
                    }
                }
                self.session_manager.set_room(player_id, None);
            }

            ClientMessage::StartGame => {
                if let Some(room_id) = self.session_manager.session(player_id).and_then(|s| s.room_id)
                    && let Ok(room) = self.room_manager.get(room_id)
                {
                    if let Err(err) = room.start_game(player_id) {
                        log::debug!("player {player_id} could not start room {room_id}: {err}");
                    }
                }
            }

            ClientMessage::PlayerInput { snapshots } => {
                if let Some(room_id) = self.session_manager.session(player_id).and_then(|s| s.room_id)
                    && let Ok(room) = self.room_manager.get(room_id)
                {
                    room.submit_input(player_id, snapshots);
                }
            }

            ClientMessage::ChatMessage { text } => {
                if let Some(session) = self.session_manager.session(player_id)
                    && let Some(room_id) = session.room_id
                    && let Ok(room) = self.room_manager.get(room_id)
                {
                    let members: Vec<u64> = room.members().iter().map(|m| m.player_id).collect();
                    self.session_manager.broadcast(
                        members.iter(),
                        &ServerMessage::ChatMessage {
                            player_id,
                            name: session.display_name,
                            text,
                            timestamp: 0,
                        },
                    );
                }
            }

            ClientMessage::Ping { timestamp } => {
                self.session_manager.send(player_id, &ServerMessage::Pong { timestamp });
            }
        }
    }

    fn handle_disconnect(&self, peer: PeerId) {
        let Some(player_id) = self.session_manager.player_for_peer(peer) else { return };
        if let Some(session) = self.session_manager.session(player_id)
            && let Some(room_id) = session.room_id
            && let Ok(room) = self.room_manager.get(room_id)
        {
            room.leave(player_id);
        }
        self.session_manager.disconnect(player_id);
    }
}
