//! Creates rooms, looks them up, and runs matchmaking (spec §5).

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, RwLock};

use crate::game::GameRules;
use crate::protocol::RoomSummary;
use crate::session::SessionManager;

use super::error::{RoomError, RoomResult};
use super::matchmaking::{FifoPolicy, MatchmakingPolicy};
use super::room::{RoomHandle, RoomState};

pub struct RoomManager {
    rooms: RwLock<HashMap<u32, RoomHandle>>,
    next_id: AtomicU32,
    rules: GameRules,
    session_manager: Arc<SessionManager>,
    policy: Box<dyn MatchmakingPolicy>,
}

impl RoomManager {
    pub fn new(rules: GameRules, session_manager: Arc<SessionManager>) -> Self {
        Self::with_policy(rules, session_manager, Box::new(FifoPolicy))
    }

    pub fn with_policy(
        rules: GameRules,
        session_manager: Arc<SessionManager>,
        policy: Box<dyn MatchmakingPolicy>,
    ) -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            next_id: AtomicU32::new(1),
            rules,
            session_manager,
            policy,
        }
    }

    pub fn create_room(&self, name: &str, max_players: u32, private: bool) -> RoomHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let handle = RoomHandle::spawn(
            id,
            if name.is_empty() { format!("room-{id}") } else { name.to_string() },
            max_players,
            private,
            self.rules,
            Arc::clone(&self.session_manager),
        );
        self.rooms.write().expect("room map lock poisoned").insert(id, handle.clone());
        handle
    }

    pub fn get(&self, room_id: u32) -> RoomResult<RoomHandle> {
        self.rooms
            .read()
            .expect("room map lock poisoned")
            .get(&room_id)
            .cloned()
            .ok_or(RoomError::NotFound(room_id))
    }

    pub fn remove_finished(&self) {
        self.rooms
            .write()
            .expect("room map lock poisoned")
            .retain(|_, room| room.state() != RoomState::Finished);
    }

    /// Picks a room to join via the configured policy, creating a fresh
    /// public room if none qualifies (spec §5, matchmaking Open Question).
    pub fn find_or_create_room(&self) -> RoomHandle {
        let rooms = self.rooms.read().expect("room map lock poisoned");
        let candidates: Vec<RoomHandle> =
            rooms.values().filter(|room| !room.private).cloned().collect();
        drop(rooms);

        if let Some(room) = self.policy.select(&candidates) {
            return room.clone();
        }
        self.create_room("", 4, false)
    }

    pub fn list_public_rooms(&self) -> Vec<RoomSummary> {
        self.rooms
            .read()
            .expect("room map lock poisoned")
            .values()
            .filter(|room| !room.private)
            .map(|room| RoomSummary {
                room_id: room.id,
                name: room.name.clone(),
                count: room.player_count() as u32,
                max: room.max_players,
                private: room.private,
                state: match room.state() {
                    RoomState::Waiting => 0,
                    RoomState::Starting => 1,
                    RoomState::InProgress => 2,
                    RoomState::Finished => 3,
                },
            })
            .collect()
    }
}
