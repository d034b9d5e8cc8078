//! One room's lifecycle and its dedicated simulation thread (spec §5).
//! Grounded in `original_source/server/Rooms/Room.cpp`'s state machine
//! (WAITING/STARTING/IN_PROGRESS/FINISHED, host re-designation to
//! `_players[0]`, `tryMarkGameStartSent` latch) and in the teacher's
//! `SyncRuntime` (`server/runtime/sync.rs`) for the "one thread, one
//! mpsc channel, recv_timeout-driven tick loop" shape.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, RwLock};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::game::{GameLogic, GameRules, FIXED_TIMESTEP};
use crate::protocol::{InputSnapshot, RoomMember, ServerMessage};
use crate::session::SessionManager;

use super::error::{RoomError, RoomResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomState {
    Waiting,
    Starting,
    InProgress,
    Finished,
}

enum RoomCommand {
    Join { player_id: u64, name: String, spectator: bool },
    Leave { player_id: u64 },
    StartGame { requested_by: u64 },
    Input { player_id: u64, snapshots: Vec<InputSnapshot> },
    Shutdown,
}

struct RoomShared {
    state: RwLock<RoomState>,
    players: RwLock<Vec<u64>>,
    spectators: RwLock<Vec<u64>>,
    host: RwLock<Option<u64>>,
    game_start_sent: AtomicBool,
}

/// A cheaply-cloneable reference to a running room. Dropping every
/// handle (and therefore the sender half of its command channel) is
/// what lets the simulation thread's `recv` eventually return `Err` and
/// the thread exit; `RoomManager` usually outlives all of its handles.
#[derive(Clone)]
pub struct RoomHandle {
    pub id: u32,
    pub name: String,
    pub max_players: u32,
    pub private: bool,
    commands: mpsc::Sender<RoomCommand>,
    shared: Arc<RoomShared>,
    _thread: Arc<JoinHandle<()>>,
}

impl RoomHandle {
    pub fn spawn(
        id: u32,
        name: String,
        max_players: u32,
        private: bool,
        rules: GameRules,
        session_manager: Arc<SessionManager>,
    ) -> Self {
        let (tx, rx) = mpsc::channel::<RoomCommand>();
        let shared = Arc::new(RoomShared {
            state: RwLock::new(RoomState::Waiting),
            players: RwLock::new(Vec::new()),
            spectators: RwLock::new(Vec::new()),
            host: RwLock::new(None),
            game_start_sent: AtomicBool::new(false),
        });

        let thread_shared = Arc::clone(&shared);
        let thread_name = name.clone();
        let thread = thread::Builder::new()
            .name(format!("room-{id}"))
            .spawn(move || run_room(id, thread_name, rx, thread_shared, rules, session_manager))
            .expect("failed to spawn room thread");

        Self {
            id,
            name,
            max_players,
            private,
            commands: tx,
            shared,
            _thread: Arc::new(thread),
        }
    }

    pub fn state(&self) -> RoomState {
        *self.shared.state.read().expect("room state lock poisoned")
    }

    pub fn player_count(&self) -> usize {
        self.shared.players.read().expect("room players lock poisoned").len()
    }

    pub fn is_full(&self) -> bool {
        self.player_count() as u32 >= self.max_players
    }

    pub fn host(&self) -> Option<u64> {
        *self.shared.host.read().expect("room host lock poisoned")
    }

    /// Flips the room's game-start latch from false to true and reports
    /// whether this call was the one that did it (spec §5
    /// `tryMarkGameStartSent`: guards against a race where two
    /// `StartGame` commands queue up before the state transition lands).
    pub fn try_mark_game_start_sent(&self) -> bool {
        self.shared
            .game_start_sent
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    pub fn members(&self) -> Vec<RoomMember> {
        let host = self.host();
        let players = self.shared.players.read().expect("room players lock poisoned").clone();
        let spectators = self.shared.spectators.read().expect("room spectators lock poisoned").clone();
        players
            .into_iter()
            .map(|id| RoomMember { player_id: id, name: String::new(), host: Some(id) == host, spectator: false })
            .chain(
                spectators
                    .into_iter()
                    .map(|id| RoomMember { player_id: id, name: String::new(), host: false, spectator: true }),
            )
            .collect()
    }

    pub fn join(&self, player_id: u64, name: &str, spectator: bool) -> RoomResult<()> {
        if !spectator {
            if self.is_full() {
                return Err(RoomError::Full(self.id));
            }
            if matches!(self.state(), RoomState::InProgress | RoomState::Finished) {
                return Err(RoomError::GameAlreadyInProgress(self.id));
            }
        }
        let _ = self.commands.send(RoomCommand::Join {
            player_id,
            name: name.to_string(),
            spectator,
        });
        Ok(())
    }

    pub fn leave(&self, player_id: u64) {
        let _ = self.commands.send(RoomCommand::Leave { player_id });
    }

    pub fn start_game(&self, requested_by: u64) -> RoomResult<()> {
        if self.host() != Some(requested_by) {
            return Err(RoomError::NotHost(self.id, requested_by));
        }
        if self.player_count() == 0 {
            return Err(RoomError::Empty(self.id));
        }
        let _ = self.commands.send(RoomCommand::StartGame { requested_by });
        Ok(())
    }

    pub fn submit_input(&self, player_id: u64, snapshots: Vec<InputSnapshot>) {
        let _ = self.commands.send(RoomCommand::Input { player_id, snapshots });
    }

    pub fn shutdown(&self) {
        let _ = self.commands.send(RoomCommand::Shutdown);
    }
}

fn run_room(
    room_id: u32,
    room_name: String,
    commands: mpsc::Receiver<RoomCommand>,
    shared: Arc<RoomShared>,
    rules: GameRules,
    session_manager: Arc<SessionManager>,
) {
    let mut logic = GameLogic::new(rules);
    let tick_duration = Duration::from_secs_f32(FIXED_TIMESTEP);
    let mut tick: u32 = 0;

    'outer: loop {
        match commands.recv_timeout(tick_duration) {
            Ok(command) => {
                if !apply_command(room_id, &room_name, command, &mut logic, &shared, &session_manager) {
                    break 'outer;
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => break 'outer,
        }

        while let Ok(command) = commands.try_recv() {
            if !apply_command(room_id, &room_name, command, &mut logic, &shared, &session_manager) {
                break 'outer;
            }
        }

        if *shared.state.read().expect("room state lock poisoned") == RoomState::InProgress {
            let report = logic.update(FIXED_TIMESTEP, tick);
            for (system, message) in &report.failures {
                log::error!("room {room_id} tick {tick}: system '{system}' panicked: {message}");
            }
            tick += 1;

            let recipients: Vec<u64> = shared
                .players
                .read()
                .expect("room players lock poisoned")
                .iter()
                .chain(shared.spectators.read().expect("room spectators lock poisoned").iter())
                .copied()
                .collect();
            let is_game_over = !logic.is_active();
            session_manager.broadcast(
                recipients.iter(),
                &ServerMessage::GameState { server_tick: tick, entities: logic.snapshot(), is_game_over },
            );

            if is_game_over {
                *shared.state.write().expect("room state lock poisoned") = RoomState::Finished;
            }
        }
    }
}

fn apply_command(
    room_id: u32,
    room_name: &str,
    command: RoomCommand,
    logic: &mut GameLogic,
    shared: &Arc<RoomShared>,
    session_manager: &Arc<SessionManager>,
) -> bool {
    match command {
        RoomCommand::Join { player_id, name, spectator } => {
            if spectator {
                shared.spectators.write().expect("room spectators lock poisoned").push(player_id);
            } else {
                let mut players = shared.players.write().expect("room players lock poisoned");
                if players.contains(&player_id) {
                    return true;
                }
                players.push(player_id);
                let mut host = shared.host.write().expect("room host lock poisoned");
                if host.is_none() {
                    *host = Some(player_id);
                    log::info!("room {room_id}: player {player_id} is host");
                }
                drop(players);
                drop(host);

                if *shared.state.read().expect("room state lock poisoned") == RoomState::InProgress {
                    if let Ok(entity) = logic.spawn_player(player_id, &name) {
                        session_manager.send(
                            player_id,
                            &ServerMessage::GameStart {
                                your_entity_id: entity.index(),
                                server_tick: logic.tick(),
                                entities: logic.snapshot(),
                            },
                        );
                    }
                }
            }
            broadcast_room_state(room_name, shared, session_manager);
            true
        }

        RoomCommand::Leave { player_id } => {
            let mut players = shared.players.write().expect("room players lock poisoned");
            let was_player = if let Some(pos) = players.iter().position(|id| *id == player_id) {
                players.remove(pos);
                true
            } else {
                false
            };
            if was_player {
                let mut host = shared.host.write().expect("room host lock poisoned");
                if *host == Some(player_id) {
                    *host = players.first().copied();
                }
                let became_empty = players.is_empty();
                drop(players);
                drop(host);
                logic.despawn_player(player_id);

                let state = *shared.state.read().expect("room state lock poisoned");
                if became_empty && matches!(state, RoomState::InProgress | RoomState::Starting) {
                    *shared.state.write().expect("room state lock poisoned") = RoomState::Waiting;
                    shared.game_start_sent.store(false, Ordering::SeqCst);
                    log::info!("room {room_id}: reset to WAITING, no players left");
                }
            } else {
                drop(players);
                shared
                    .spectators
                    .write()
                    .expect("room spectators lock poisoned")
                    .retain(|id| *id != player_id);
            }
            broadcast_room_state(room_name, shared, session_manager);
            true
        }

        RoomCommand::StartGame { requested_by: _ } => {
            let state = *shared.state.read().expect("room state lock poisoned");
            if !matches!(state, RoomState::Waiting | RoomState::Starting) {
                return true;
            }
            let players = shared.players.read().expect("room players lock poisoned").clone();
            if players.is_empty() {
                return true;
            }
            if shared
                .game_start_sent
                .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
                .is_err()
            {
                return true;
            }

            logic.initialize(room_id as u64 ^ 0x5EED_0000_0000_0000);
            let mut spawned = Vec::new();
            for player_id in &players {
                if let Ok(entity) = logic.spawn_player(*player_id, &format!("Player{player_id}")) {
                    spawned.push((*player_id, entity));
                } else {
                    log::error!("room {room_id}: failed to spawn player {player_id}");
                }
            }

            *shared.state.write().expect("room state lock poisoned") = RoomState::InProgress;
            let snapshot = logic.snapshot();
            for (player_id, entity) in spawned {
                session_manager.send(
                    player_id,
                    &ServerMessage::GameStart {
                        your_entity_id: entity.index(),
                        server_tick: logic.tick(),
                        entities: snapshot.clone(),
                    },
                );
            }
            log::info!("room {room_id}: game started with {} players", players.len());
            true
        }

        RoomCommand::Input { player_id, snapshots } => {
            for snapshot in snapshots {
                let (dx, dy) = snapshot.movement();
                logic.process_input(player_id, dx, dy, snapshot.shoot(), snapshot.seq);
            }
            true
        }

        RoomCommand::Shutdown => false,
    }
}

fn broadcast_room_state(room_name: &str, shared: &Arc<RoomShared>, session_manager: &Arc<SessionManager>) {
    let host = *shared.host.read().expect("room host lock poisoned");
    let players = shared.players.read().expect("room players lock poisoned").clone();
    let spectators = shared.spectators.read().expect("room spectators lock poisoned").clone();

    let members: Vec<RoomMember> = players
        .iter()
        .map(|id| RoomMember { player_id: *id, name: String::new(), host: Some(*id) == host, spectator: false })
        .chain(
            spectators
                .iter()
                .map(|id| RoomMember { player_id: *id, name: String::new(), host: false, spectator: true }),
        )
        .collect();

    let recipients: Vec<u64> = players.iter().chain(spectators.iter()).copied().collect();
    session_manager.broadcast(
        recipients.iter(),
        &ServerMessage::RoomState { room_name: room_name.to_string(), members },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::{PeerId, SendFlags, Transport, TransportEvent, TransportResult};
    use std::time::Duration;

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
        thread::sleep(Duration::from_millis(50));
    }

    fn spawn_room() -> RoomHandle {
        let session_manager = Arc::new(SessionManager::new(Arc::new(NullTransport)));
        RoomHandle::spawn(1, "lobby".to_string(), 4, false, GameRules::default(), session_manager)
    }

    #[test]
    fn room_state_starts_waiting() {
        let room = spawn_room();
        assert_eq!(room.state(), RoomState::Waiting);
    }

    #[test]
    fn first_joiner_becomes_host_and_starting_enters_in_progress() {
        let room = spawn_room();
        room.join(1, "one", false).unwrap();
        settle();
        assert_eq!(room.host(), Some(1));
        assert_eq!(room.player_count(), 1);

        room.start_game(1).unwrap();
        settle();
        assert_eq!(room.state(), RoomState::InProgress);
    }

    #[test]
    fn room_resets_to_waiting_when_last_player_leaves_mid_game() {
        let room = spawn_room();
        room.join(1, "one", false).unwrap();
        settle();
        room.start_game(1).unwrap();
        settle();
        assert_eq!(room.state(), RoomState::InProgress);

        room.leave(1);
        settle();
        assert_eq!(room.state(), RoomState::Waiting);
        assert_eq!(room.host(), None);
    }

    #[test]
    fn host_is_reassigned_to_earliest_remaining_joiner() {
        let room = spawn_room();
        room.join(1, "one", false).unwrap();
        room.join(2, "two", false).unwrap();
        settle();
        assert_eq!(room.host(), Some(1));

        room.leave(1);
        settle();
        assert_eq!(room.host(), Some(2));
    }
}
