//! Ties [`Replicator`], [`PredictionEngine`], [`EntityCache`] and
//! [`InputHistory`] into the client's per-tick update (spec §4.5, §6):
//! queue local input, send the redundant input batch, fold in whatever the
//! server has sent since the last call, and reconcile the locally
//! controlled entity against its latest authoritative state.

use std::time::Instant;

use crate::game::rules::GameRules;
use crate::protocol::{ClientMessage, EntityState, ServerMessage};

use super::entity_cache::EntityCache;
use super::error::ClientResult;
use super::input_history::{InputHistory, DEFAULT_CAPACITY};
use super::prediction::PredictionEngine;
use super::replicator::Replicator;

/// How many `poll()` calls (one per local tick) elapse between RTT
/// samples. At the 60Hz tick rate this is about once a second.
const PING_INTERVAL_TICKS: u32 = 60;

/// Everything a client needs to drive one connected game session: network
/// I/O, local prediction for the player's own entity, and interpolated
/// state for everyone else's.
pub struct GameLoopClient {
    replicator: Replicator,
    history: InputHistory,
    prediction: PredictionEngine,
    remote: EntityCache,
    my_entity_id: Option<u32>,
    server_tick: u32,
    rtt_ms: f32,
    game_over: bool,
    next_seq: u32,
    next_ping_token: u64,
    pending_ping: Option<(u64, Instant)>,
    ticks_since_ping: u32,
}

impl GameLoopClient {
    pub fn new(replicator: Replicator, rules: &GameRules) -> Self {
        Self {
            replicator,
            history: InputHistory::new(DEFAULT_CAPACITY),
            prediction: PredictionEngine::new(rules.player_spawn_x, rules.player_spawn_y, rules.player_speed),
            remote: EntityCache::new(),
            my_entity_id: None,
            server_tick: 0,
            rtt_ms: 0.0,
            game_over: false,
            next_seq: 1,
            next_ping_token: 1,
            pending_ping: None,
            ticks_since_ping: 0,
        }
    }

    pub fn my_entity_id(&self) -> Option<u32> {
        self.my_entity_id
    }

    pub fn server_tick(&self) -> u32 {
        self.server_tick
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn local_position(&self) -> (f32, f32) {
        self.prediction.position()
    }

    pub fn remote_entities(&self) -> &EntityCache {
        &self.remote
    }

    fn set_rtt_ms(&mut self, rtt_ms: f32) {
        self.rtt_ms = rtt_ms;
    }

    /// Applies one tick of local movement/shoot input immediately and
    /// queues it to be flushed by [`Self::flush_input`].
    pub fn queue_input(&mut self, dx: i8, dy: i8, shoot: bool) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.prediction.apply_local_input(dx, dy);
        self.history.push(seq, dx, dy, shoot);
    }

    /// Sends the redundant input batch accumulated since the last flush.
    pub fn flush_input(&self) -> ClientResult<()> {
        if self.history.is_empty() {
            return Ok(());
        }
        self.replicator.send(&ClientMessage::PlayerInput { snapshots: self.history.batch() })
    }

    /// Drains every message currently waiting in the replicator's inbox
    /// without blocking, folding each into local state, then sends a
    /// fresh `Ping` if enough ticks have passed since the last one
    /// resolved (spec §4.6: RTT feeds the adaptive reconciliation
    /// threshold).
    pub fn poll(&mut self) {
        while let Ok(message) = self.replicator.try_recv() {
            self.apply_server_message(message);
        }

        self.ticks_since_ping += 1;
        if self.pending_ping.is_none() && self.ticks_since_ping >= PING_INTERVAL_TICKS {
            self.ticks_since_ping = 0;
            let token = self.next_ping_token;
            self.next_ping_token += 1;
            if self.replicator.send(&ClientMessage::Ping { timestamp: token }).is_ok() {
                self.pending_ping = Some((token, Instant::now()));
            }
        }
    }

    fn apply_server_message(&mut self, message: ServerMessage) {
        match message {
            ServerMessage::GameStart { your_entity_id, server_tick, entities } => {
                self.my_entity_id = Some(your_entity_id);
                self.server_tick = server_tick;
                self.game_over = false;
                self.ingest_entities(&entities);
            }
            ServerMessage::GameState { server_tick, entities, is_game_over } => {
                self.server_tick = server_tick;
                self.game_over = is_game_over;
                self.ingest_entities(&entities);
            }
            ServerMessage::Pong { timestamp } => {
                if let Some((token, sent_at)) = self.pending_ping {
                    if token == timestamp {
                        self.set_rtt_ms(sent_at.elapsed().as_secs_f32() * 1000.0);
                        self.pending_ping = None;
                    }
                }
            }
            _ => {}
        }
    }

    fn ingest_entities(&mut self, entities: &[EntityState]) {
        let mut remote_states = Vec::with_capacity(entities.len());
        for entity in entities {
            if Some(entity.entity_id) == self.my_entity_id {
                self.history.acknowledge(entity.last_processed_input_seq);
                self.prediction.reconcile(entity.x, entity.y, self.rtt_ms, &self.history);
            } else {
                remote_states.push(entity.clone());
            }
        }
        self.remote.ingest(&remote_states);
    }
}
