//! The `GameLogic` façade: owns the registry and the system pipeline for
//! one room's simulation, and is the only thing a room's runtime thread
//! talks to (spec §4/§5).

use std::collections::HashMap;

use crate::ecs::{
    Buff, Collider, EnemyTypeTag, Enemy, Health, Player, Projectile, Registry, Sprite, SpriteRect,
    Transform, Velocity, Weapon,
};
use crate::protocol::{EntityState, EntityTypeTag};

use super::error::{GameLogicError, GameLogicResult};
use super::rng::DeterministicRng;
use super::rules::GameRules;
use super::systems::{InputCommand, SystemPipeline, TickContext};
use super::wave::{FixedCadenceWaveScript, SpawnStrategy};

const PLAYER_RADIUS: f32 = 16.0;

/// One tick's worth of observations a room's runtime wants to act on
/// (logging, detecting death, deciding the game is over).
#[derive(Debug, Default)]
pub struct TickReport {
    pub reaped: Vec<crate::ecs::EntityId>,
    pub failures: Vec<(&'static str, String)>,
}

pub struct GameLogic {
    registry: Registry,
    pipeline: SystemPipeline,
    rules: GameRules,
    rng: DeterministicRng,
    wave_script: Box<dyn SpawnStrategy>,
    player_entities: HashMap<u64, crate::ecs::EntityId>,
    input_queues: HashMap<u64, Vec<InputCommand>>,
    last_enqueued_seq: HashMap<u64, u32>,
    tick: u32,
}

impl GameLogic {
    pub fn new(rules: GameRules) -> Self {
        let wave_script: Box<dyn SpawnStrategy> = Box::new(FixedCadenceWaveScript::new(
            180,
            rules.world_width,
            rules.world_height,
        ));
        Self {
            registry: Registry::new(),
            pipeline: SystemPipeline::new(),
            rules,
            rng: DeterministicRng::new(1),
            wave_script,
            player_entities: HashMap::new(),
            input_queues: HashMap::new(),
            last_enqueued_seq: HashMap::new(),
            tick: 0,
        }
    }

    /// Resets tick counter and seeds the deterministic rng and wave
    /// script, both from the same seed (spec §8 determinism property).
    pub fn initialize(&mut self, seed: u64) {
        self.tick = 0;
        self.rng = DeterministicRng::new(seed);
        self.wave_script.on_game_start(seed);
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    pub fn rules_mut(&mut self) -> &mut GameRules {
        &mut self.rules
    }

    pub fn tick(&self) -> u32 {
        self.tick
    }

    pub fn is_active(&self) -> bool {
        !self.player_entities.is_empty()
    }

    pub fn player_entity(&self, player_id: u64) -> Option<crate::ecs::EntityId> {
        self.player_entities.get(&player_id).copied()
    }

    pub fn spawn_player(&mut self, player_id: u64, name: &str) -> GameLogicResult<crate::ecs::EntityId> {
        if self.player_entities.contains_key(&player_id) {
            return Err(GameLogicError::PlayerAlreadyPresent(player_id));
        }
        let entity = self.registry.new_entity();
        self.registry.set(
            entity,
            Transform { x: self.rules.player_spawn_x, y: self.rules.player_spawn_y },
        );
        self.registry.set(entity, Velocity::new(self.rules.player_speed));
        self.registry.set(entity, Health::new(self.rules.player_health));
        self.registry
            .set(entity, Weapon::new(self.rules.player_damage, self.rules.player_fire_rate));
        self.registry.set(entity, Collider { radius: PLAYER_RADIUS });
        self.registry.set(entity, Buff::default());
        self.registry.set(
            entity,
            Player {
                external_player_id: player_id,
                display_name: name.to_string(),
                last_processed_input_seq: 0,
            },
        );
        self.registry.set(
            entity,
            Sprite {
                animation_tag: "idle".to_string(),
                src_rect: SpriteRect { x: 0, y: 0, w: 32, h: 32 },
            },
        );

        self.player_entities.insert(player_id, entity);
        self.input_queues.insert(player_id, Vec::new());
        self.last_enqueued_seq.insert(player_id, 0);
        Ok(entity)
    }

    /// Idempotent: despawning a player not present is a no-op (spec §5
    /// disconnect handling).
    pub fn despawn_player(&mut self, player_id: u64) {
        if let Some(entity) = self.player_entities.remove(&player_id) {
            self.registry.destroy(entity);
        }
        self.input_queues.remove(&player_id);
        self.last_enqueued_seq.remove(&player_id);
    }

    /// Enqueues one input command, dropping it if its sequence number is
    /// not newer than the last one already processed or already queued
    /// for this player (spec §4.5/§4.7 redundant-batch de-duplication).
    pub fn process_input(&mut self, player_id: u64, dx: i8, dy: i8, shoot: bool, seq: u32) {
        let Some(&entity) = self.player_entities.get(&player_id) else {
            return;
        };
        let already_processed = self
            .registry
            .get::<Player>(entity)
            .map(|p| p.last_processed_input_seq)
            .unwrap_or(0);
        if seq <= already_processed {
            return;
        }
        let last_enqueued = self.last_enqueued_seq.get(&player_id).copied().unwrap_or(0);
        if seq <= last_enqueued && last_enqueued != 0 {
            return;
        }
        if let Some(queue) = self.input_queues.get_mut(&player_id) {
            queue.push(InputCommand { seq, dx, dy, shoot });
            self.last_enqueued_seq.insert(player_id, seq);
        }
    }

    /// Runs phases 1-8 through the pipeline, then phase 9 (Reaping) and
    /// phase 10 (tick advance) directly, since both need the tick counter
    /// and entity-destruction access the pluggable systems don't have
    /// (spec §4.2).
    pub fn update(&mut self, dt: f32, current_tick: u32) -> TickReport {
        self.tick = current_tick;
        let mut ctx = TickContext {
            tick: current_tick,
            rules: &self.rules,
            player_entities: &self.player_entities,
            input_queues: &mut self.input_queues,
            pending_damage: Vec::new(),
            pending_projectile_spawns: Vec::new(),
            pending_enemy_spawns: Vec::new(),
            reap_list: Vec::new(),
            rng: &mut self.rng,
            wave_script: self.wave_script.as_mut(),
            tick_failures: Vec::new(),
        };

        self.pipeline.run(&mut self.registry, &mut ctx, dt);

        let reaped = ctx.reap_list.clone();
        for entity in ctx.reap_list.drain(..) {
            self.registry.destroy(entity);
        }
        self.player_entities
            .retain(|_, entity| self.registry.is_alive(*entity));

        TickReport { reaped, failures: ctx.tick_failures }
    }

    /// Phase 10: a full snapshot of every renderable entity, for
    /// `S2C_GAME_START`/`S2C_GAME_STATE` (spec §4.7).
    pub fn snapshot(&self) -> Vec<EntityState> {
        let mut out = Vec::new();
        for entity in self.registry.view1::<Transform>() {
            let transform = *self.registry.get::<Transform>(entity).unwrap();

            let (type_tag, health) = if let Some(player) = self.registry.get::<Player>(entity) {
                let health = self.registry.get::<Health>(entity).map(|h| h.current);
                (EntityTypeTag::Player, health)
            } else if let Some(enemy) = self.registry.get::<Enemy>(entity) {
                let tag = match enemy.type_tag {
                    EnemyTypeTag::Drone => EntityTypeTag::EnemyDrone,
                    EnemyTypeTag::Turret => EntityTypeTag::EnemyTurret,
                    EnemyTypeTag::Boss => EntityTypeTag::EnemyBoss,
                };
                let health = self.registry.get::<Health>(entity).map(|h| h.current);
                (tag, health)
            } else if self.registry.get::<Projectile>(entity).is_some() {
                (EntityTypeTag::Projectile, None)
            } else {
                continue;
            };

            let last_processed_input_seq = self
                .registry
                .get::<Player>(entity)
                .map(|p| p.last_processed_input_seq)
                .unwrap_or(0);

            let (animation_tag, sprite_src_rect) = match self.registry.get::<Sprite>(entity) {
                Some(sprite) => (sprite.animation_tag.clone(), sprite.src_rect),
                None => (String::new(), SpriteRect { x: 0, y: 0, w: 0, h: 0 }),
            };

            out.push(EntityState {
                entity_id: entity.index(),
                type_tag,
                x: transform.x,
                y: transform.y,
                health,
                animation_tag,
                sprite_src_rect: crate::protocol::SpriteRect {
                    x: sprite_src_rect.x,
                    y: sprite_src_rect.y,
                    w: sprite_src_rect.w,
                    h: sprite_src_rect.h,
                },
                last_processed_input_seq,
            });
        }
        out
    }
}
