pub mod ai;
pub mod boundary;
pub mod buff;
pub mod collision;
pub mod health;
pub mod input;
pub mod movement;
pub mod spawn;

use std::collections::HashMap;

use crate::ecs::{EntityId, Registry};
use crate::game::rng::DeterministicRng;
use crate::game::rules::GameRules;
use crate::game::wave::{EnemySpawnRequest, SpawnStrategy};

/// One queued player input, carried in from `GameLogic::process_input`
/// (spec §4.3/§4.5). `dx`/`dy` ∈ {-1,0,1}.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputCommand {
    pub seq: u32,
    pub dx: i8,
    pub dy: i8,
    pub shoot: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct DamageEvent {
    pub target: EntityId,
    pub amount: i32,
}

#[derive(Debug, Clone, Copy)]
pub struct ProjectileSpawnRequest {
    pub owner: EntityId,
    pub friendly: bool,
    pub damage: i32,
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
    pub speed: f32,
}

/// Per-tick scratch state threaded through the pipeline. Not persisted
/// across ticks except `tick` and the rng, both owned by `GameLogic`.
pub struct TickContext<'a> {
    pub tick: u32,
    pub rules: &'a GameRules,
    pub player_entities: &'a HashMap<u64, EntityId>,
    pub input_queues: &'a mut HashMap<u64, Vec<InputCommand>>,
    pub pending_damage: Vec<DamageEvent>,
    pub pending_projectile_spawns: Vec<ProjectileSpawnRequest>,
    pub pending_enemy_spawns: Vec<EnemySpawnRequest>,
    pub reap_list: Vec<EntityId>,
    pub rng: &'a mut DeterministicRng,
    pub wave_script: &'a mut dyn SpawnStrategy,
    pub tick_failures: Vec<(&'static str, String)>,
}

/// Each system reads/writes the registry and the shared tick context.
/// Spec §4.2: a system "exposes `update(registry, dt)`"; `TickContext`
/// carries the extra per-tick state (queues, pending events) that a single
/// `registry` argument cannot.
pub trait System: Send {
    fn name(&self) -> &'static str;
    fn update(&mut self, registry: &mut Registry, ctx: &mut TickContext, dt: f32);
}

/// Fixed, deterministic ordering of the first eight pipeline phases (spec
/// §4.2). Reaping (9) and Snapshot/tick-advance (10) are driven directly by
/// `GameLogic::update` since they need direct access to the tick counter
/// and are not pluggable.
pub struct SystemPipeline {
    systems: Vec<Box<dyn System>>,
}

impl SystemPipeline {
    pub fn new() -> Self {
        Self {
            systems: vec![
                Box::new(input::InputApplicationSystem),
                Box::new(buff::BuffSystem),
                Box::new(movement::MovementSystem),
                Box::new(collision::CollisionSystem),
                Box::new(health::HealthSystem),
                Box::new(ai::AiSystem),
                Box::new(spawn::SpawnSystem),
                Box::new(boundary::BoundarySystem),
            ],
        }
    }

    /// Runs every system in order. A system that panics is caught at its
    /// boundary (spec §4.2 "Failure semantics" / §7 propagation policy):
    /// the failure is recorded in `ctx.tick_failures`, and the tick
    /// continues with the next system.
    pub fn run(&mut self, registry: &mut Registry, ctx: &mut TickContext, dt: f32) {
        for system in self.systems.iter_mut() {
            let name = system.name();
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                system.update(registry, ctx, dt);
            }));
            if let Err(payload) = result {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "system panicked".to_string());
                ctx.tick_failures.push((name, message));
            }
        }
    }
}

impl Default for SystemPipeline {
    fn default() -> Self {
        Self::new()
    }
}
