use crate::ecs::EnemyTypeTag;

/// One request to spawn an enemy, produced by a [`SpawnStrategy`] and
/// consumed by the Spawn system (spec §4.2 phase 7).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemySpawnRequest {
    pub type_tag: EnemyTypeTag,
    pub x: f32,
    pub y: f32,
    pub health: i32,
}

/// Opaque "spawn strategy" plugin interface (spec §1: Lua scripting for
/// enemy waves is deliberately out of scope; this is the seam the core
/// exposes to that external collaborator). `on_tick` is invoked once per
/// Spawn phase and may hand back zero or more enemy spawns; the core makes
/// no assumption about what decides those spawns.
pub trait SpawnStrategy: Send {
    fn on_game_start(&mut self, seed: u64);
    fn on_tick(&mut self, tick: u32) -> Vec<EnemySpawnRequest>;
}

/// Minimum built-in strategy: a fixed, deterministic wave cadence. Real
/// deployments are expected to supply their own `SpawnStrategy` (e.g. a
/// Lua-backed one); this implementation only exists so the core is
/// runnable and testable standalone.
pub struct FixedCadenceWaveScript {
    seed: u64,
    rng: crate::game::rng::DeterministicRng,
    interval_ticks: u32,
    spawn_x: f32,
    world_height: f32,
}

impl FixedCadenceWaveScript {
    pub fn new(interval_ticks: u32, spawn_x: f32, world_height: f32) -> Self {
        Self {
            seed: 0,
            rng: crate::game::rng::DeterministicRng::new(1),
            interval_ticks,
            spawn_x,
            world_height,
        }
    }
}

impl SpawnStrategy for FixedCadenceWaveScript {
    fn on_game_start(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = crate::game::rng::DeterministicRng::new(seed);
    }

    fn on_tick(&mut self, tick: u32) -> Vec<EnemySpawnRequest> {
        if self.interval_ticks == 0 || tick % self.interval_ticks != 0 {
            return Vec::new();
        }
        let y = self.rng.range_f32(40.0, self.world_height - 40.0);
        vec![EnemySpawnRequest {
            type_tag: EnemyTypeTag::Drone,
            x: self.spawn_x,
            y,
            health: 30,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_produces_same_wave_sequence() {
        let mut a = FixedCadenceWaveScript::new(60, 1600.0, 900.0);
        let mut b = FixedCadenceWaveScript::new(60, 1600.0, 900.0);
        a.on_game_start(1234);
        b.on_game_start(1234);
        for tick in 0..240 {
            assert_eq!(a.on_tick(tick), b.on_tick(tick));
        }
    }

    #[test]
    fn no_spawn_off_cadence() {
        let mut w = FixedCadenceWaveScript::new(60, 1600.0, 900.0);
        w.on_game_start(1);
        assert!(w.on_tick(1).is_empty());
        assert!(!w.on_tick(60).is_empty());
    }
}
