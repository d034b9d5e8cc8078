use crate::ecs::{Enemy, Player, Projectile, Registry, Transform};

use super::{System, TickContext};

/// Per-type out-of-bounds margin: how far past the room edge an entity may
/// travel before it is reaped (spec §4.2 phase 8). Projectiles get a tight
/// margin since they are expected to leave the screen; players and enemies
/// get a larger one so a brief knockback past the wall is not fatal.
const PROJECTILE_MARGIN: f32 = 16.0;
const ENEMY_MARGIN: f32 = 64.0;
const PLAYER_MARGIN: f32 = 256.0;

/// Phase 8: destroys entities whose `Transform` lies outside the room's
/// simulation region, with per-type margins (spec §4.2, §3 invariant).
pub struct BoundarySystem;

impl System for BoundarySystem {
    fn name(&self) -> &'static str {
        "Boundary"
    }

    fn update(&mut self, registry: &mut Registry, ctx: &mut TickContext, _dt: f32) {
        let width = ctx.rules.world_width;
        let height = ctx.rules.world_height;

        for entity in registry.view1::<Transform>() {
            let margin = if registry.has::<Projectile>(entity) {
                PROJECTILE_MARGIN
            } else if registry.has::<Enemy>(entity) {
                ENEMY_MARGIN
            } else if registry.has::<Player>(entity) {
                PLAYER_MARGIN
            } else {
                continue;
            };

            let transform = registry.get::<Transform>(entity).unwrap();
            let out_of_bounds = transform.x < -margin
                || transform.x > width + margin
                || transform.y < -margin
                || transform.y > height + margin;

            if out_of_bounds {
                ctx.reap_list.push(entity);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn projectile_past_margin_is_reaped() {
        let mut reg = Registry::new();
        let e = reg.new_entity();
        reg.set(e, Transform { x: -1000.0, y: 0.0 });
        reg.set(
            e,
            Projectile {
                friendly: true,
                damage: 1,
                owner_entity: e,
            },
        );

        let rules = crate::game::rules::GameRules::default();
        let mut rng = crate::game::rng::DeterministicRng::new(1);
        let mut wave = crate::game::wave::FixedCadenceWaveScript::new(60, 100.0, 100.0);
        let players = HashMap::new();
        let mut queues = HashMap::new();
        let mut ctx = TickContext {
            tick: 0,
            rules: &rules,
            player_entities: &players,
            input_queues: &mut queues,
            pending_damage: vec![],
            pending_projectile_spawns: vec![],
            pending_enemy_spawns: vec![],
            reap_list: vec![],
            rng: &mut rng,
            wave_script: &mut wave,
            tick_failures: vec![],
        };

        BoundarySystem.update(&mut reg, &mut ctx, 1.0 / 60.0);
        assert_eq!(ctx.reap_list, vec![e]);
    }
}
