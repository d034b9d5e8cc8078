use crate::ecs::{Enemy, EnemyTypeTag, Player, Transform};

use super::{ProjectileSpawnRequest, System, TickContext};

const ENEMY_APPROACH_SPEED: f32 = 80.0;
const ENEMY_FIRE_CHANCE_PER_TICK: f32 = 0.01;
const ENEMY_PROJECTILE_DAMAGE: i32 = 10;
const ENEMY_PROJECTILE_SPEED: f32 = 350.0;

/// Phase 6: drives `Enemy` behavior and may emit projectile-spawn requests
/// (spec §4.2). `Enemy.ai_state` is opaque to the core; this implementation
/// only needs to know the type tag to pick a behavior profile.
pub struct AiSystem;

impl System for AiSystem {
    fn name(&self) -> &'static str {
        "AI"
    }

    fn update(&mut self, registry: &mut crate::ecs::Registry, ctx: &mut TickContext, dt: f32) {
        let nearest_player = registry
            .view2::<Player, Transform>()
            .into_iter()
            .next()
            .and_then(|id| registry.get::<Transform>(id).copied());

        for entity in registry.view2::<Enemy, Transform>() {
            let type_tag = registry.get::<Enemy>(entity).unwrap().type_tag;
            let transform = *registry.get::<Transform>(entity).unwrap();

            let drift = match type_tag {
                EnemyTypeTag::Turret => 0.0,
                EnemyTypeTag::Drone | EnemyTypeTag::Boss => -ENEMY_APPROACH_SPEED * dt,
            };
            if drift != 0.0 {
                let transform_mut = registry.get_mut::<Transform>(entity).unwrap();
                transform_mut.x += drift;
            }

            if nearest_player.is_some() && ctx.rng.next_f32() < ENEMY_FIRE_CHANCE_PER_TICK {
                ctx.pending_projectile_spawns.push(ProjectileSpawnRequest {
                    owner: entity,
                    friendly: false,
                    damage: ENEMY_PROJECTILE_DAMAGE,
                    x: transform.x,
                    y: transform.y,
                    dx: -1.0,
                    dy: 0.0,
                    speed: ENEMY_PROJECTILE_SPEED,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::Registry;
    use std::collections::HashMap;

    #[test]
    fn drone_drifts_toward_origin() {
        let mut reg = Registry::new();
        let e = reg.new_entity();
        reg.set(e, Transform { x: 100.0, y: 0.0 });
        reg.set(e, Enemy { type_tag: EnemyTypeTag::Drone, ai_state: 0 });

        let rules = crate::game::rules::GameRules::default();
        let mut rng = crate::game::rng::DeterministicRng::new(999);
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

        AiSystem.update(&mut reg, &mut ctx, 1.0 / 60.0);
        assert!(reg.get::<Transform>(e).unwrap().x < 100.0);
    }
}
