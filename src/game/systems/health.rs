use crate::ecs::{Health, Registry};

use super::{System, TickContext};

/// Phase 5: apply queued damage, mark `is_dead` at zero health, tick
/// invincibility timers down, and queue dead entities for reaping (spec
/// §3 invariant: `current = 0 ⇒ is_dead = true`, entity pending removal).
pub struct HealthSystem;

impl System for HealthSystem {
    fn name(&self) -> &'static str {
        "Health"
    }

    fn update(&mut self, registry: &mut Registry, ctx: &mut TickContext, dt: f32) {
        for event in ctx.pending_damage.drain(..) {
            if let Some(health) = registry.get_mut::<Health>(event.target) {
                health.apply_damage(event.amount);
            }
        }

        for entity in registry.view1::<Health>() {
            let health = registry.get_mut::<Health>(entity).unwrap();
            if health.invincibility_timer > 0.0 {
                health.invincibility_timer = (health.invincibility_timer - dt).max(0.0);
            }
            if health.is_dead {
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
    fn dead_entity_is_queued_for_reaping() {
        let mut reg = Registry::new();
        let e = reg.new_entity();
        reg.set(e, Health::new(10));

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
            pending_damage: vec![super::super::DamageEvent { target: e, amount: 100 }],
            pending_projectile_spawns: vec![],
            pending_enemy_spawns: vec![],
            reap_list: vec![],
            rng: &mut rng,
            wave_script: &mut wave,
            tick_failures: vec![],
        };

        HealthSystem.update(&mut reg, &mut ctx, 1.0 / 60.0);
        assert!(reg.get::<Health>(e).unwrap().is_dead);
        assert_eq!(ctx.reap_list, vec![e]);
    }
}
