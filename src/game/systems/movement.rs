use crate::ecs::{Registry, Transform, Velocity};

use super::{System, TickContext};

/// Phase 3: `Transform += Velocity · dt`. `Velocity.{vx,vy}` already holds
/// the normalized direction set by `InputApplication`; this system is the
/// one place that multiplies by `current_speed` (spec §4.5 scenario A).
pub struct MovementSystem;

impl System for MovementSystem {
    fn name(&self) -> &'static str {
        "Movement"
    }

    fn update(&mut self, registry: &mut Registry, _ctx: &mut TickContext, dt: f32) {
        for entity in registry.view2::<Transform, Velocity>() {
            let (dx, dy) = {
                let velocity = registry.get::<Velocity>(entity).unwrap();
                (
                    velocity.vx * velocity.current_speed * dt,
                    velocity.vy * velocity.current_speed * dt,
                )
            };
            let transform = registry.get_mut::<Transform>(entity).unwrap();
            transform.x += dx;
            transform.y += dy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::systems::input::normalize;
    use std::f32::consts::SQRT_2;

    #[test]
    fn diagonal_displacement_matches_scenario_a() {
        let mut reg = Registry::new();
        let e = reg.new_entity();
        reg.set(e, Transform { x: 0.0, y: 0.0 });
        let (dx, dy) = normalize(1.0, 1.0);
        let mut velocity = Velocity::new(200.0);
        velocity.vx = dx;
        velocity.vy = dy;
        reg.set(e, velocity);

        let dt = 1.0 / 60.0;
        let expected = 200.0 * dt * (1.0 / SQRT_2);

        let mut sys = MovementSystem;
        let rules = crate::game::rules::GameRules::default();
        let mut rng = crate::game::rng::DeterministicRng::new(1);
        let mut wave = crate::game::wave::FixedCadenceWaveScript::new(60, 100.0, 100.0);
        let players = std::collections::HashMap::new();
        let mut queues = std::collections::HashMap::new();
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

        for _ in 0..60 {
            sys.update(&mut reg, &mut ctx, dt);
        }

        let transform = reg.get::<Transform>(e).unwrap();
        assert!((transform.x - 60.0 * expected).abs() < 1e-2);
        assert!((transform.y - 60.0 * expected).abs() < 1e-2);
        assert!((transform.x - 141.421).abs() < 0.1);
    }
}
