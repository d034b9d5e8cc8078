use std::f32::consts::SQRT_2;

use crate::ecs::{Player, Registry, Velocity, Weapon};

use super::{ProjectileSpawnRequest, System, TickContext};

/// Phase 1: consume queued player input, normalize diagonal movement, and
/// set `Velocity` for the tick (spec §4.2, §4.5). Also turns a `shoot`
/// input with `Weapon.cooldown <= 0` into a projectile-spawn request.
pub struct InputApplicationSystem;

impl System for InputApplicationSystem {
    fn name(&self) -> &'static str {
        "InputApplication"
    }

    fn update(&mut self, registry: &mut Registry, ctx: &mut TickContext, _dt: f32) {
        for (&player_id, &entity) in ctx.player_entities.iter() {
            let Some(commands) = ctx.input_queues.get_mut(&player_id) else {
                continue;
            };
            // §4.3: inputs are applied in strictly increasing seq order;
            // the queue is already filtered/sorted by GameLogic before the
            // pipeline runs, so we just drain it in order.
            let mut last_seq = None;
            for command in commands.drain(..) {
                last_seq = Some(command.seq);

                let (dx, dy) = normalize(command.dx as f32, command.dy as f32);
                if let Some(velocity) = registry.get_mut::<Velocity>(entity) {
                    velocity.vx = dx;
                    velocity.vy = dy;
                }

                if command.shoot {
                    let ready = registry
                        .get::<Weapon>(entity)
                        .map(|w| w.cooldown <= 0.0)
                        .unwrap_or(false);
                    if ready {
                        let (damage, fire_rate) = {
                            let weapon = registry.get::<Weapon>(entity).unwrap();
                            (weapon.damage, weapon.fire_rate)
                        };
                        if let Some(transform) = registry.get::<crate::ecs::Transform>(entity) {
                            ctx.pending_projectile_spawns.push(ProjectileSpawnRequest {
                                owner: entity,
                                friendly: true,
                                damage,
                                x: transform.x,
                                y: transform.y,
                                dx: 1.0,
                                dy: 0.0,
                                speed: 600.0,
                            });
                        }
                        if let Some(weapon) = registry.get_mut::<Weapon>(entity) {
                            weapon.cooldown = 1.0 / fire_rate;
                        }
                    }
                }
            }

            if let Some(seq) = last_seq {
                if let Some(player) = registry.get_mut::<Player>(entity) {
                    player.last_processed_input_seq = seq;
                }
            }
        }
    }
}

/// `(dx, dy) ∈ {-1,0,1}²`; normalizes the diagonal case by `1/√2` (spec
/// §4.5). The caller multiplies by `current_speed` in the Movement phase.
pub fn normalize(dx: f32, dy: f32) -> (f32, f32) {
    if dx != 0.0 && dy != 0.0 {
        (dx / SQRT_2, dy / SQRT_2)
    } else {
        (dx, dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagonal_is_normalized() {
        let (dx, dy) = normalize(1.0, 1.0);
        let magnitude = (dx * dx + dy * dy).sqrt();
        assert!((magnitude - 1.0).abs() < 1e-4);
    }

    #[test]
    fn cardinal_is_unchanged() {
        assert_eq!(normalize(1.0, 0.0), (1.0, 0.0));
        assert_eq!(normalize(0.0, -1.0), (0.0, -1.0));
    }
}
