use crate::ecs::{Collider, Enemy, Health, Projectile, Registry, Transform};

use super::{System, TickContext};

const PROJECTILE_RADIUS: f32 = 4.0;
const ENEMY_RADIUS: f32 = 12.0;

/// Phase 7: consume projectile-spawn requests (from InputApplication/AI)
/// and wave-script requests, instantiating new entities for each (spec
/// §4.2).
pub struct SpawnSystem;

impl System for SpawnSystem {
    fn name(&self) -> &'static str {
        "Spawn"
    }

    fn update(&mut self, registry: &mut Registry, ctx: &mut TickContext, _dt: f32) {
        for request in ctx.pending_projectile_spawns.drain(..) {
            let entity = registry.new_entity();
            registry.set(entity, Transform { x: request.x, y: request.y });
            let mut velocity = crate::ecs::Velocity::new(request.speed);
            velocity.vx = request.dx;
            velocity.vy = request.dy;
            velocity.current_speed = request.speed;
            registry.set(entity, velocity);
            registry.set(entity, Collider { radius: PROJECTILE_RADIUS });
            registry.set(
                entity,
                Projectile {
                    friendly: request.friendly,
                    damage: request.damage,
                    owner_entity: request.owner,
                },
            );
        }

        let wave_requests = ctx.wave_script.on_tick(ctx.tick);
        for request in wave_requests.into_iter().chain(ctx.pending_enemy_spawns.drain(..)) {
            let entity = registry.new_entity();
            registry.set(entity, Transform { x: request.x, y: request.y });
            registry.set(entity, Collider { radius: ENEMY_RADIUS });
            registry.set(entity, Health::new(request.health));
            registry.set(
                entity,
                Enemy {
                    type_tag: request.type_tag,
                    ai_state: 0,
                },
            );
        }
    }
}
