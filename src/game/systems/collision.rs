use crate::ecs::{Collider, Enemy, Player, Projectile, Registry, Transform, Wall};

use super::{DamageEvent, System, TickContext};

/// Contact damage dealt to a player on direct overlap with an enemy. Not a
/// named field in spec §3's component list, so it is a core constant
/// rather than a per-enemy tunable.
const PLAYER_ENEMY_CONTACT_DAMAGE: i32 = 10;

/// Phase 4: pairwise broad-phase collision over every `Transform +
/// Collider` entity. Emits damage events for Projectile↔(Player|Enemy|Wall)
/// and Player↔Enemy overlaps (spec §4.2). Projectiles are queued for
/// reaping on any collision, per spec §3's invariant that a projectile is
/// destroyed on collision.
pub struct CollisionSystem;

impl System for CollisionSystem {
    fn name(&self) -> &'static str {
        "Collision"
    }

    fn update(&mut self, registry: &mut Registry, ctx: &mut TickContext, _dt: f32) {
        let colliders = registry.view2::<Transform, Collider>();

        for i in 0..colliders.len() {
            for j in (i + 1)..colliders.len() {
                let a = colliders[i];
                let b = colliders[j];

                if !overlaps(registry, a, b) {
                    continue;
                }

                if let (Some(proj), None) = (registry.get::<Projectile>(a), registry.get::<Projectile>(b)) {
                    resolve_projectile_pair(registry, ctx, a, *proj, b);
                } else if let (None, Some(proj)) =
                    (registry.get::<Projectile>(a), registry.get::<Projectile>(b))
                {
                    resolve_projectile_pair(registry, ctx, b, *proj, a);
                } else if registry.has::<Player>(a) && registry.has::<Enemy>(b) {
                    ctx.pending_damage.push(DamageEvent {
                        target: a,
                        amount: PLAYER_ENEMY_CONTACT_DAMAGE,
                    });
                } else if registry.has::<Player>(b) && registry.has::<Enemy>(a) {
                    ctx.pending_damage.push(DamageEvent {
                        target: b,
                        amount: PLAYER_ENEMY_CONTACT_DAMAGE,
                    });
                }
            }
        }
    }
}

fn overlaps(registry: &Registry, a: crate::ecs::EntityId, b: crate::ecs::EntityId) -> bool {
    let ta = registry.get::<Transform>(a).unwrap();
    let tb = registry.get::<Transform>(b).unwrap();
    let ca = registry.get::<Collider>(a).unwrap();
    let cb = registry.get::<Collider>(b).unwrap();
    let dx = ta.x - tb.x;
    let dy = ta.y - tb.y;
    let radius_sum = ca.radius + cb.radius;
    dx * dx + dy * dy <= radius_sum * radius_sum
}

fn resolve_projectile_pair(
    registry: &Registry,
    ctx: &mut TickContext,
    projectile_id: crate::ecs::EntityId,
    projectile: Projectile,
    other: crate::ecs::EntityId,
) {
    if other == projectile.owner_entity {
        return;
    }
    if registry.has::<Wall>(other) {
        ctx.reap_list.push(projectile_id);
        return;
    }
    let hits_enemy = projectile.friendly && registry.has::<Enemy>(other);
    let hits_player = !projectile.friendly && registry.has::<Player>(other);
    if hits_enemy || hits_player {
        ctx.pending_damage.push(DamageEvent {
            target: other,
            amount: projectile.damage,
        });
        ctx.reap_list.push(projectile_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::EnemyTypeTag;
    use std::collections::HashMap;

    fn fresh_ctx<'a>(
        rules: &'a crate::game::rules::GameRules,
        rng: &'a mut crate::game::rng::DeterministicRng,
        wave: &'a mut dyn crate::game::wave::SpawnStrategy,
        players: &'a HashMap<u64, crate::ecs::EntityId>,
        queues: &'a mut HashMap<u64, Vec<super::super::InputCommand>>,
    ) -> TickContext<'a> {
        TickContext {
            tick: 0,
            rules,
            player_entities: players,
            input_queues: queues,
            pending_damage: vec![],
            pending_projectile_spawns: vec![],
            pending_enemy_spawns: vec![],
            reap_list: vec![],
            rng,
            wave_script: wave,
            tick_failures: vec![],
        }
    }

    #[test]
    fn friendly_projectile_damages_enemy_and_is_reaped() {
        let mut reg = Registry::new();
        let owner = reg.new_entity();
        let projectile = reg.new_entity();
        reg.set(projectile, Transform { x: 10.0, y: 10.0 });
        reg.set(projectile, Collider { radius: 2.0 });
        reg.set(
            projectile,
            Projectile {
                friendly: true,
                damage: 15,
                owner_entity: owner,
            },
        );

        let enemy = reg.new_entity();
        reg.set(enemy, Transform { x: 11.0, y: 10.0 });
        reg.set(enemy, Collider { radius: 2.0 });
        reg.set(
            enemy,
            Enemy {
                type_tag: EnemyTypeTag::Drone,
                ai_state: 0,
            },
        );

        let rules = crate::game::rules::GameRules::default();
        let mut rng = crate::game::rng::DeterministicRng::new(1);
        let mut wave = crate::game::wave::FixedCadenceWaveScript::new(60, 100.0, 100.0);
        let players = HashMap::new();
        let mut queues = HashMap::new();
        let mut ctx = fresh_ctx(&rules, &mut rng, &mut wave, &players, &mut queues);

        CollisionSystem.update(&mut reg, &mut ctx, 1.0 / 60.0);

        assert_eq!(ctx.pending_damage.len(), 1);
        assert_eq!(ctx.pending_damage[0].target, enemy);
        assert_eq!(ctx.pending_damage[0].amount, 15);
        assert_eq!(ctx.reap_list, vec![projectile]);
    }

    #[test]
    fn projectile_ignores_its_own_owner() {
        let mut reg = Registry::new();
        let owner = reg.new_entity();
        reg.set(owner, Transform { x: 0.0, y: 0.0 });
        reg.set(owner, Collider { radius: 5.0 });
        reg.set(owner, Player {
            external_player_id: 1,
            display_name: "a".into(),
            last_processed_input_seq: 0,
        });

        let projectile = reg.new_entity();
        reg.set(projectile, Transform { x: 1.0, y: 0.0 });
        reg.set(projectile, Collider { radius: 1.0 });
        reg.set(
            projectile,
            Projectile {
                friendly: true,
                damage: 10,
                owner_entity: owner,
            },
        );

        let rules = crate::game::rules::GameRules::default();
        let mut rng = crate::game::rng::DeterministicRng::new(1);
        let mut wave = crate::game::wave::FixedCadenceWaveScript::new(60, 100.0, 100.0);
        let players = HashMap::new();
        let mut queues = HashMap::new();
        let mut ctx = fresh_ctx(&rules, &mut rng, &mut wave, &players, &mut queues);

        CollisionSystem.update(&mut reg, &mut ctx, 1.0 / 60.0);
        assert!(ctx.pending_damage.is_empty());
        assert!(ctx.reap_list.is_empty());
    }
}
