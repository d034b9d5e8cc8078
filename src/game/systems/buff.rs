use crate::ecs::{Buff, BuffType, Health, Registry, Velocity, Weapon};

use super::{System, TickContext};

/// Phase 2: decrement buff timers, remove expired ones, and recompute the
/// multiplicative modifiers on `Velocity.current_speed`,
/// `Weapon.damage`/`fire_rate` from the base values plus whatever buffs
/// remain active (spec §4.2). Recomputing from `base_*` each tick avoids
/// needing separate apply/undo bookkeeping while producing the same
/// observable effect.
pub struct BuffSystem;

impl System for BuffSystem {
    fn name(&self) -> &'static str {
        "Buff"
    }

    fn update(&mut self, registry: &mut Registry, _ctx: &mut TickContext, dt: f32) {
        for entity in registry.view1::<Buff>() {
            let mut regen = 0.0_f32;

            if let Some(buff) = registry.get_mut::<Buff>(entity) {
                buff.entries.retain_mut(|entry| {
                    if !entry.permanent {
                        entry.remaining_time -= dt;
                    }
                    if entry.buff_type == BuffType::HealthRegen {
                        regen += entry.value * dt;
                    }
                    entry.permanent || entry.remaining_time > 0.0
                });
            }

            let mut speed_mult = 1.0_f32;
            let mut damage_mult = 1.0_f32;
            let mut fire_rate_mult = 1.0_f32;
            if let Some(buff) = registry.get::<Buff>(entity) {
                for entry in &buff.entries {
                    match entry.buff_type {
                        BuffType::Speed => speed_mult *= entry.value,
                        BuffType::Damage => damage_mult *= entry.value,
                        BuffType::FireRate => fire_rate_mult *= entry.value,
                        BuffType::HealthRegen => {}
                    }
                }
            }

            if let Some(velocity) = registry.get_mut::<Velocity>(entity) {
                velocity.current_speed = velocity.base_speed * speed_mult;
            }
            if let Some(weapon) = registry.get_mut::<Weapon>(entity) {
                weapon.damage = ((weapon.base_damage as f32) * damage_mult) as i32;
                weapon.fire_rate = weapon.base_fire_rate * fire_rate_mult;
                weapon.cooldown = (weapon.cooldown - dt).max(0.0);
            }
            if regen > 0.0 {
                if let Some(health) = registry.get_mut::<Health>(entity) {
                    health.heal(regen.round() as i32);
                }
            }
        }

        // Entities without a Buff component still tick their weapon
        // cooldown and keep current_speed equal to base_speed.
        for entity in registry.view1::<Weapon>() {
            if registry.has::<Buff>(entity) {
                continue;
            }
            if let Some(weapon) = registry.get_mut::<Weapon>(entity) {
                weapon.cooldown = (weapon.cooldown - dt).max(0.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{BuffEntry, Registry};
    use std::collections::HashMap;

    #[test]
    fn expired_buff_is_removed_and_speed_reverts() {
        let mut reg = Registry::new();
        let e = reg.new_entity();
        reg.set(e, Velocity::new(100.0));
        reg.set(
            e,
            Buff {
                entries: vec![BuffEntry {
                    buff_type: BuffType::Speed,
                    value: 2.0,
                    remaining_time: 0.05,
                    permanent: false,
                }],
            },
        );

        let rules = crate::game::rules::GameRules::default();
        let mut rng = crate::game::rng::DeterministicRng::new(1);
        let mut wave = crate::game::wave::FixedCadenceWaveScript::new(60, 100.0, 100.0);
        let players = HashMap::new();
        let mut queues = HashMap::new();
        let mut tick_ctx = super::super::TickContext {
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

        let mut sys = BuffSystem;
        sys.update(&mut reg, &mut tick_ctx, 0.016);
        assert_eq!(reg.get::<Velocity>(e).unwrap().current_speed, 200.0);

        sys.update(&mut reg, &mut tick_ctx, 0.05);
        assert_eq!(reg.get::<Buff>(e).unwrap().entries.len(), 0);
        assert_eq!(reg.get::<Velocity>(e).unwrap().current_speed, 100.0);
    }
}
