//! Interpolation state for entities the client does not control (spec
//! §4.5 "remote entities render interpolated, never predicted"). Each
//! entity keeps the last two authoritative snapshots it was seen in and
//! interpolates between them using how far the render clock has drifted
//! past the tick the older snapshot arrived in.

use std::collections::HashMap;

use crate::game::rules::FIXED_TIMESTEP;
use crate::protocol::EntityState;

struct CachedEntity {
    previous: EntityState,
    current: EntityState,
}

/// Tracks the last two server ticks' worth of state per remote entity and
/// produces an interpolated render position for any point between them.
pub struct EntityCache {
    entities: HashMap<u32, CachedEntity>,
}

impl Default for EntityCache {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityCache {
    pub fn new() -> Self {
        Self { entities: HashMap::new() }
    }

    /// Folds in one tick's worth of `GameState`/`GameStart` entities,
    /// shifting `current` into `previous` for anything still present and
    /// seeding both slots for anything newly seen.
    pub fn ingest(&mut self, states: &[EntityState]) {
        let seen: std::collections::HashSet<u32> = states.iter().map(|s| s.entity_id).collect();
        self.entities.retain(|id, _| seen.contains(id));

        for state in states {
            match self.entities.get_mut(&state.entity_id) {
                Some(cached) => {
                    cached.previous = std::mem::replace(&mut cached.current, state.clone());
                }
                None => {
                    self.entities.insert(
                        state.entity_id,
                        CachedEntity { previous: state.clone(), current: state.clone() },
                    );
                }
            }
        }
    }

    /// Linearly interpolated `(x, y)` for `entity_id` at `alpha` ∈ [0, 1]
    /// of the way between the previous and current server tick.
    pub fn interpolated_position(&self, entity_id: u32, alpha: f32) -> Option<(f32, f32)> {
        let cached = self.entities.get(&entity_id)?;
        let alpha = alpha.clamp(0.0, 1.0);
        let x = cached.previous.x + (cached.current.x - cached.previous.x) * alpha;
        let y = cached.previous.y + (cached.current.y - cached.previous.y) * alpha;
        Some((x, y))
    }

    pub fn latest(&self, entity_id: u32) -> Option<&EntityState> {
        self.entities.get(&entity_id).map(|cached| &cached.current)
    }

    pub fn entity_ids(&self) -> impl Iterator<Item = &u32> {
        self.entities.keys()
    }

    pub fn remove(&mut self, entity_id: u32) {
        self.entities.remove(&entity_id);
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Render alpha for a point `elapsed` seconds past the last received tick,
/// given ticks arrive roughly every `FIXED_TIMESTEP` seconds.
pub fn render_alpha(elapsed_since_last_tick: f32) -> f32 {
    (elapsed_since_last_tick / FIXED_TIMESTEP).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{EntityTypeTag, SpriteRect};

    fn state(entity_id: u32, x: f32) -> EntityState {
        EntityState {
            entity_id,
            type_tag: EntityTypeTag::EnemyDrone,
            x,
            y: 0.0,
            health: Some(10),
            animation_tag: "idle".to_string(),
            sprite_src_rect: SpriteRect { x: 0, y: 0, w: 32, h: 32 },
            last_processed_input_seq: 0,
        }
    }

    #[test]
    fn first_sighting_interpolates_to_itself() {
        let mut cache = EntityCache::new();
        cache.ingest(&[state(1, 50.0)]);
        assert_eq!(cache.interpolated_position(1, 1.0), Some((50.0, 0.0)));
    }

    #[test]
    fn interpolates_between_two_ticks() {
        let mut cache = EntityCache::new();
        cache.ingest(&[state(1, 0.0)]);
        cache.ingest(&[state(1, 100.0)]);
        let (x, _) = cache.interpolated_position(1, 0.5).unwrap();
        assert!((x - 50.0).abs() < 1e-4);
    }

    #[test]
    fn entities_missing_from_a_tick_are_evicted() {
        let mut cache = EntityCache::new();
        cache.ingest(&[state(1, 0.0), state(2, 0.0)]);
        cache.ingest(&[state(1, 5.0)]);
        assert!(cache.latest(2).is_none());
        assert_eq!(cache.len(), 1);
    }
}
