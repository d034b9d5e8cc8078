//! Component shapes per spec §3. The registry stores these as opaque
//! columns; nothing here assumes anything about how they are rendered.

use super::entity::EntityId;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Velocity {
    pub vx: f32,
    pub vy: f32,
    pub base_speed: f32,
    pub current_speed: f32,
}

impl Velocity {
    pub fn new(base_speed: f32) -> Self {
        Self {
            vx: 0.0,
            vy: 0.0,
            base_speed,
            current_speed: base_speed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Health {
    pub current: i32,
    pub max: i32,
    pub invincibility_timer: f32,
    pub is_dead: bool,
}

impl Health {
    pub fn new(max: i32) -> Self {
        Self {
            current: max,
            max,
            invincibility_timer: 0.0,
            is_dead: false,
        }
    }

    /// Enforces `current ∈ [0, max]`; sets `is_dead` when it bottoms out
    /// (spec §3 invariants).
    pub fn apply_damage(&mut self, amount: i32) {
        if self.invincibility_timer > 0.0 {
            return;
        }
        self.current = (self.current - amount).clamp(0, self.max);
        if self.current == 0 {
            self.is_dead = true;
        }
    }

    pub fn heal(&mut self, amount: i32) {
        self.current = (self.current + amount).clamp(0, self.max);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub external_player_id: u64,
    pub display_name: String,
    pub last_processed_input_seq: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyTypeTag {
    Drone,
    Turret,
    Boss,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub type_tag: EnemyTypeTag,
    /// Opaque to the core; interpreted only by the spawn-strategy plugin.
    pub ai_state: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    pub friendly: bool,
    pub damage: i32,
    pub owner_entity: EntityId,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weapon {
    pub damage: i32,
    pub fire_rate: f32,
    pub cooldown: f32,
    pub base_damage: i32,
    pub base_fire_rate: f32,
}

impl Weapon {
    pub fn new(damage: i32, fire_rate: f32) -> Self {
        Self {
            damage,
            fire_rate,
            cooldown: 0.0,
            base_damage: damage,
            base_fire_rate: fire_rate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuffType {
    Speed,
    Damage,
    FireRate,
    HealthRegen,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuffEntry {
    pub buff_type: BuffType,
    pub value: f32,
    pub remaining_time: f32,
    pub permanent: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Buff {
    pub entries: Vec<BuffEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

/// Forwarded verbatim in snapshots; the server never interprets it.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub animation_tag: String,
    pub src_rect: SpriteRect,
}

/// Marks an entity that participates in collision broad-phase (spec §4.2
/// Collision system). Present on players, enemies, projectiles and walls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    pub radius: f32,
}

/// Tags an entity as a static boundary wall, so Projectile↔Wall collisions
/// (spec §4.2) can be distinguished from Projectile↔Player/Enemy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wall;
