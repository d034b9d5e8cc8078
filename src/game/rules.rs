/// Closed enumeration of gamerule keys the protocol can update at runtime
/// (spec §4.7). Clients must tolerate unknown keys by ignoring them — that
/// tolerance lives on the client side (`client::replicator`); this type is
/// just the authoritative closed set the server recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameRuleKey {
    PlayerSpeed,
    PlayerHealth,
    PlayerFireRate,
    PlayerDamage,
    PlayerSpawnX,
    PlayerSpawnY,
}

impl GameRuleKey {
    pub fn as_wire_str(self) -> &'static str {
        match self {
            GameRuleKey::PlayerSpeed => "player.speed",
            GameRuleKey::PlayerHealth => "player.health",
            GameRuleKey::PlayerFireRate => "player.fireRate",
            GameRuleKey::PlayerDamage => "player.damage",
            GameRuleKey::PlayerSpawnX => "player.spawnX",
            GameRuleKey::PlayerSpawnY => "player.spawnY",
        }
    }

    pub fn from_wire_str(key: &str) -> Option<Self> {
        Some(match key {
            "player.speed" => GameRuleKey::PlayerSpeed,
            "player.health" => GameRuleKey::PlayerHealth,
            "player.fireRate" => GameRuleKey::PlayerFireRate,
            "player.damage" => GameRuleKey::PlayerDamage,
            "player.spawnX" => GameRuleKey::PlayerSpawnX,
            "player.spawnY" => GameRuleKey::PlayerSpawnY,
            _ => return None,
        })
    }
}

/// Tunable parameters for one room's simulation. Replaces the C++ source's
/// global `GameRules`/`ClientGameRules` singletons (spec §9 redesign note)
/// with a plain value owned by the room and updated only on the
/// simulation thread; the server pushes changes out as
/// `S2C_GAMERULE_UPDATE` broadcasts rather than the client mutating a
/// shared global.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameRules {
    pub player_speed: f32,
    pub player_health: i32,
    pub player_fire_rate: f32,
    pub player_damage: i32,
    pub player_spawn_x: f32,
    pub player_spawn_y: f32,
    pub world_width: f32,
    pub world_height: f32,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            player_speed: 200.0,
            player_health: 100,
            player_fire_rate: 4.0,
            player_damage: 10,
            player_spawn_x: 50.0,
            player_spawn_y: 300.0,
            world_width: 1600.0,
            world_height: 900.0,
        }
    }
}

impl GameRules {
    pub fn set(&mut self, key: GameRuleKey, value: f32) {
        match key {
            GameRuleKey::PlayerSpeed => self.player_speed = value,
            GameRuleKey::PlayerHealth => self.player_health = value as i32,
            GameRuleKey::PlayerFireRate => self.player_fire_rate = value,
            GameRuleKey::PlayerDamage => self.player_damage = value as i32,
            GameRuleKey::PlayerSpawnX => self.player_spawn_x = value,
            GameRuleKey::PlayerSpawnY => self.player_spawn_y = value,
        }
    }

    pub fn as_pairs(&self) -> Vec<(GameRuleKey, f32)> {
        vec![
            (GameRuleKey::PlayerSpeed, self.player_speed),
            (GameRuleKey::PlayerHealth, self.player_health as f32),
            (GameRuleKey::PlayerFireRate, self.player_fire_rate),
            (GameRuleKey::PlayerDamage, self.player_damage as f32),
            (GameRuleKey::PlayerSpawnX, self.player_spawn_x),
            (GameRuleKey::PlayerSpawnY, self.player_spawn_y),
        ]
    }
}

/// 60 Hz fixed timestep, per spec §2/§4.3.
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;

/// Reconciliation thresholds (spec §4.5, §9 — both are required, not
/// either/or).
pub const MICRO_JITTER_PX: f32 = 2.0;
pub const ADAPTIVE_BASE_PX: f32 = 5.0;
pub const ADAPTIVE_PER_MS_PX: f32 = 0.25;
pub const ADAPTIVE_MAX_PX: f32 = 30.0;

pub fn adaptive_threshold_px(rtt_ms: f32) -> f32 {
    (ADAPTIVE_BASE_PX + ADAPTIVE_PER_MS_PX * rtt_ms).min(ADAPTIVE_MAX_PX)
}
