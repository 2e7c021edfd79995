use serde::{Deserialize, Serialize};

/// Gravity acceleration (units/s^2, downward — screen y grows down).
pub const GRAVITY: f32 = 30.0;
/// Horizontal move speed (units/s).
pub const MOVE_SPEED: f32 = 8.0;
/// Jump takeoff speed (units/s, applied as negative vy).
pub const JUMP_SPEED: f32 = 14.0;
/// Terminal fall speed (units/s).
pub const MAX_FALL_SPEED: f32 = 20.0;
/// Horizontal knockback speed when damaged.
pub const KNOCKBACK_X: f32 = 5.0;
/// Player width for AABB collision.
pub const PLAYER_WIDTH: f32 = 0.8;
/// Player height for AABB collision.
pub const PLAYER_HEIGHT: f32 = 1.2;
/// Tolerance above a platform top for landing detection.
pub const LAND_TOLERANCE: f32 = 0.2;
/// Starting health (hearts).
pub const MAX_HEALTH: i32 = 3;
/// Starting lives.
pub const MAX_LIVES: u32 = 3;
/// Invulnerability window after non-lethal damage (seconds).
pub const INVULN_DURATION: f32 = 1.5;
/// Timer restored on checkpoint respawn (seconds, clamped to level limit).
pub const RESCUE_TIME_BONUS: f32 = 30.0;

/// Configurable physics parameters, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f32,
    pub move_speed: f32,
    pub jump_speed: f32,
    pub max_fall_speed: f32,
    pub knockback_x: f32,
    pub player_width: f32,
    pub player_height: f32,
    pub land_tolerance: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            move_speed: MOVE_SPEED,
            jump_speed: JUMP_SPEED,
            max_fall_speed: MAX_FALL_SPEED,
            knockback_x: KNOCKBACK_X,
            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            land_tolerance: LAND_TOLERANCE,
        }
    }
}

/// Top-level gameplay configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GemDashConfig {
    pub physics: PhysicsConfig,
    pub max_health: i32,
    pub max_lives: u32,
    pub invuln_duration: f32,
    pub rescue_time_bonus: f32,
    /// Capability flag gating the mid-air jump.
    pub allow_double_jump: bool,
}

impl Default for GemDashConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            max_health: MAX_HEALTH,
            max_lives: MAX_LIVES,
            invuln_duration: INVULN_DURATION,
            rescue_time_bonus: RESCUE_TIME_BONUS,
            allow_double_jump: true,
        }
    }
}

impl GemDashConfig {
    /// Load config from a TOML file. Falls back to defaults if the file is
    /// missing or unparseable.
    pub fn load() -> Self {
        let path = std::env::var("GEMDASH_CONFIG")
            .unwrap_or_else(|_| "config/gemdash.toml".to_string());
        match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<GemDashConfig>(&content) {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::warn!("Failed to parse {path}: {e}, using defaults");
                    GemDashConfig::default()
                },
            },
            Err(_) => GemDashConfig::default(),
        }
    }
}
