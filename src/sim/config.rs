//! Immutable simulation tuning
//!
//! `GameConfig` is built once (defaults from `crate::consts`, optionally
//! overridden from a JSON file) and held by `Game`. Missing keys fall back to
//! the defaults, so a file can override only the values it cares about.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::motion::MotionParams;
use crate::consts::*;
use crate::error::ConfigError;

/// How an overlap between the player and an obstacle turns into damage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Every overlap calls `Player::hit`; the invulnerability window alone
    /// suppresses repeats
    #[default]
    InvulnerabilityGated,
    /// Each obstacle damages at most once, even while the player is invulnerable
    HitOnce,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // World
    pub fps: u32,
    pub world_width: f32,
    pub world_height: f32,
    pub ground_y: f32,

    // Physics
    pub gravity: f32,
    pub friction: f32,
    pub terminal_velocity: f32,

    // Player
    pub player_speed: f32,
    pub jump_velocity: f32,
    pub spawn_x: f32,
    pub max_health: u8,
    pub invulnerability_ticks: u32,
    pub flicker_interval_ticks: u32,
    pub knockback: (f32, f32),
    pub animation_cooldown_ms: u64,

    // Scrolling
    pub base_scroll_speed: f32,
    pub max_scroll_speed: f32,
    pub backdrop_scroll_speed: f32,
    pub speed_up_interval_secs: u64,
    pub speed_up_step: f32,

    // Obstacles
    pub max_obstacles: usize,
    pub spawn_spacing: (f32, f32),
    pub collision_policy: CollisionPolicy,

    // Session
    pub death_hold_ms: u64,
    pub music_fade_secs: f32,
    pub auto_restart: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fps: FPS,
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,
            ground_y: GROUND_Y,

            gravity: GRAVITY,
            friction: FRICTION,
            terminal_velocity: TERMINAL_VELOCITY,

            player_speed: PLAYER_SPEED,
            jump_velocity: JUMP_VELOCITY,
            spawn_x: PLAYER_SPAWN_X,
            max_health: MAX_HEALTH,
            invulnerability_ticks: INVULNERABILITY_TICKS,
            flicker_interval_ticks: FLICKER_INTERVAL_TICKS,
            knockback: (KNOCKBACK_X, KNOCKBACK_Y),
            animation_cooldown_ms: ANIMATION_COOLDOWN_MS,

            base_scroll_speed: BASE_SCROLL_SPEED,
            max_scroll_speed: MAX_SCROLL_SPEED,
            backdrop_scroll_speed: BACKDROP_SCROLL_SPEED,
            speed_up_interval_secs: SPEED_UP_INTERVAL_SECS,
            speed_up_step: SPEED_UP_STEP,

            max_obstacles: MAX_OBSTACLES,
            spawn_spacing: (SPAWN_SPACING_MIN, SPAWN_SPACING_MAX),
            collision_policy: CollisionPolicy::default(),

            death_hold_ms: DEATH_HOLD_MS,
            music_fade_secs: MUSIC_FADE_SECS,
            auto_restart: false,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file, falling back to defaults when it does not exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(name: &'static str, reason: impl Into<String>) -> ConfigError {
            ConfigError::Invalid {
                name,
                reason: reason.into(),
            }
        }

        if self.fps == 0 {
            return Err(invalid("fps", "must be positive"));
        }
        if self.world_width <= 0.0 || self.world_height <= 0.0 {
            return Err(invalid("world_width", "world must have positive size"));
        }
        if !(0.0..=self.world_height).contains(&self.ground_y) {
            return Err(invalid("ground_y", "ground line must lie inside the world"));
        }
        if self.max_health == 0 {
            return Err(invalid("max_health", "must be at least 1"));
        }
        if self.jump_velocity >= 0.0 {
            return Err(invalid("jump_velocity", "must be negative (upward)"));
        }
        if self.gravity <= 0.0 || self.terminal_velocity <= 0.0 {
            return Err(invalid("gravity", "gravity and terminal velocity must be positive"));
        }
        if self.friction < 0.0 {
            return Err(invalid("friction", "must not be negative"));
        }
        if self.max_obstacles == 0 {
            return Err(invalid("max_obstacles", "pool needs at least one slot"));
        }
        let (lo, hi) = self.spawn_spacing;
        if !(0.0 < lo && lo < hi && hi <= 1.0) {
            return Err(invalid(
                "spawn_spacing",
                format!("need 0 < min < max <= 1, got ({lo}, {hi})"),
            ));
        }
        if self.base_scroll_speed <= 0.0 || self.max_scroll_speed < self.base_scroll_speed {
            return Err(invalid(
                "base_scroll_speed",
                "need 0 < base_scroll_speed <= max_scroll_speed",
            ));
        }
        if self.speed_up_interval_secs == 0 {
            return Err(invalid("speed_up_interval_secs", "must be positive"));
        }
        if self.flicker_interval_ticks == 0 {
            return Err(invalid("flicker_interval_ticks", "must be positive"));
        }
        Ok(())
    }

    /// Milliseconds per fixed tick
    pub fn frame_ms(&self) -> u64 {
        (1000 / self.fps).max(1) as u64
    }

    pub fn motion_params(&self) -> MotionParams {
        MotionParams {
            speed: self.player_speed,
            gravity: self.gravity,
            friction: self.friction,
            jump_velocity: self.jump_velocity,
            terminal_velocity: self.terminal_velocity,
        }
    }
}
