//! Running Man - an endless side-scrolling runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (motion, obstacles, collisions, game state)
//! - `assets`: Sprite sheet metadata and animation lookup
//! - `renderer`: Renderer collaborator and frame assembly
//! - `platform`: Input events, key bindings and frame pacing
//! - `audio`: Audio collaborator and event-to-cue mapping
//! - `app`: Frame loop tying the collaborators to the simulation

pub mod app;
pub mod assets;
pub mod audio;
pub mod error;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use app::{App, LoopControl};
pub use error::{AssetError, ConfigError, GameError, TimerError};
pub use highscores::HighScores;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants (defaults for `sim::GameConfig`)
pub mod consts {
    /// Fixed simulation rate (ticks per second)
    pub const FPS: u32 = 30;

    /// World dimensions (pixels)
    pub const WORLD_WIDTH: f32 = 960.0;
    pub const WORLD_HEIGHT: f32 = 540.0;
    /// Ground line the player and obstacles stand on
    pub const GROUND_Y: f32 = WORLD_HEIGHT - 15.0;

    /// Per-tick physics
    pub const GRAVITY: f32 = 1.5;
    pub const FRICTION: f32 = 1.0;
    pub const TERMINAL_VELOCITY: f32 = 16.0;

    /// Player defaults
    pub const PLAYER_SPEED: f32 = 6.0;
    pub const JUMP_VELOCITY: f32 = -20.0;
    pub const PLAYER_SPAWN_X: f32 = 75.0;
    pub const MAX_HEALTH: u8 = 5;
    pub const INVULNERABILITY_TICKS: u32 = 60;
    /// Ticks between flicker toggles while invulnerable
    pub const FLICKER_INTERVAL_TICKS: u32 = 3;
    /// Knockback impulse applied on hit (backward and upward)
    pub const KNOCKBACK_X: f32 = -4.0;
    pub const KNOCKBACK_Y: f32 = -8.0;
    /// Wall-clock time per animation frame
    pub const ANIMATION_COOLDOWN_MS: u64 = 100;

    /// Scroll speeds (pixels per tick, leftward)
    pub const BASE_SCROLL_SPEED: f32 = 5.0;
    pub const MAX_SCROLL_SPEED: f32 = 15.0;
    pub const BACKDROP_SCROLL_SPEED: f32 = 1.0;
    /// Speed ramp
    pub const SPEED_UP_INTERVAL_SECS: u64 = 5;
    pub const SPEED_UP_STEP: f32 = 1.0;

    /// Obstacle pool
    pub const MAX_OBSTACLES: usize = 3;
    pub const SPAWN_SPACING_MIN: f32 = 0.5;
    pub const SPAWN_SPACING_MAX: f32 = 0.8;

    /// Session end
    pub const DEATH_HOLD_MS: u64 = 3000;
    pub const MUSIC_FADE_SECS: f32 = 3.0;
}

/// Axis-aligned rectangle given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    /// Build a rect from a bottom-left anchor (the way entities stand on the ground)
    #[inline]
    pub fn from_bottom_left(bottom_left: Vec2, size: Vec2) -> Self {
        Self {
            min: Vec2::new(bottom_left.x, bottom_left.y - size.y),
            size,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.min.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.min.y + self.size.y
    }

    /// Strict overlap test (touching edges do not intersect)
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x < other.right()
            && other.min.x < self.right()
            && self.min.y < other.bottom()
            && other.min.y < self.bottom()
    }
}
