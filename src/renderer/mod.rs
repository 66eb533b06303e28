//! Rendering collaborator
//!
//! The game never touches pixels. `draw_frame` walks the game state in draw
//! order and hands each visible thing to a `Renderer`, which owns the actual
//! drawing (textures, text layout, presentation).

mod scene;

use glam::Vec2;

use crate::assets::FrameRect;
use crate::sim::world::DecorKind;

pub use scene::draw_frame;

/// What to draw. Positions are passed separately as the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sprite {
    /// One world-wide backdrop panel
    Backdrop,
    GroundTile { width: f32 },
    Decor {
        kind: DecorKind,
        variant: u8,
        size: Vec2,
        flipped: bool,
    },
    Obstacle { asset: &'static str, size: Vec2 },
    /// Player frame cut from the sprite sheet
    Player { frame: FrameRect, size: Vec2, flipped: bool },
    /// Debug outline of a collision box
    Hitbox { size: Vec2 },
}

/// Heads-up display values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hud {
    pub score: u32,
    pub high_score: u32,
    pub health: u8,
    pub max_health: u8,
    pub elapsed_ms: u64,
    pub scroll_speed: f32,
    pub session: u32,
}

/// Full-screen state overlays
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Overlay {
    Paused,
    GameOver {
        score: u32,
        high_score: u32,
        run_time_ms: u64,
        /// Whether the restart prompt should be shown yet
        can_restart: bool,
    },
}

pub trait Renderer {
    fn present(&mut self, sprite: Sprite, top_left: Vec2);
    fn hud(&mut self, hud: &Hud);
    fn overlay(&mut self, overlay: Overlay);
    /// End of frame (flip/present)
    fn finish(&mut self);
}

/// Draws nothing; counts what it was asked to draw
#[derive(Debug, Clone, Default)]
pub struct NullRenderer {
    pub frames: u64,
    pub sprites: u64,
    pub last_hud: Option<Hud>,
    pub last_overlay: Option<Overlay>,
}

impl Renderer for NullRenderer {
    fn present(&mut self, _sprite: Sprite, _top_left: Vec2) {
        self.sprites += 1;
    }

    fn hud(&mut self, hud: &Hud) {
        self.last_hud = Some(*hud);
    }

    fn overlay(&mut self, overlay: Overlay) {
        self.last_overlay = Some(overlay);
    }

    fn finish(&mut self) {
        self.frames += 1;
    }
}
