//! Scrolling world: shared scroll speed, its ramp, and the scenery it moves
//!
//! Scenery never collides with anything; it only has to tile and wrap so the
//! renderer always has something to draw across the full width.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::config::GameConfig;

/// Ground tile width (pixels)
pub const TILE_WIDTH: f32 = 48.0;
/// Number of parallax backdrop panels (each one world wide)
pub const BACKDROP_PANELS: usize = 2;
const GRASS_COUNT: usize = 24;
const BUSH_COUNT: usize = 8;
/// Gap range between trees (pixels, step 100), drawn fresh every tick
const TREE_GAP: (u32, u32) = (800, 1500);

fn tree_gap<R: Rng>(rng: &mut R) -> f32 {
    let steps = (TREE_GAP.1 - TREE_GAP.0) / 100;
    (TREE_GAP.0 + 100 * rng.random_range(0..=steps)) as f32
}

/// Ring of ground tiles. The tile that leaves the screen is moved to just past
/// the current last tile, so the strip never has a gap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundStrip {
    tile_width: f32,
    xs: Vec<f32>,
    /// Index of the leftmost tile
    head: usize,
}

impl GroundStrip {
    pub fn new(world_width: f32, tile_width: f32) -> Self {
        let count = (world_width / tile_width).ceil() as usize + 1;
        Self {
            tile_width,
            xs: (0..count).map(|i| i as f32 * tile_width).collect(),
            head: 0,
        }
    }

    pub fn tile_width(&self) -> f32 {
        self.tile_width
    }

    pub fn advance(&mut self, speed: f32) {
        for x in &mut self.xs {
            *x -= speed;
        }
        let n = self.xs.len();
        while self.xs[self.head] + self.tile_width <= 0.0 {
            let tail = (self.head + n - 1) % n;
            self.xs[self.head] = self.xs[tail] + self.tile_width;
            self.head = (self.head + 1) % n;
        }
    }

    /// Tile x positions, left to right
    pub fn tiles(&self) -> impl Iterator<Item = f32> + '_ {
        let n = self.xs.len();
        (0..n).map(move |i| self.xs[(self.head + i) % n])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecorKind {
    Grass,
    Bush,
    Tree,
}

/// A piece of scenery standing on the ground line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decor {
    pub kind: DecorKind,
    /// Variant index within the kind's sprite set
    pub variant: u8,
    /// Bottom-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub flipped: bool,
}

impl Decor {
    fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenery {
    /// Backdrop panel x offsets
    pub backdrop: [f32; BACKDROP_PANELS],
    pub ground: GroundStrip,
    /// Bushes behind the player (wrap)
    pub rear: Vec<Decor>,
    /// Trees (spawned at the right edge, dropped offscreen)
    pub trees: Vec<Decor>,
    /// Grass in front of the player (wraps)
    pub fore: Vec<Decor>,
}

impl Scenery {
    pub fn generate<R: Rng>(config: &GameConfig, rng: &mut R) -> Self {
        let width = config.world_width;
        let ground = config.ground_y;

        let rear = (0..BUSH_COUNT)
            .map(|i| {
                let scale: f32 = rng.random_range(0.5..1.0);
                Decor {
                    kind: DecorKind::Bush,
                    variant: rng.random_range(0..3),
                    pos: Vec2::new(i as f32 * width / BUSH_COUNT as f32 + rng.random_range(50.0..100.0), ground),
                    size: Vec2::new(96.0, 64.0) * scale,
                    flipped: rng.random_bool(0.5),
                }
            })
            .collect();

        let fore = (0..GRASS_COUNT)
            .map(|i| Decor {
                kind: DecorKind::Grass,
                variant: rng.random_range(0..4),
                pos: Vec2::new(
                    i as f32 * width / GRASS_COUNT as f32 - rng.random_range(0.0..20.0),
                    ground + rng.random_range(0.0..5.0),
                ),
                size: Vec2::new(32.0, 16.0),
                flipped: rng.random_bool(0.5),
            })
            .collect();

        let mut scenery = Self {
            backdrop: std::array::from_fn(|i| i as f32 * width),
            ground: GroundStrip::new(width, TILE_WIDTH),
            rear,
            trees: Vec::new(),
            fore,
        };
        let first_x = [400.0, 450.0, 500.0][rng.random_range(0..3)];
        scenery.plant_tree(first_x, config, rng);
        scenery
    }

    fn plant_tree<R: Rng>(&mut self, x: f32, config: &GameConfig, rng: &mut R) {
        let scale: f32 = rng.random_range(1.5..2.5);
        self.trees.push(Decor {
            kind: DecorKind::Tree,
            variant: rng.random_range(0..2),
            pos: Vec2::new(x, config.ground_y),
            size: Vec2::new(64.0, 96.0) * scale,
            flipped: rng.random_bool(0.5),
        });
    }

    /// Scroll everything one tick
    pub fn advance<R: Rng>(&mut self, scroll_speed: f32, config: &GameConfig, rng: &mut R) {
        let width = config.world_width;

        for x in &mut self.backdrop {
            *x -= config.backdrop_scroll_speed;
            if *x + width <= 0.0 {
                *x += width * BACKDROP_PANELS as f32;
            }
        }

        self.ground.advance(scroll_speed);

        for decor in self.rear.iter_mut().chain(self.fore.iter_mut()) {
            decor.pos.x -= scroll_speed;
            if decor.right() <= 0.0 {
                decor.pos.x = width;
            }
        }

        for tree in &mut self.trees {
            tree.pos.x -= scroll_speed;
        }
        self.trees.retain(|t| t.right() > 0.0);

        let last_right = self.trees.last().map(Decor::right).unwrap_or(f32::MIN);
        if width - last_right > tree_gap(rng) {
            self.plant_tree(width, config, rng);
        }
    }
}

/// Per-session mutable world state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldState {
    /// Leftward pixels per tick shared by obstacles and scenery
    pub scroll_speed: f32,
    /// Speed-ups applied so far
    pub speed_ups: u32,
    pub scenery: Scenery,
}

impl WorldState {
    pub fn new<R: Rng>(config: &GameConfig, rng: &mut R) -> Self {
        Self {
            scroll_speed: config.base_scroll_speed,
            speed_ups: 0,
            scenery: Scenery::generate(config, rng),
        }
    }

    /// Apply the speed-ups owed for `elapsed_ms` of play time.
    /// Returns the new speed when it changed.
    pub fn ramp(&mut self, elapsed_ms: u64, config: &GameConfig) -> Option<f32> {
        let owed = (elapsed_ms / (config.speed_up_interval_secs * 1000)) as u32;
        if owed <= self.speed_ups {
            return None;
        }
        let before = self.scroll_speed;
        self.speed_ups = owed;
        self.scroll_speed = (config.base_scroll_speed + owed as f32 * config.speed_up_step)
            .min(config.max_scroll_speed);
        (self.scroll_speed != before).then_some(self.scroll_speed)
    }
}
