//! Obstacle variants, weighted generation and the live pool
//!
//! Variants are rows of a static table; the generator rolls against the
//! cumulative weights and the pool shares one mask per variant.

use std::sync::Arc;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::mask::CollisionMask;
use crate::Rect;

/// Obstacle appearance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    Crate,
    Log,
    Signboard,
    Scarecrow,
    Statue,
}

/// Solid silhouette used to build a variant's mask
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskShape {
    /// Fills the box
    Box,
    /// Ellipse inscribed in the box (log seen end-on)
    Ellipse,
    /// Board over the top 60%, post down the middle third
    Board,
    /// Crossbar over a center pole
    Cross,
    /// Narrows from the base to half width at the top
    Taper,
}

impl MaskShape {
    /// Solid test in unit box coordinates (u, v in 0..1, v down)
    fn contains(self, u: f32, v: f32) -> bool {
        match self {
            MaskShape::Box => true,
            MaskShape::Ellipse => {
                let (du, dv) = (u - 0.5, v - 0.5);
                du * du + dv * dv <= 0.25
            }
            MaskShape::Board => v < 0.6 || (u - 0.5).abs() < 1.0 / 6.0,
            MaskShape::Cross => {
                (0.2..0.4).contains(&v) || (u - 0.5).abs() < 0.12 || (v < 0.2 && (u - 0.5).abs() < 0.2)
            }
            MaskShape::Taper => (u - 0.5).abs() <= 0.25 + 0.25 * v,
        }
    }

    pub fn build(self, width: u32, height: u32) -> CollisionMask {
        CollisionMask::from_fn(width, height, |x, y| {
            let u = (x as f32 + 0.5) / width as f32;
            let v = (y as f32 + 0.5) / height as f32;
            self.contains(u, v)
        })
    }
}

/// Static description of a variant
#[derive(Debug, Clone, Copy)]
pub struct ObstacleVariant {
    pub kind: ObstacleKind,
    /// Renderer asset id
    pub asset: &'static str,
    /// Sprite size before scaling
    pub base_size: (u32, u32),
    pub scale: u32,
    pub shape: MaskShape,
    /// Relative spawn weight
    pub weight: u32,
}

impl ObstacleVariant {
    pub fn size(&self) -> (u32, u32) {
        (self.base_size.0 * self.scale, self.base_size.1 * self.scale)
    }
}

pub const VARIANTS: [ObstacleVariant; 5] = [
    ObstacleVariant {
        kind: ObstacleKind::Crate,
        asset: "obstacle_crate",
        base_size: (20, 20),
        scale: 2,
        shape: MaskShape::Box,
        weight: 45,
    },
    ObstacleVariant {
        kind: ObstacleKind::Log,
        asset: "obstacle_log",
        base_size: (24, 16),
        scale: 2,
        shape: MaskShape::Ellipse,
        weight: 25,
    },
    ObstacleVariant {
        kind: ObstacleKind::Signboard,
        asset: "obstacle_signboard",
        base_size: (24, 28),
        scale: 2,
        shape: MaskShape::Board,
        weight: 20,
    },
    ObstacleVariant {
        kind: ObstacleKind::Scarecrow,
        asset: "obstacle_scarecrow",
        base_size: (20, 32),
        scale: 2,
        shape: MaskShape::Cross,
        weight: 5,
    },
    ObstacleVariant {
        kind: ObstacleKind::Statue,
        asset: "obstacle_statue",
        base_size: (28, 35),
        scale: 2,
        shape: MaskShape::Taper,
        weight: 5,
    },
];

impl ObstacleKind {
    pub fn variant(self) -> &'static ObstacleVariant {
        &VARIANTS[self.index()]
    }

    fn index(self) -> usize {
        match self {
            ObstacleKind::Crate => 0,
            ObstacleKind::Log => 1,
            ObstacleKind::Signboard => 2,
            ObstacleKind::Scarecrow => 3,
            ObstacleKind::Statue => 4,
        }
    }
}

/// Weighted draw over `VARIANTS`
pub fn choose_kind<R: Rng>(rng: &mut R) -> ObstacleKind {
    let total: u32 = VARIANTS.iter().map(|v| v.weight).sum();
    let mut roll = rng.random_range(0..total);
    for variant in &VARIANTS {
        if roll < variant.weight {
            return variant.kind;
        }
        roll -= variant.weight;
    }
    VARIANTS[0].kind
}

/// A live obstacle
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Bottom-left corner
    pub pos: Vec2,
    pub mask: Arc<CollisionMask>,
    /// Consumed on first overlap under the hit-once policy
    pub hit_consumed: bool,
}

impl Obstacle {
    pub fn rect(&self) -> Rect {
        Rect::from_bottom_left(self.pos, self.mask.size())
    }

    /// Trailing (right) edge
    pub fn right(&self) -> f32 {
        self.pos.x + self.mask.width() as f32
    }
}

/// Spawn tuning for the pool
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRules {
    pub world_width: f32,
    pub ground_y: f32,
    pub max_active: usize,
    /// Fraction-of-width range the last spawn must scroll past
    pub spacing: (f32, f32),
}

/// Bounded set of live obstacles
#[derive(Debug, Clone)]
pub struct ObstacleField {
    active: Vec<Obstacle>,
    last_spawned: Option<u32>,
    next_id: u32,
    masks: Vec<Arc<CollisionMask>>,
    rules: SpawnRules,
}

impl ObstacleField {
    pub fn new(rules: SpawnRules) -> Self {
        let masks = VARIANTS
            .iter()
            .map(|v| {
                let (w, h) = v.size();
                Arc::new(v.shape.build(w, h))
            })
            .collect();
        Self {
            active: Vec::with_capacity(rules.max_active),
            last_spawned: None,
            next_id: 1,
            masks,
            rules,
        }
    }

    pub fn active(&self) -> &[Obstacle] {
        &self.active
    }

    pub fn active_mut(&mut self) -> &mut [Obstacle] {
        &mut self.active
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn clear(&mut self) {
        self.active.clear();
        self.last_spawned = None;
    }

    /// Place an obstacle with its trailing edge on the world's right edge
    pub fn spawn(&mut self, kind: ObstacleKind) -> &Obstacle {
        let mask = Arc::clone(&self.masks[kind.index()]);
        let pos = Vec2::new(self.rules.world_width - mask.width() as f32, self.rules.ground_y);
        let id = self.next_id;
        self.next_id += 1;
        self.active.push(Obstacle {
            id,
            kind,
            pos,
            mask,
            hit_consumed: false,
        });
        self.last_spawned = Some(id);
        log::debug!("Spawned {:?} #{} at x={}", kind, id, pos.x);
        &self.active[self.active.len() - 1]
    }

    /// Whether the pool has room and the previous spawn has moved far enough
    /// left of `threshold_fraction * world_width`
    pub fn can_spawn(&self, threshold_fraction: f32) -> bool {
        if self.active.len() >= self.rules.max_active {
            return false;
        }
        let last = self
            .last_spawned
            .and_then(|id| self.active.iter().find(|o| o.id == id));
        match last {
            Some(o) => o.pos.x < self.rules.world_width * threshold_fraction,
            None => true,
        }
    }

    /// Spawn a weighted-random obstacle if the spacing rule allows it
    pub fn maybe_spawn<R: Rng>(&mut self, rng: &mut R) -> Option<ObstacleKind> {
        let (lo, hi) = self.rules.spacing;
        let threshold = rng.random_range(lo..hi);
        if !self.can_spawn(threshold) {
            return None;
        }
        let kind = choose_kind(rng);
        self.spawn(kind);
        Some(kind)
    }

    /// Scroll every obstacle left
    pub fn advance(&mut self, scroll_speed: f32) {
        for obstacle in &mut self.active {
            obstacle.pos.x -= scroll_speed;
        }
    }

    /// Remove obstacles whose trailing edge reached x <= 0.
    /// Returns how many were retired (one point each).
    pub fn retire_offscreen(&mut self) -> u32 {
        let before = self.active.len();
        self.active.retain(|o| o.right() > 0.0);
        (before - self.active.len()) as u32
    }
}
