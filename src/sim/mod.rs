//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (obstacles in spawn order)
//! - No rendering, audio or platform dependencies; effects leave as `GameEvent`s

pub mod collision;
pub mod config;
pub mod mask;
pub mod motion;
pub mod obstacle;
pub mod player;
pub mod state;
pub mod stopwatch;
pub mod tick;
pub mod world;

pub use collision::{CollisionReport, Contact, collision_pass};
pub use config::{CollisionPolicy, GameConfig};
pub use mask::CollisionMask;
pub use motion::{Body, MoveIntent};
pub use obstacle::{Obstacle, ObstacleField, ObstacleKind, VARIANTS};
pub use player::{Action, Player};
pub use state::{Game, GameEvent, GamePhase, Scoreboard};
pub use stopwatch::{Stopwatch, TimerState};
pub use tick::{TickInput, autopilot, tick};
pub use world::WorldState;
