//! Fixed-tick motion model
//!
//! Velocity snap / friction on the horizontal axis, launch / gravity /
//! terminal velocity on the vertical axis, then ground and world-edge clamps.
//! Positions are bottom-left anchored: `pos.y` is the body's bottom edge.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Per-tick motion constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionParams {
    /// Horizontal speed when a direction is held
    pub speed: f32,
    pub gravity: f32,
    pub friction: f32,
    /// Vertical launch velocity (negative = up)
    pub jump_velocity: f32,
    pub terminal_velocity: f32,
}

/// Movement intent for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MoveIntent {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

impl MoveIntent {
    /// -1, 0 or 1. Holding both directions cancels out.
    pub fn direction(&self) -> i8 {
        match (self.left, self.right) {
            (true, false) => -1,
            (false, true) => 1,
            _ => 0,
        }
    }
}

/// Region a body is confined to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub ground_y: f32,
}

/// A moving box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Bottom-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub airborne: bool,
}

/// What happened during a step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepOutcome {
    pub jumped: bool,
    pub landed: bool,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
            airborne: false,
        }
    }

    /// Advance one tick
    pub fn step(&mut self, intent: MoveIntent, params: &MotionParams, bounds: &Bounds) -> StepOutcome {
        let mut outcome = StepOutcome::default();

        match intent.direction() {
            0 if !self.airborne => self.vel.x = apply_friction(self.vel.x, params.friction),
            0 => {}
            dir => self.vel.x = params.speed * f32::from(dir),
        }

        if intent.jump && !self.airborne {
            self.vel.y = params.jump_velocity;
            self.airborne = true;
            outcome.jumped = true;
        }
        if self.airborne {
            self.vel.y = (self.vel.y + params.gravity).min(params.terminal_velocity);
        }

        let mut next = self.pos + self.vel;

        if next.y >= bounds.ground_y {
            next.y = bounds.ground_y;
            self.vel.y = 0.0;
            if self.airborne {
                self.airborne = false;
                outcome.landed = true;
            }
        }

        let max_x = (bounds.width - self.size.x).max(0.0);
        if next.x <= 0.0 || next.x >= max_x {
            next.x = next.x.clamp(0.0, max_x);
            self.vel.x = 0.0;
        }

        self.pos = next;
        outcome
    }
}

/// Move a velocity toward zero by `friction`, never past it
#[inline]
pub fn apply_friction(velocity: f32, friction: f32) -> f32 {
    if velocity > 0.0 {
        (velocity - friction).max(0.0)
    } else if velocity < 0.0 {
        (velocity + friction).min(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARAMS: MotionParams = MotionParams {
        speed: 6.0,
        gravity: 1.5,
        friction: 1.0,
        jump_velocity: -20.0,
        terminal_velocity: 16.0,
    };
    const BOUNDS: Bounds = Bounds {
        width: 960.0,
        ground_y: 525.0,
    };

    fn grounded_body() -> Body {
        Body::new(Vec2::new(100.0, 525.0), Vec2::new(40.0, 60.0))
    }

    #[test]
    fn test_friction_clamps_at_zero() {
        assert_eq!(apply_friction(2.5, 1.0), 1.5);
        assert_eq!(apply_friction(0.4, 1.0), 0.0);
        assert_eq!(apply_friction(-0.4, 1.0), 0.0);
        assert_eq!(apply_friction(-3.0, 1.0), -2.0);
    }

    #[test]
    fn test_direction_snaps_velocity() {
        let mut body = grounded_body();
        body.step(MoveIntent { right: true, ..Default::default() }, &PARAMS, &BOUNDS);
        assert_eq!(body.vel.x, 6.0);
        assert_eq!(body.pos.x, 106.0);

        body.step(MoveIntent { left: true, ..Default::default() }, &PARAMS, &BOUNDS);
        assert_eq!(body.vel.x, -6.0);

        body.step(MoveIntent { left: true, right: true, jump: false }, &PARAMS, &BOUNDS);
        assert_eq!(body.vel.x, -5.0, "opposing keys count as no intent");
    }

    #[test]
    fn test_jump_launch_and_land() {
        let mut body = grounded_body();
        let out = body.step(MoveIntent { jump: true, ..Default::default() }, &PARAMS, &BOUNDS);
        assert!(out.jumped);
        assert!(body.airborne);
        // Gravity applies on the launch tick
        assert_eq!(body.vel.y, -18.5);
        assert_eq!(body.pos.y, 525.0 - 18.5);

        let mut landed_after = None;
        for t in 0..100 {
            let out = body.step(MoveIntent { jump: true, ..Default::default() }, &PARAMS, &BOUNDS);
            assert!(!out.jumped || landed_after.is_some(), "no jump while airborne");
            if out.landed {
                landed_after = Some(t);
                break;
            }
        }
        assert!(landed_after.is_some());
        assert_eq!(body.pos.y, 525.0);
        assert_eq!(body.vel.y, 0.0);
        assert!(!body.airborne);
    }

    #[test]
    fn test_terminal_velocity() {
        let mut body = grounded_body();
        body.pos.y = -2000.0;
        body.airborne = true;
        for _ in 0..40 {
            body.step(MoveIntent::default(), &PARAMS, &BOUNDS);
            assert!(body.vel.y <= PARAMS.terminal_velocity);
        }
    }

    #[test]
    fn test_airborne_keeps_momentum() {
        let mut body = grounded_body();
        body.vel = Vec2::new(-4.0, -8.0);
        body.airborne = true;
        body.step(MoveIntent::default(), &PARAMS, &BOUNDS);
        assert_eq!(body.vel.x, -4.0);
    }

    #[test]
    fn test_world_edges_clamp() {
        let mut body = grounded_body();
        body.pos.x = 2.0;
        body.step(MoveIntent { left: true, ..Default::default() }, &PARAMS, &BOUNDS);
        assert_eq!(body.pos.x, 0.0);

        body.pos.x = 918.0;
        body.step(MoveIntent { right: true, ..Default::default() }, &PARAMS, &BOUNDS);
        assert_eq!(body.pos.x, 920.0);
    }
}
