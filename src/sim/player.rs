//! Player state machine
//!
//! Owns the body, health, invulnerability window and animation cursor.
//! Animation frames advance on wall-clock time, not ticks.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::config::GameConfig;
use super::mask::CollisionMask;
use super::motion::{Body, Bounds, MotionParams, MoveIntent, StepOutcome};
use crate::Rect;
use crate::assets::{PlayerAnimations, SpriteFrame};

/// Animation action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Idle = 0,
    Walk = 1,
    Jump = 2,
    Death = 3,
}

impl Action {
    pub const COUNT: usize = 4;

    /// Sprite sheet action names, in order of preference
    pub fn sheet_names(self) -> &'static [&'static str] {
        match self {
            Action::Idle => &["idle"],
            Action::Walk => &["walk", "run"],
            Action::Jump => &["jump"],
            Action::Death => &["death"],
        }
    }
}

/// The action a freshly spawned or reset player shows
pub const INITIAL_ACTION: Action = Action::Idle;

/// Player tuning extracted from `GameConfig`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerConfig {
    pub motion: MotionParams,
    pub bounds: Bounds,
    pub spawn: Vec2,
    pub max_health: u8,
    pub invulnerability_ticks: u32,
    pub flicker_interval_ticks: u32,
    pub knockback: Vec2,
    pub animation_cooldown_ms: u64,
}

impl From<&GameConfig> for PlayerConfig {
    fn from(config: &GameConfig) -> Self {
        Self {
            motion: config.motion_params(),
            bounds: Bounds {
                width: config.world_width,
                ground_y: config.ground_y,
            },
            spawn: Vec2::new(config.spawn_x, config.ground_y),
            max_health: config.max_health,
            invulnerability_ticks: config.invulnerability_ticks,
            flicker_interval_ticks: config.flicker_interval_ticks.max(1),
            knockback: Vec2::new(config.knockback.0, config.knockback.1),
            animation_cooldown_ms: config.animation_cooldown_ms,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub body: Body,
    health: u8,
    invulnerable_ticks: u32,
    action: Action,
    frame_index: usize,
    last_frame_ms: Option<u64>,
    death_complete: bool,
    /// Flicker bit for rendering; false on "off" ticks while invulnerable
    visible: bool,
    facing_left: bool,
    intent: MoveIntent,
    animations: PlayerAnimations,
    config: PlayerConfig,
}

impl Player {
    pub fn new(config: PlayerConfig, animations: PlayerAnimations) -> Self {
        let size = animations.frame(INITIAL_ACTION, 0).mask.size();
        Self {
            body: Body::new(config.spawn, size),
            health: config.max_health,
            invulnerable_ticks: 0,
            action: INITIAL_ACTION,
            frame_index: 0,
            last_frame_ms: None,
            death_complete: false,
            visible: true,
            facing_left: false,
            intent: MoveIntent::default(),
            animations,
            config,
        }
    }

    pub fn health(&self) -> u8 {
        self.health
    }

    pub fn max_health(&self) -> u8 {
        self.config.max_health
    }

    pub fn invulnerable_ticks(&self) -> u32 {
        self.invulnerable_ticks
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn facing_left(&self) -> bool {
        self.facing_left
    }

    pub fn is_dead(&self) -> bool {
        self.health == 0
    }

    /// Death animation has shown its last frame for a full cooldown
    pub fn death_complete(&self) -> bool {
        self.death_complete
    }

    pub fn intent(&self) -> MoveIntent {
        self.intent
    }

    /// Record intent for the coming tick (last writer wins)
    pub fn apply_input(&mut self, intent: MoveIntent) {
        self.intent = intent;
    }

    pub fn current_frame(&self) -> &SpriteFrame {
        self.animations.frame(self.action, self.frame_index)
    }

    pub fn collision_mask(&self) -> &CollisionMask {
        self.current_frame().mask_facing(self.facing_left)
    }

    /// Screen rect of the current frame
    pub fn rect(&self) -> Rect {
        Rect::from_bottom_left(self.body.pos, self.collision_mask().size())
    }

    /// Advance one tick: invulnerability, motion, action, animation
    pub fn tick(&mut self, now_ms: u64) -> StepOutcome {
        if self.invulnerable_ticks > 0 {
            self.invulnerable_ticks -= 1;
            if self.invulnerable_ticks == 0 {
                self.visible = true;
            } else if self
                .invulnerable_ticks
                % self.config.flicker_interval_ticks
                == 0
            {
                self.visible = !self.visible;
            }
        }

        let intent = if self.is_dead() {
            MoveIntent::default()
        } else {
            self.intent
        };
        match intent.direction() {
            -1 => self.facing_left = true,
            1 => self.facing_left = false,
            _ => {}
        }

        let outcome = self.body.step(intent, &self.config.motion, &self.config.bounds);

        let next = if self.is_dead() {
            Action::Death
        } else if self.body.airborne || intent.jump {
            Action::Jump
        } else if intent.direction() != 0 {
            Action::Walk
        } else {
            Action::Idle
        };
        self.set_action(next);
        self.advance_animation(now_ms);

        // Jump requests do not carry over to the next tick
        self.intent.jump = false;
        self.body.size = self.collision_mask().size();
        outcome
    }

    /// Take one point of damage unless invulnerable or already dead.
    /// Returns whether health was lost.
    pub fn hit(&mut self) -> bool {
        if self.invulnerable_ticks > 0 || self.is_dead() {
            return false;
        }
        self.take_hit();
        true
    }

    /// Damage that ignores the invulnerability window (hit-once obstacles)
    pub fn hit_ignoring_invulnerability(&mut self) -> bool {
        if self.is_dead() {
            return false;
        }
        self.take_hit();
        true
    }

    fn take_hit(&mut self) {
        self.health = self.health.saturating_sub(1);
        self.invulnerable_ticks = self.config.invulnerability_ticks;
        self.visible = self.invulnerable_ticks == 0;
        self.body.vel = self.config.knockback;
        self.body.airborne = true;
        log::debug!(
            "Player hit: health {}/{}",
            self.health,
            self.config.max_health
        );
        if self.is_dead() {
            self.set_action(Action::Death);
        }
    }

    /// Back to the spawn point with full health
    pub fn reset(&mut self) {
        self.health = self.config.max_health;
        self.invulnerable_ticks = 0;
        self.visible = true;
        self.facing_left = false;
        self.intent = MoveIntent::default();
        self.action = INITIAL_ACTION;
        self.frame_index = 0;
        self.last_frame_ms = None;
        self.death_complete = false;
        let size = self.animations.frame(INITIAL_ACTION, 0).mask.size();
        self.body = Body::new(self.config.spawn, size);
    }

    fn set_action(&mut self, action: Action) {
        if action != self.action {
            self.action = action;
            self.frame_index = 0;
            self.last_frame_ms = None;
            self.death_complete = false;
        }
    }

    fn advance_animation(&mut self, now_ms: u64) {
        let last = *self.last_frame_ms.get_or_insert(now_ms);
        if now_ms.saturating_sub(last) < self.config.animation_cooldown_ms {
            return;
        }
        self.last_frame_ms = Some(now_ms);

        let count = self.animations.frame_count(self.action);
        if self.action == Action::Death {
            if self.frame_index + 1 < count {
                self.frame_index += 1;
            } else {
                self.death_complete = true;
            }
        } else {
            self.frame_index = (self.frame_index + 1) % count;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::SpriteSheet;

    fn player() -> Player {
        let config = PlayerConfig::from(&GameConfig::default());
        let sheet = SpriteSheet::placeholder(20, 30, 4, 2);
        Player::new(config, PlayerAnimations::from_sheet(&sheet).unwrap())
    }

    #[test]
    fn test_spawns_grounded_with_full_health() {
        let p = player();
        assert_eq!(p.health(), 5);
        assert_eq!(p.body.pos, Vec2::new(75.0, 525.0));
        assert_eq!(p.rect().size, Vec2::new(40.0, 60.0));
        assert_eq!(p.action(), INITIAL_ACTION);
    }

    #[test]
    fn test_invulnerability_window() {
        let mut p = player();
        assert!(p.hit());
        assert_eq!(p.health(), 4);
        assert_eq!(p.invulnerable_ticks(), 60);

        for _ in 0..59 {
            p.tick(0);
            assert!(!p.hit(), "hit inside the window must be ignored");
            assert_eq!(p.health(), 4);
        }
        p.tick(0);
        assert_eq!(p.invulnerable_ticks(), 0);
        assert!(p.hit());
        assert_eq!(p.health(), 3);
    }

    #[test]
    fn test_hit_applies_knockback() {
        let mut p = player();
        p.hit();
        assert!(p.body.airborne);
        assert_eq!(p.body.vel, Vec2::new(-4.0, -8.0));
        let x = p.body.pos.x;
        p.tick(0);
        assert!(p.body.pos.x < x);
        assert_eq!(p.action(), Action::Jump);
    }

    #[test]
    fn test_flicker_while_invulnerable() {
        let mut p = player();
        p.hit();
        let mut toggles = 0;
        let mut last = p.is_visible();
        for _ in 0..60 {
            p.tick(0);
            if p.is_visible() != last {
                toggles += 1;
                last = p.is_visible();
            }
        }
        assert!(toggles > 2);
        assert!(p.is_visible(), "visible once the window closes");
    }

    #[test]
    fn test_action_transitions() {
        let mut p = player();
        p.apply_input(MoveIntent { right: true, ..Default::default() });
        p.tick(0);
        assert_eq!(p.action(), Action::Walk);

        p.apply_input(MoveIntent { jump: true, ..Default::default() });
        p.tick(10);
        assert_eq!(p.action(), Action::Jump);
        assert_eq!(p.frame_index(), 0);

        // Jump request is consumed; player stays in Jump until landing
        p.tick(20);
        assert!(!p.intent().jump);
        assert_eq!(p.action(), Action::Jump);
    }

    #[test]
    fn test_animation_follows_wall_clock() {
        let mut p = player();
        p.tick(0);
        assert_eq!(p.frame_index(), 0);
        // Many ticks inside one cooldown do not advance the frame
        for t in 1..10 {
            p.tick(t * 10 - 1);
        }
        assert_eq!(p.frame_index(), 0);
        p.tick(100);
        assert_eq!(p.frame_index(), 1);
        p.tick(150);
        assert_eq!(p.frame_index(), 1);
        p.tick(400);
        assert_eq!(p.frame_index(), 2);
        p.tick(500);
        p.tick(600);
        assert_eq!(p.frame_index(), 0, "cycles over the frame count");
    }

    #[test]
    fn test_death_is_sticky_and_holds_last_frame() {
        let mut p = player();
        for _ in 0..5 {
            p.hit_ignoring_invulnerability();
        }
        assert!(p.is_dead());
        assert_eq!(p.action(), Action::Death);
        assert!(!p.hit());

        p.apply_input(MoveIntent { right: true, jump: true, left: false });
        let mut now = 0;
        for _ in 0..10 {
            p.tick(now);
            now += 100;
        }
        assert_eq!(p.action(), Action::Death);
        assert_eq!(p.frame_index(), 3);
        assert!(p.death_complete());
        assert_eq!(p.health(), 0);
    }

    #[test]
    fn test_reset_restores_spawn_state() {
        let mut p = player();
        for _ in 0..5 {
            p.hit_ignoring_invulnerability();
        }
        p.tick(0);
        p.reset();
        assert_eq!(p.health(), 5);
        assert_eq!(p.invulnerable_ticks(), 0);
        assert_eq!(p.body.vel, Vec2::ZERO);
        assert!(!p.body.airborne);
        assert_eq!(p.body.pos, Vec2::new(75.0, 525.0));
        assert_eq!(p.action(), INITIAL_ACTION);
        assert!(!p.death_complete());
    }
}
