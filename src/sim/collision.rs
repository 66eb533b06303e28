//! Player vs. obstacle collision pass
//!
//! Bounding boxes reject most pairs; the survivors are compared pixel by pixel
//! using the player's current frame mask and the obstacle's variant mask.

use super::config::CollisionPolicy;
use super::mask::{CollisionMask, mask_offset};
use super::obstacle::{Obstacle, ObstacleField};
use super::player::Player;
use crate::Rect;

/// Outcome of one obstacle overlap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Cost the player one health
    Hit,
    /// Overlapped but did no damage (invulnerable, already consumed or dead)
    Graze,
}

/// Result of a full collision pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// Ids of obstacles that damaged the player this tick
    pub hits: Vec<u32>,
    /// Ids of obstacles that overlapped without damage
    pub grazes: Vec<u32>,
}

impl CollisionReport {
    pub fn any_hit(&self) -> bool {
        !self.hits.is_empty()
    }
}

/// Pixel-accurate overlap between two masks placed at their rects
pub fn masks_overlap(a: &CollisionMask, a_rect: &Rect, b: &CollisionMask, b_rect: &Rect) -> bool {
    if !a_rect.intersects(b_rect) {
        return false;
    }
    a.overlaps(b, mask_offset(a_rect.min, b_rect.min))
}

/// Whether the player's current frame touches `obstacle`
pub fn player_touches(player: &Player, obstacle: &Obstacle) -> bool {
    masks_overlap(
        player.collision_mask(),
        &player.rect(),
        &obstacle.mask,
        &obstacle.rect(),
    )
}

/// Resolve one overlap under `policy`
fn resolve(player: &mut Player, obstacle: &mut Obstacle, policy: CollisionPolicy) -> Contact {
    let damaged = match policy {
        CollisionPolicy::InvulnerabilityGated => player.hit(),
        CollisionPolicy::HitOnce => {
            if obstacle.hit_consumed {
                false
            } else {
                obstacle.hit_consumed = true;
                player.hit_ignoring_invulnerability()
            }
        }
    };
    if damaged { Contact::Hit } else { Contact::Graze }
}

/// Test every live obstacle against the player, in spawn order.
/// Runs before retirement so an obstacle leaving this tick can still hit.
pub fn collision_pass(
    player: &mut Player,
    field: &mut ObstacleField,
    policy: CollisionPolicy,
) -> CollisionReport {
    let mut report = CollisionReport::default();
    for obstacle in field.active_mut() {
        if !player_touches(player, obstacle) {
            continue;
        }
        match resolve(player, obstacle, policy) {
            Contact::Hit => {
                log::debug!("Hit by {:?} #{}", obstacle.kind, obstacle.id);
                report.hits.push(obstacle.id);
            }
            Contact::Graze => report.grazes.push(obstacle.id),
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{PlayerAnimations, SpriteSheet};
    use crate::sim::config::GameConfig;
    use crate::sim::obstacle::{ObstacleKind, SpawnRules};
    use crate::sim::player::PlayerConfig;
    use glam::Vec2;

    fn setup() -> (Player, ObstacleField) {
        let config = GameConfig::default();
        let sheet = SpriteSheet::placeholder(20, 30, 4, 2);
        let player = Player::new(
            PlayerConfig::from(&config),
            PlayerAnimations::from_sheet(&sheet).unwrap(),
        );
        let field = ObstacleField::new(SpawnRules {
            world_width: config.world_width,
            ground_y: config.ground_y,
            max_active: config.max_obstacles,
            spacing: config.spawn_spacing,
        });
        (player, field)
    }

    /// Move the first live obstacle so its left edge sits at `x`
    fn place(field: &mut ObstacleField, x: f32) {
        field.active_mut()[0].pos.x = x;
    }

    #[test]
    fn test_no_overlap_far_away() {
        let (mut player, mut field) = setup();
        field.spawn(ObstacleKind::Crate);
        let report = collision_pass(&mut player, &mut field, CollisionPolicy::default());
        assert_eq!(report, CollisionReport::default());
        assert_eq!(player.health(), 5);
    }

    #[test]
    fn test_overlap_hits_once_per_window() {
        let (mut player, mut field) = setup();
        field.spawn(ObstacleKind::Crate);
        place(&mut field, player.body.pos.x + 10.0);

        let report = collision_pass(&mut player, &mut field, CollisionPolicy::InvulnerabilityGated);
        assert_eq!(report.hits.len(), 1);
        assert_eq!(player.health(), 4);

        // Still overlapping next pass, but invulnerable
        player.body.pos = Vec2::new(75.0, 525.0);
        let report = collision_pass(&mut player, &mut field, CollisionPolicy::InvulnerabilityGated);
        assert!(!report.any_hit());
        assert_eq!(report.grazes.len(), 1);
        assert_eq!(player.health(), 4);
    }

    #[test]
    fn test_hit_once_ignores_invulnerability_but_not_repeats() {
        let (mut player, mut field) = setup();
        field.spawn(ObstacleKind::Crate);
        place(&mut field, player.body.pos.x + 10.0);
        assert!(player.hit(), "arm the invulnerability window first");
        assert_eq!(player.health(), 4);

        let report = collision_pass(&mut player, &mut field, CollisionPolicy::HitOnce);
        assert_eq!(report.hits.len(), 1, "first overlap always counts");
        assert_eq!(player.health(), 3);
        assert!(field.active()[0].hit_consumed);

        player.body.pos = Vec2::new(75.0, 525.0);
        let report = collision_pass(&mut player, &mut field, CollisionPolicy::HitOnce);
        assert!(!report.any_hit());
        assert_eq!(player.health(), 3);
    }

    #[test]
    fn test_graze_past_empty_corner() {
        // The log is an ellipse: a box touching only its top-left corner
        // overlaps the bounding box but no solid pixel.
        let (mut player, mut field) = setup();
        field.spawn(ObstacleKind::Log);
        let log_rect = field.active()[0].rect();
        let player_rect = player.rect();

        // Put the player's bottom-right corner 3px into the log's top-left corner
        player.body.pos = Vec2::new(
            log_rect.min.x - player_rect.size.x + 3.0,
            log_rect.min.y + 3.0,
        );
        assert!(player.rect().intersects(&log_rect));
        assert!(!player_touches(&player, &field.active()[0]));

        // Straight into the middle is a hit
        player.body.pos = Vec2::new(log_rect.min.x + 5.0, log_rect.bottom());
        assert!(player_touches(&player, &field.active()[0]));
        let report = collision_pass(&mut player, &mut field, CollisionPolicy::default());
        assert_eq!(report.hits, vec![field.active()[0].id]);
    }

    #[test]
    fn test_dead_player_only_grazes() {
        let (mut player, mut field) = setup();
        field.spawn(ObstacleKind::Crate);
        place(&mut field, player.body.pos.x + 10.0);
        for _ in 0..5 {
            player.hit_ignoring_invulnerability();
        }
        assert!(player.is_dead());
        let report = collision_pass(&mut player, &mut field, CollisionPolicy::HitOnce);
        assert!(!report.any_hit());
        assert_eq!(player.health(), 0);
    }
}
