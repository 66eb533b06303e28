//! Frame assembly: game state to draw calls, back to front

use glam::Vec2;

use super::{Hud, Overlay, Renderer, Sprite};
use crate::Rect;
use crate::error::TimerError;
use crate::settings::Settings;
use crate::sim::world::Decor;
use crate::sim::{Game, GamePhase};

fn decor_sprite(decor: &Decor) -> (Sprite, Vec2) {
    let rect = Rect::from_bottom_left(decor.pos, decor.size);
    let sprite = Sprite::Decor {
        kind: decor.kind,
        variant: decor.variant,
        size: decor.size,
        flipped: decor.flipped,
    };
    (sprite, rect.min)
}

/// Draw one frame of `game`
pub fn draw_frame(
    game: &Game,
    settings: &Settings,
    now_ms: u64,
    renderer: &mut dyn Renderer,
) -> Result<(), TimerError> {
    let config = &game.config;
    let scenery = &game.world.scenery;

    // Background layers
    for &x in &scenery.backdrop {
        renderer.present(Sprite::Backdrop, Vec2::new(x, 0.0));
    }
    for decor in scenery.rear.iter().chain(scenery.trees.iter()) {
        let (sprite, pos) = decor_sprite(decor);
        renderer.present(sprite, pos);
    }
    let tile_width = scenery.ground.tile_width();
    for x in scenery.ground.tiles() {
        renderer.present(
            Sprite::GroundTile { width: tile_width },
            Vec2::new(x, config.ground_y),
        );
    }

    // Obstacles and player
    for obstacle in game.obstacles.active() {
        let rect = obstacle.rect();
        let sprite = Sprite::Obstacle {
            asset: obstacle.kind.variant().asset,
            size: rect.size,
        };
        renderer.present(sprite, rect.min);
    }
    let player = &game.player;
    let player_rect = player.rect();
    if player.is_visible() {
        let sprite = Sprite::Player {
            frame: player.current_frame().rect,
            size: player_rect.size,
            flipped: player.facing_left(),
        };
        renderer.present(sprite, player_rect.min);
    }

    // Foreground grass covers the feet
    for decor in &scenery.fore {
        let (sprite, pos) = decor_sprite(decor);
        renderer.present(sprite, pos);
    }

    if settings.show_hitboxes {
        renderer.present(Sprite::Hitbox { size: player_rect.size }, player_rect.min);
        for obstacle in game.obstacles.active() {
            let rect = obstacle.rect();
            renderer.present(Sprite::Hitbox { size: rect.size }, rect.min);
        }
    }

    renderer.hud(&Hud {
        score: game.scoreboard.score(),
        high_score: game.scoreboard.high_score(),
        health: player.health(),
        max_health: player.max_health(),
        elapsed_ms: game.elapsed_ms(now_ms)?,
        scroll_speed: game.world.scroll_speed,
        session: game.session,
    });

    match game.phase {
        GamePhase::Playing => {}
        GamePhase::Paused => renderer.overlay(Overlay::Paused),
        GamePhase::Ended => renderer.overlay(Overlay::GameOver {
            score: game.scoreboard.score(),
            high_score: game.scoreboard.high_score(),
            run_time_ms: game.last_run_time_ms.unwrap_or(0),
            can_restart: game.can_restart(now_ms),
        }),
    }

    renderer.finish();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{PlayerAnimations, SpriteSheet};
    use crate::renderer::NullRenderer;
    use crate::sim::GameConfig;

    fn game() -> Game {
        let sheet = SpriteSheet::placeholder(20, 30, 4, 2);
        Game::new(
            GameConfig::default(),
            PlayerAnimations::from_sheet(&sheet).unwrap(),
            8,
            0,
        )
        .unwrap()
    }

    /// Records sprites in draw order
    #[derive(Default)]
    struct DrawList {
        sprites: Vec<Sprite>,
        overlay: Option<Overlay>,
        finished: bool,
    }

    impl Renderer for DrawList {
        fn present(&mut self, sprite: Sprite, _top_left: Vec2) {
            self.sprites.push(sprite);
        }
        fn hud(&mut self, _hud: &Hud) {}
        fn overlay(&mut self, overlay: Overlay) {
            self.overlay = Some(overlay);
        }
        fn finish(&mut self) {
            self.finished = true;
        }
    }

    #[test]
    fn test_draw_order() {
        let game = game();
        let mut list = DrawList::default();
        draw_frame(&game, &Settings::default(), 0, &mut list).unwrap();
        assert!(list.finished);
        assert_eq!(list.sprites[0], Sprite::Backdrop);

        let index = |pred: fn(&Sprite) -> bool| list.sprites.iter().position(pred).unwrap();
        let ground = index(|s| matches!(s, Sprite::GroundTile { .. }));
        let obstacle = index(|s| matches!(s, Sprite::Obstacle { .. }));
        let player = index(|s| matches!(s, Sprite::Player { .. }));
        assert!(ground < obstacle && obstacle < player);
        assert!(!list.sprites.iter().any(|s| matches!(s, Sprite::Hitbox { .. })));
        assert_eq!(list.overlay, None);
    }

    #[test]
    fn test_hitboxes_and_overlays() {
        let mut game = game();
        let settings = Settings {
            show_hitboxes: true,
            ..Settings::default()
        };
        game.toggle_pause(100).unwrap();
        let mut list = DrawList::default();
        draw_frame(&game, &settings, 200, &mut list).unwrap();
        let boxes = list
            .sprites
            .iter()
            .filter(|s| matches!(s, Sprite::Hitbox { .. }))
            .count();
        assert_eq!(boxes, 1 + game.obstacles.len());
        assert_eq!(list.overlay, Some(Overlay::Paused));
    }

    #[test]
    fn test_hud_tracks_game() {
        let mut game = game();
        game.scoreboard.add(3);
        let mut renderer = NullRenderer::default();
        draw_frame(&game, &Settings::default(), 1_500, &mut renderer).unwrap();
        let hud = renderer.last_hud.unwrap();
        assert_eq!(hud.score, 3);
        assert_eq!(hud.health, 5);
        assert_eq!(hud.elapsed_ms, 1_500);
        assert_eq!(renderer.frames, 1);
    }
}
