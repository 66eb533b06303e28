//! Fixed timestep simulation tick
//!
//! Per-tick order while playing: input, player motion, scroll ramp and
//! scenery, obstacle spawn and advance, collisions, retirement and scoring,
//! then the death check. Paused and ended sessions skip most of it.

use super::collision::collision_pass;
use super::motion::MoveIntent;
use super::state::{Game, GameEvent, GamePhase};
use crate::error::GameError;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held movement keys and a jump request
    pub intent: MoveIntent,
    /// Pause toggle (edge, not level)
    pub pause: bool,
    /// Restart request after death
    pub restart: bool,
    /// Idle/demo mode - autopilot plays the game
    pub idle_mode: bool,
}

/// How many ticks ahead of an obstacle the autopilot jumps
const AUTOPILOT_LEAD_TICKS: f32 = 8.0;

/// Advance the game by one fixed timestep. `now_ms` is the frame clock's
/// time, used for the stopwatch and animation cadence.
pub fn tick(game: &mut Game, input: &TickInput, now_ms: u64) -> Result<(), GameError> {
    if input.pause {
        game.toggle_pause(now_ms)?;
    }

    match game.phase {
        GamePhase::Paused => return Ok(()),
        GamePhase::Ended => {
            // Death animation keeps playing under the overlay
            game.player.tick(now_ms);
            let wants_restart = input.restart || input.idle_mode || game.config.auto_restart;
            if wants_restart {
                game.restart(now_ms)?;
            }
            return Ok(());
        }
        GamePhase::Playing => {}
    }

    game.time_ticks += 1;

    let intent = if input.idle_mode {
        autopilot(game)
    } else {
        input.intent
    };
    game.player.apply_input(intent);
    let step = game.player.tick(now_ms);
    if step.jumped {
        game.emit(GameEvent::Jumped);
    }

    // Speed ramp runs on play time, so pauses do not count
    let elapsed = game.stopwatch.elapsed_ms(now_ms)?;
    if let Some(speed) = game.world.ramp(elapsed, &game.config) {
        log::info!("Scroll speed up to {}", speed);
        game.emit(GameEvent::SpeedUp { speed });
    }
    let speed = game.world.scroll_speed;
    game.world.scenery.advance(speed, &game.config, &mut game.rng);

    if let Some(kind) = game.obstacles.maybe_spawn(&mut game.rng) {
        game.emit(GameEvent::Spawned { kind });
    }
    game.obstacles.advance(speed);

    // Every collision is resolved before anything retires
    let report = collision_pass(
        &mut game.player,
        &mut game.obstacles,
        game.config.collision_policy,
    );
    for _ in &report.hits {
        let health = game.player.health();
        game.emit(GameEvent::Hit { health });
    }

    // One point and one cue per obstacle passed
    for _ in 0..game.obstacles.retire_offscreen() {
        game.scoreboard.add(1);
        let score = game.scoreboard.score();
        log::debug!("Score {}", score);
        game.emit(GameEvent::Scored { score });
    }

    if game.player.is_dead() {
        game.end_session(now_ms)?;
    }
    Ok(())
}

/// Demo-mode input: jump when the nearest obstacle ahead gets close, push
/// forward while airborne to clear it, and drift back home otherwise
pub fn autopilot(game: &Game) -> MoveIntent {
    let player = game.player.rect();
    let closing = game.world.scroll_speed + game.config.player_speed;
    let lookahead = closing * AUTOPILOT_LEAD_TICKS;

    let gap = game
        .obstacles
        .active()
        .iter()
        .filter(|o| o.right() > player.min.x)
        .map(|o| o.pos.x - player.right())
        .fold(f32::INFINITY, f32::min);

    if game.player.body.airborne {
        return MoveIntent {
            right: true,
            ..Default::default()
        };
    }
    let home = game.config.spawn_x;
    MoveIntent {
        left: game.player.body.pos.x > home + game.config.player_speed,
        right: false,
        jump: gap <= lookahead,
    }
}
