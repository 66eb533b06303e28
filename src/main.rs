//! Running Man entry point
//!
//! Headless demo: the autopilot plays sessions back to back with a simulated
//! clock, audio cues go to the log, and the leaderboard is printed at the end.
//!
//! ```text
//! running-man [--config game.json] [--settings settings.json]
//!             [--sprites adventurer.json] [--seed N] [--frames N] [--realtime]
//! ```

use std::path::{Path, PathBuf};

use clap::Parser;

use running_man::assets::{PlayerAnimations, SpriteSheet};
use running_man::audio::{AudioManager, LogBackend};
use running_man::error::GameError;
use running_man::highscores::format_run_time;
use running_man::platform::{FrameClock, RealtimeClock, ScriptedInput, SimulatedClock};
use running_man::renderer::NullRenderer;
use running_man::sim::{Game, GameConfig};
use running_man::{App, Settings};

/// Sprite upscale factor (scale2x)
const SPRITE_SCALE: u32 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "running-man",
    about = "Headless endless runner: the autopilot plays sessions back to back",
    version
)]
struct Args {
    /// Game config JSON (defaults built in)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Player settings JSON (volumes, key bindings)
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Sprite sheet metadata
    #[arg(long, value_name = "FILE", default_value = "assets/adventurer.json")]
    sprites: PathBuf,

    /// World seed
    #[arg(long, default_value_t = 0x5EED)]
    seed: u64,

    /// Frames to run (ten minutes at 30 fps by default)
    #[arg(long, default_value_t = 18_000)]
    frames: u64,

    /// Pace frames against the wall clock instead of simulating time
    #[arg(long, env = "RUNNING_MAN_REALTIME")]
    realtime: bool,
}

/// Sprite metadata from disk, or a placeholder sheet when there is none
fn load_animations(path: &Path) -> Result<PlayerAnimations, GameError> {
    let sheet = match std::fs::read_to_string(path) {
        Ok(json) => {
            log::info!("Loaded sprite metadata from {}", path.display());
            SpriteSheet::from_json(&json, SPRITE_SCALE)?
        }
        Err(err) => {
            log::warn!(
                "No sprite metadata at {} ({}), using placeholder frames",
                path.display(),
                err
            );
            SpriteSheet::placeholder(20, 31, 4, SPRITE_SCALE)
        }
    };
    Ok(PlayerAnimations::from_sheet(&sheet)?)
}

fn run_with_clock<C: FrameClock>(
    args: &Args,
    config: GameConfig,
    settings: Settings,
    animations: PlayerAnimations,
    clock: C,
) -> Result<(), GameError> {
    let game = Game::new(config, animations, args.seed, clock.now_ms())?;
    let audio = AudioManager::from_settings(Box::new(LogBackend), &settings);
    let mut app = App::new(
        game,
        settings,
        ScriptedInput::default(),
        clock,
        NullRenderer::default(),
        audio,
    );
    app.controls_mut().idle_mode = true;

    let frames = app.run(Some(args.frames))?;
    let game = &app.game;
    log::info!(
        "Ran {} frames over {} session(s); high score {}",
        frames,
        game.session,
        game.scoreboard.high_score()
    );
    for (rank, entry) in game.leaderboard.entries.iter().enumerate() {
        log::info!(
            "#{} session {}: {} points in {}",
            rank + 1,
            entry.session,
            entry.score,
            format_run_time(entry.run_time_ms)
        );
    }
    match serde_json::to_string_pretty(&game.leaderboard) {
        Ok(json) => println!("{json}"),
        Err(err) => log::warn!("Could not serialize leaderboard: {}", err),
    }
    Ok(())
}

fn run() -> Result<(), GameError> {
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    let settings = match &args.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let animations = load_animations(&args.sprites)?;

    if args.realtime {
        let clock = RealtimeClock::new(config.fps);
        run_with_clock(&args, config, settings, animations, clock)
    } else {
        let clock = SimulatedClock::new(config.frame_ms());
        run_with_clock(&args, config, settings, animations, clock)
    }
}

fn main() {
    env_logger::init();
    log::info!("Running Man (headless) starting...");

    if let Err(err) = run() {
        log::error!("{}", err);
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["running-man"]).unwrap();
        assert_eq!(args.config, None);
        assert_eq!(args.sprites, PathBuf::from("assets/adventurer.json"));
        assert_eq!(args.seed, 0x5EED);
        assert_eq!(args.frames, 18_000);
    }

    #[test]
    fn test_args_flags() {
        let args = Args::try_parse_from([
            "running-man",
            "--config",
            "game.json",
            "--seed",
            "42",
            "--frames",
            "900",
            "--realtime",
        ])
        .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("game.json")));
        assert_eq!(args.seed, 42);
        assert_eq!(args.frames, 900);
        assert!(args.realtime);
    }

    #[test]
    fn test_args_reject_bad_input() {
        assert!(Args::try_parse_from(["running-man", "--seed", "many"]).is_err());
        assert!(Args::try_parse_from(["running-man", "--frames"]).is_err());
        assert!(Args::try_parse_from(["running-man", "--bogus"]).is_err());
    }
}
