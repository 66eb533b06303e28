//! End-to-end sessions through the frame loop with scripted input

use running_man::assets::{PlayerAnimations, SpriteSheet};
use running_man::audio::{AudioManager, SilentBackend};
use running_man::platform::{FrameClock, InputEvent, Key, ScriptedInput, SimulatedClock};
use running_man::renderer::{NullRenderer, Overlay};
use running_man::sim::{CollisionPolicy, Game, GameConfig, GamePhase};
use running_man::{App, LoopControl, Settings};

const ADVENTURER: &str = include_str!("../assets/adventurer.json");

type TestApp = App<ScriptedInput, SimulatedClock, NullRenderer>;

fn app_with(config: GameConfig, script: ScriptedInput) -> TestApp {
    let sheet = SpriteSheet::from_json(ADVENTURER, 2).unwrap();
    let animations = PlayerAnimations::from_sheet(&sheet).unwrap();
    let clock = SimulatedClock::new(config.frame_ms());
    let game = Game::new(config, animations, 2024, clock.now_ms()).unwrap();
    App::new(
        game,
        Settings::default(),
        script,
        clock,
        NullRenderer::default(),
        AudioManager::new(Box::new(SilentBackend)),
    )
}

fn fragile_config() -> GameConfig {
    GameConfig {
        max_health: 1,
        collision_policy: CollisionPolicy::HitOnce,
        ..GameConfig::default()
    }
}

#[test]
fn test_standing_still_dies_then_restarts_on_key() {
    let script = ScriptedInput::default().then(400, vec![InputEvent::KeyDown(Key::Enter)]);
    let mut app = app_with(fragile_config(), script);

    // The first obstacle reaches the idle player well within 400 frames
    app.run(Some(300)).unwrap();
    assert_eq!(app.game.phase, GamePhase::Ended);
    assert!(app.game.last_run_time_ms.is_some());
    assert!(matches!(
        app.renderer().last_overlay,
        Some(Overlay::GameOver { .. })
    ));

    app.run(Some(101)).unwrap();
    assert_eq!(app.game.phase, GamePhase::Playing);
    assert_eq!(app.game.session, 2);
    assert_eq!(app.game.player.health(), 1);
    assert_eq!(app.game.scoreboard.score(), 0);
}

#[test]
fn test_restart_key_ignored_during_death_hold() {
    let mut app = app_with(fragile_config(), ScriptedInput::default());
    while app.game.phase != GamePhase::Ended {
        app.run_frame().unwrap();
        assert!(app.frames() < 1_000);
    }

    // A restart press right away is too early, and the edge is not remembered
    app.controls_mut().handle(InputEvent::KeyDown(Key::R));
    app.run_frame().unwrap();
    app.controls_mut().handle(InputEvent::KeyUp(Key::R));
    for _ in 0..120 {
        app.run_frame().unwrap();
    }
    assert_eq!(app.game.phase, GamePhase::Ended);
    assert_eq!(app.game.session, 1);
}

#[test]
fn test_pause_and_quit() {
    let script = ScriptedInput::default()
        .then(10, vec![InputEvent::KeyDown(Key::P)])
        .then(30, vec![InputEvent::KeyUp(Key::P), InputEvent::KeyDown(Key::Escape)]);
    let mut app = app_with(GameConfig::default(), script);

    let frames = app.run(None).unwrap();
    assert_eq!(frames, 41);
    assert_eq!(app.game.phase, GamePhase::Paused);
    assert_eq!(app.game.time_ticks, 10);
    // Stopwatch excludes the paused stretch
    assert_eq!(
        app.game.elapsed_ms(app.clock().now_ms()).unwrap(),
        10 * 33
    );
    assert_eq!(app.run_frame().unwrap(), LoopControl::Quit);
}

#[test]
fn test_autopilot_plays_and_scores() {
    let mut app = app_with(
        GameConfig {
            auto_restart: true,
            ..GameConfig::default()
        },
        ScriptedInput::default(),
    );
    app.controls_mut().idle_mode = true;
    // Two minutes of play
    app.run(Some(3_600)).unwrap();

    let game = &app.game;
    let best = game.scoreboard.high_score().max(game.scoreboard.score());
    assert!(best > 0, "autopilot should pass at least one obstacle");
    assert_eq!(app.renderer().frames, 3_600);
}
