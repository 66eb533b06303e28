//! Frame loop
//!
//! One frame: poll input, tick the simulation once, forward its events to
//! audio, draw, then let the clock pace the frame. Quit ends the loop from any
//! phase before anything else runs.

use crate::audio::AudioManager;
use crate::error::GameError;
use crate::platform::{Controls, FrameClock, InputSource};
use crate::renderer::{Renderer, draw_frame};
use crate::settings::Settings;
use crate::sim::{Game, tick};

/// Whether the loop should keep going after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Quit,
}

/// Game instance holding the simulation and its collaborators
pub struct App<I, C, R> {
    pub game: Game,
    pub settings: Settings,
    controls: Controls,
    input: I,
    clock: C,
    renderer: R,
    audio: AudioManager,
    frames: u64,
}

impl<I: InputSource, C: FrameClock, R: Renderer> App<I, C, R> {
    pub fn new(
        game: Game,
        settings: Settings,
        input: I,
        clock: C,
        renderer: R,
        audio: AudioManager,
    ) -> Self {
        let mut controls = Controls::new(settings.key_bindings.clone());
        controls.idle_mode = settings.idle_mode;
        Self {
            game,
            settings,
            controls,
            input,
            clock,
            renderer,
            audio,
            frames: 0,
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn controls_mut(&mut self) -> &mut Controls {
        &mut self.controls
    }

    /// Frames completed so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run a single frame
    pub fn run_frame(&mut self) -> Result<LoopControl, GameError> {
        self.controls.handle_all(self.input.poll());
        if self.controls.quit_requested() {
            log::info!("Quit after {} frames", self.frames);
            return Ok(LoopControl::Quit);
        }

        let now_ms = self.clock.now_ms();
        let input = self.controls.take_tick_input();
        tick(&mut self.game, &input, now_ms)?;

        let events = self.game.drain_events();
        self.audio.dispatch(&events);

        draw_frame(&self.game, &self.settings, now_ms, &mut self.renderer)?;
        self.clock.end_frame();
        self.frames += 1;
        Ok(LoopControl::Continue)
    }

    /// Run until quit, or until `max_frames` frames have run.
    /// Returns the number of frames run.
    pub fn run(&mut self, max_frames: Option<u64>) -> Result<u64, GameError> {
        let start = self.frames;
        loop {
            if max_frames.is_some_and(|max| self.frames - start >= max) {
                log::info!("Frame limit reached");
                break;
            }
            if self.run_frame()? == LoopControl::Quit {
                break;
            }
        }
        Ok(self.frames - start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{PlayerAnimations, SpriteSheet};
    use crate::audio::SilentBackend;
    use crate::platform::{InputEvent, Key, ScriptedInput, SimulatedClock};
    use crate::renderer::NullRenderer;
    use crate::sim::{GameConfig, GamePhase};

    fn app(script: ScriptedInput) -> App<ScriptedInput, SimulatedClock, NullRenderer> {
        let config = GameConfig::default();
        let clock = SimulatedClock::new(config.frame_ms());
        let sheet = SpriteSheet::placeholder(20, 30, 4, 2);
        let game = Game::new(
            config,
            PlayerAnimations::from_sheet(&sheet).unwrap(),
            77,
            clock.now_ms(),
        )
        .unwrap();
        App::new(
            game,
            Settings::default(),
            script,
            clock,
            NullRenderer::default(),
            AudioManager::new(Box::new(SilentBackend)),
        )
    }

    #[test]
    fn test_quit_stops_immediately() {
        let script = ScriptedInput::default().then(5, vec![InputEvent::Quit]);
        let mut app = app(script);
        assert_eq!(app.run(Some(1_000)).unwrap(), 5);
        assert_eq!(app.renderer().frames, 5);
        assert_eq!(app.game.time_ticks, 5);
    }

    #[test]
    fn test_frame_limit() {
        let mut app = app(ScriptedInput::default());
        assert_eq!(app.run(Some(30)).unwrap(), 30);
        assert_eq!(app.clock().now_ms(), 30 * 33);
    }

    #[test]
    fn test_pause_key_freezes_play() {
        let script = ScriptedInput::default()
            .then(2, vec![InputEvent::KeyDown(Key::P)])
            .then(0, vec![InputEvent::KeyUp(Key::P)]);
        let mut app = app(script);
        app.run(Some(20)).unwrap();
        assert_eq!(app.game.phase, GamePhase::Paused);
        assert_eq!(app.game.time_ticks, 2);
        // Frames keep being drawn while paused
        assert_eq!(app.renderer().frames, 20);
    }
}
