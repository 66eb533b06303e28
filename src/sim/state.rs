//! Game state and session lifecycle
//!
//! `Game` owns everything a session mutates. The only way in from outside is
//! `sim::tick`; everything that should reach audio or the HUD is queued as a
//! `GameEvent` and drained by the caller.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::config::GameConfig;
use super::obstacle::{ObstacleField, ObstacleKind, SpawnRules, choose_kind};
use super::player::{Player, PlayerConfig};
use super::stopwatch::Stopwatch;
use super::world::WorldState;
use crate::assets::PlayerAnimations;
use crate::error::{GameError, TimerError};
use crate::highscores::{HighScoreEntry, HighScores};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Frozen; only the pause key does anything
    Paused,
    /// Player died; waiting for the death hold and a restart
    Ended,
}

/// Something the simulation wants the outside world to know about
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped,
    /// Player lost one health (remaining health)
    Hit { health: u8 },
    /// Obstacles passed this tick pushed the score to `score`
    Scored { score: u32 },
    Spawned { kind: ObstacleKind },
    SpeedUp { speed: f32 },
    PhaseChanged { from: GamePhase, to: GamePhase },
    Died { score: u32, run_time_ms: u64 },
    Restarted { session: u32 },
    MusicStart,
    MusicPause,
    MusicResume,
    MusicFadeOut { secs: f32 },
}

/// Current score and best score this process
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    score: u32,
    high_score: u32,
}

impl Scoreboard {
    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn add(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// Fold the current score into the high score. Returns true on a new best.
    pub fn finalize(&mut self) -> bool {
        if self.score > self.high_score {
            self.high_score = self.score;
            return true;
        }
        false
    }

    /// Zero the score; the high score survives
    pub fn reset(&mut self) {
        self.score = 0;
    }
}

#[derive(Debug)]
pub struct Game {
    pub config: GameConfig,
    /// Base seed; each session derives its own stream from it
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub phase: GamePhase,
    /// Ticks simulated in the current session (paused ticks excluded)
    pub time_ticks: u64,
    /// Session number (1-based)
    pub session: u32,
    pub player: Player,
    pub obstacles: ObstacleField,
    pub world: WorldState,
    pub scoreboard: Scoreboard,
    pub stopwatch: Stopwatch,
    pub leaderboard: HighScores,
    /// Run time of the last finished session
    pub last_run_time_ms: Option<u64>,
    ended_at_ms: Option<u64>,
    events: Vec<GameEvent>,
}

impl Game {
    /// Validate `config`, build the first session and start its clock at `now_ms`
    pub fn new(
        config: GameConfig,
        animations: PlayerAnimations,
        seed: u64,
        now_ms: u64,
    ) -> Result<Self, GameError> {
        config.validate()?;
        let mut rng = session_rng(seed, 1);
        let player = Player::new(PlayerConfig::from(&config), animations);
        let obstacles = ObstacleField::new(spawn_rules(&config));
        let world = WorldState::new(&config, &mut rng);

        let mut game = Self {
            config,
            seed,
            rng,
            phase: GamePhase::Playing,
            time_ticks: 0,
            session: 1,
            player,
            obstacles,
            world,
            scoreboard: Scoreboard::default(),
            stopwatch: Stopwatch::new(),
            leaderboard: HighScores::new(),
            last_run_time_ms: None,
            ended_at_ms: None,
            events: Vec::new(),
        };
        game.stopwatch.start(now_ms)?;
        game.place_first_obstacle();
        game.emit(GameEvent::MusicStart);
        log::info!("Session 1 started (seed {})", seed);
        Ok(game)
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Events queued since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Play time of the current session, or the final time once ended
    pub fn elapsed_ms(&self, now_ms: u64) -> Result<u64, TimerError> {
        match self.phase {
            GamePhase::Ended => self.stopwatch.run_time_ms(),
            _ => self.stopwatch.elapsed_ms(now_ms),
        }
    }

    /// When the current session ended
    pub fn ended_at_ms(&self) -> Option<u64> {
        self.ended_at_ms
    }

    fn set_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        if from != to {
            self.phase = to;
            log::info!("Phase {:?} -> {:?}", from, to);
            self.emit(GameEvent::PhaseChanged { from, to });
        }
    }

    fn place_first_obstacle(&mut self) {
        let kind = choose_kind(&mut self.rng);
        self.obstacles.spawn(kind);
        self.emit(GameEvent::Spawned { kind });
    }

    /// Pause-key edge. Ignored once the session has ended.
    pub fn toggle_pause(&mut self, now_ms: u64) -> Result<(), TimerError> {
        match self.phase {
            GamePhase::Playing => {
                self.stopwatch.pause(now_ms)?;
                self.set_phase(GamePhase::Paused);
                self.emit(GameEvent::MusicPause);
            }
            GamePhase::Paused => {
                self.stopwatch.resume(now_ms)?;
                self.set_phase(GamePhase::Playing);
                self.emit(GameEvent::MusicResume);
            }
            GamePhase::Ended => {}
        }
        Ok(())
    }

    /// Health reached zero: stop the clock, bank the score, fade the music
    pub fn end_session(&mut self, now_ms: u64) -> Result<(), TimerError> {
        self.stopwatch.stop(now_ms)?;
        let run_time_ms = self.stopwatch.run_time_ms()?;
        let score = self.scoreboard.score();
        if self.scoreboard.finalize() {
            log::info!("New high score: {}", score);
        }
        self.leaderboard.add(HighScoreEntry {
            score,
            run_time_ms,
            ticks: self.time_ticks,
            session: self.session,
        });
        self.last_run_time_ms = Some(run_time_ms);
        self.ended_at_ms = Some(now_ms);
        log::info!(
            "Session {} over: score {} in {} ms ({} ticks)",
            self.session,
            score,
            run_time_ms,
            self.time_ticks
        );
        self.set_phase(GamePhase::Ended);
        self.emit(GameEvent::Died { score, run_time_ms });
        self.emit(GameEvent::MusicFadeOut {
            secs: self.config.music_fade_secs,
        });
        Ok(())
    }

    /// Whether a restart would be honoured now: the death hold has elapsed and
    /// the death animation has played out
    pub fn can_restart(&self, now_ms: u64) -> bool {
        let held = self
            .ended_at_ms
            .is_some_and(|t| now_ms.saturating_sub(t) >= self.config.death_hold_ms);
        self.phase == GamePhase::Ended && held && self.player.death_complete()
    }

    /// Start a fresh session. Returns false (and does nothing) if a restart is
    /// not allowed yet.
    pub fn restart(&mut self, now_ms: u64) -> Result<bool, TimerError> {
        if !self.can_restart(now_ms) {
            return Ok(false);
        }
        self.session += 1;
        self.rng = session_rng(self.seed, self.session);
        self.world = WorldState::new(&self.config, &mut self.rng);
        self.obstacles.clear();
        self.player.reset();
        self.scoreboard.reset();
        self.stopwatch.reset()?;
        self.stopwatch.start(now_ms)?;
        self.time_ticks = 0;
        self.ended_at_ms = None;

        self.set_phase(GamePhase::Playing);
        self.place_first_obstacle();
        self.emit(GameEvent::Restarted {
            session: self.session,
        });
        self.emit(GameEvent::MusicStart);
        log::info!("Session {} started", self.session);
        Ok(true)
    }
}

fn spawn_rules(config: &GameConfig) -> SpawnRules {
    SpawnRules {
        world_width: config.world_width,
        ground_y: config.ground_y,
        max_active: config.max_obstacles,
        spacing: config.spawn_spacing,
    }
}

fn session_rng(seed: u64, session: u32) -> Pcg32 {
    Pcg32::seed_from_u64(seed.wrapping_add(u64::from(session).wrapping_mul(0x9E37_79B9_7F4A_7C15)))
}
