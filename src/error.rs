//! Error types
//!
//! Asset and configuration errors are fatal load-time mismatches. Timer errors
//! mean the game state machine drove the stopwatch out of order; they are
//! propagated out of `sim::tick` instead of being swallowed.

use thiserror::Error;

/// Sprite sheet / animation data errors
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("unknown animation action '{0}'")]
    UnknownAction(String),

    #[error("animation action '{0}' has no frames")]
    EmptyAction(String),

    #[error("action '{action}' declares {declared} frames but lists {listed} sprites")]
    FrameCountMismatch {
        action: String,
        declared: usize,
        listed: usize,
    },

    #[error("mask for '{action}' frame {frame} is {got_w}x{got_h}, sprite is {want_w}x{want_h}")]
    MaskSizeMismatch {
        action: String,
        frame: usize,
        got_w: u32,
        got_h: u32,
        want_w: u32,
        want_h: u32,
    },

    #[error("malformed sprite metadata: {0}")]
    Metadata(#[from] serde_json::Error),
}

/// Configuration / settings file errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config value '{name}': {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Stopwatch misuse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TimerError {
    #[error("stopwatch is already running")]
    AlreadyRunning,
    #[error("stopwatch is not running")]
    NotRunning,
    #[error("stopwatch is not paused")]
    NotPaused,
    #[error("stopwatch is still running")]
    StillRunning,
    #[error("stopwatch is stopped")]
    Stopped,
    #[error("stopwatch was never started")]
    NeverStarted,
}

/// Anything that can abort the game loop
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("timer misuse: {0}")]
    Timer(#[from] TimerError),
}
