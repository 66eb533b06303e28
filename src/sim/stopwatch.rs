//! Play-time stopwatch with pause support
//!
//! Timestamps are integer milliseconds supplied by the caller (the frame
//! clock), so `run_time == stop - start - paused` holds exactly.

use serde::{Deserialize, Serialize};

use crate::error::TimerError;

/// Stopwatch run state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimerState {
    #[default]
    Stopped,
    Running,
    Paused,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Stopwatch {
    state: TimerState,
    start_ms: Option<u64>,
    stop_ms: Option<u64>,
    pause_started_ms: Option<u64>,
    paused_total_ms: u64,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    /// Start timing. A finished run must be reset first.
    pub fn start(&mut self, now_ms: u64) -> Result<(), TimerError> {
        if self.state != TimerState::Stopped {
            return Err(TimerError::AlreadyRunning);
        }
        if self.start_ms.is_some() {
            // Stopped after a run but not reset
            return Err(TimerError::AlreadyRunning);
        }
        self.start_ms = Some(now_ms);
        self.stop_ms = None;
        self.pause_started_ms = None;
        self.paused_total_ms = 0;
        self.state = TimerState::Running;
        Ok(())
    }

    pub fn pause(&mut self, now_ms: u64) -> Result<(), TimerError> {
        if self.state != TimerState::Running {
            return Err(TimerError::NotRunning);
        }
        self.pause_started_ms = Some(now_ms);
        self.state = TimerState::Paused;
        Ok(())
    }

    pub fn resume(&mut self, now_ms: u64) -> Result<(), TimerError> {
        if self.state != TimerState::Paused {
            return Err(TimerError::NotPaused);
        }
        self.fold_pause(now_ms);
        self.state = TimerState::Running;
        Ok(())
    }

    /// Stop timing. Stopping while paused closes the open pause first.
    pub fn stop(&mut self, now_ms: u64) -> Result<(), TimerError> {
        match self.state {
            TimerState::Stopped => return Err(TimerError::NotRunning),
            TimerState::Paused => self.fold_pause(now_ms),
            TimerState::Running => {}
        }
        self.stop_ms = Some(now_ms);
        self.state = TimerState::Stopped;
        Ok(())
    }

    /// Clear a finished run. Only legal while stopped.
    pub fn reset(&mut self) -> Result<(), TimerError> {
        if self.state != TimerState::Stopped {
            return Err(TimerError::StillRunning);
        }
        *self = Self::default();
        Ok(())
    }

    /// Live play time (excludes pauses). Errors once stopped; use `run_time`.
    pub fn elapsed_ms(&self, now_ms: u64) -> Result<u64, TimerError> {
        let start = match (self.state, self.start_ms) {
            (TimerState::Stopped, _) => return Err(TimerError::Stopped),
            (_, Some(start)) => start,
            (_, None) => return Err(TimerError::NeverStarted),
        };
        let open_pause = self
            .pause_started_ms
            .map(|p| now_ms.saturating_sub(p))
            .unwrap_or(0);
        Ok(now_ms
            .saturating_sub(start)
            .saturating_sub(self.paused_total_ms + open_pause))
    }

    /// Final play time of a stopped run. Errors while running or paused.
    pub fn run_time_ms(&self) -> Result<u64, TimerError> {
        if self.state != TimerState::Stopped {
            return Err(TimerError::StillRunning);
        }
        match (self.start_ms, self.stop_ms) {
            (Some(start), Some(stop)) => Ok(stop - start - self.paused_total_ms),
            _ => Err(TimerError::NeverStarted),
        }
    }

    /// Total time spent paused (closed pauses only)
    pub fn paused_total_ms(&self) -> u64 {
        self.paused_total_ms
    }

    fn fold_pause(&mut self, now_ms: u64) {
        if let Some(p) = self.pause_started_ms.take() {
            self.paused_total_ms += now_ms.saturating_sub(p);
        }
    }
}
