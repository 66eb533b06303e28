//! Frame pacing
//!
//! The simulation never reads the system clock itself; the frame loop asks a
//! `FrameClock` for "now" and lets it wait out the rest of the frame.

use std::time::{Duration, Instant};

pub trait FrameClock {
    /// Milliseconds since the clock was created
    fn now_ms(&self) -> u64;
    /// Finish the current frame (sleep or step to the next frame boundary)
    fn end_frame(&mut self);
}

/// Deterministic clock for headless runs and tests: every frame is exactly
/// `frame_ms` long.
#[derive(Debug, Clone)]
pub struct SimulatedClock {
    now_ms: u64,
    frame_ms: u64,
}

impl SimulatedClock {
    pub fn new(frame_ms: u64) -> Self {
        Self { now_ms: 0, frame_ms }
    }

    /// Jump ahead without running frames
    pub fn advance(&mut self, ms: u64) {
        self.now_ms += ms;
    }
}

impl FrameClock for SimulatedClock {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn end_frame(&mut self) {
        self.now_ms += self.frame_ms;
    }
}

/// Wall-clock pacing at a fixed rate
#[derive(Debug, Clone)]
pub struct RealtimeClock {
    origin: Instant,
    frame: Duration,
    next_frame: Instant,
}

impl RealtimeClock {
    pub fn new(fps: u32) -> Self {
        let now = Instant::now();
        let frame = Duration::from_secs(1) / fps.max(1);
        Self {
            origin: now,
            frame,
            next_frame: now + frame,
        }
    }
}

impl FrameClock for RealtimeClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    fn end_frame(&mut self) {
        let now = Instant::now();
        if now < self.next_frame {
            std::thread::sleep(self.next_frame - now);
            self.next_frame += self.frame;
        } else {
            // Running behind: don't try to catch up with a burst of frames
            log::trace!("Frame overran by {:?}", now - self.next_frame);
            self.next_frame = now + self.frame;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulated_clock_steps_exactly() {
        let mut clock = SimulatedClock::new(33);
        assert_eq!(clock.now_ms(), 0);
        for _ in 0..30 {
            clock.end_frame();
        }
        assert_eq!(clock.now_ms(), 990);
        clock.advance(10);
        assert_eq!(clock.now_ms(), 1_000);
    }

    #[test]
    fn test_realtime_clock_paces_frames() {
        let mut clock = RealtimeClock::new(100);
        let start = clock.now_ms();
        for _ in 0..3 {
            clock.end_frame();
        }
        assert!(clock.now_ms() >= start + 25);
    }
}
