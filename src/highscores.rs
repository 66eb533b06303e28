//! Session leaderboard
//!
//! In-memory only; lives as long as the process. Tracks the top 10 finished
//! sessions.

use serde::{Deserialize, Serialize};

/// Maximum number of entries to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A finished session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Obstacles passed
    pub score: u32,
    /// Play time excluding pauses (ms)
    pub run_time_ms: u64,
    /// Simulation ticks played
    pub ticks: u64,
    /// Session number within this process (1-based)
    pub session: u32,
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Add a session to the leaderboard (if it qualifies).
    /// Returns the rank achieved (1-indexed). Equal scores keep arrival order.
    pub fn add(&mut self, entry: HighScoreEntry) -> Option<usize> {
        if !self.qualifies(entry.score) {
            return None;
        }

        // Sorted descending by score
        let pos = self.entries.iter().position(|e| entry.score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);
        log::info!("Leaderboard rank {} ({} entries)", rank, self.entries.len());
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }
}

/// Format a run time as `m:ss.mmm`
pub fn format_run_time(run_time_ms: u64) -> String {
    let mins = run_time_ms / 60_000;
    let secs = (run_time_ms / 1000) % 60;
    let millis = run_time_ms % 1000;
    format!("{}:{:02}.{:03}", mins, secs, millis)
}
