//! Session leaderboard
//!
//! Ranks finished rounds by pipes passed, then by how long the bird stayed
//! up. Lives in memory for one session; nothing is written to disk.

use std::cmp::Reverse;

use serde::Serialize;

use crate::sim::{GameState, LossCause};

/// Rounds kept on the board
pub const LEADERBOARD_SIZE: usize = 10;

/// Outcome of one finished round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoundResult {
    pub round: u32,
    /// Pipes passed
    pub score: u32,
    /// Playing ticks survived
    pub ticks: u64,
    /// `None` when the round was cut off rather than lost
    pub cause: Option<LossCause>,
}

impl RoundResult {
    /// Snapshot the current round of `state`
    pub fn from_state(state: &GameState) -> Self {
        Self {
            round: state.round,
            score: state.score(),
            ticks: state.ticks,
            cause: state.loss,
        }
    }

    // Higher score first, then longer flight, then the earlier round
    fn rank_key(&self) -> (Reverse<u32>, Reverse<u64>, u32) {
        (Reverse(self.score), Reverse(self.ticks), self.round)
    }
}

/// Best rounds of the session, best first
#[derive(Debug, Clone, Default, Serialize)]
pub struct Leaderboard {
    results: Vec<RoundResult>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a finished round; returns its 1-based rank if it made the board.
    /// Rounds that passed no pipes never do.
    pub fn record(&mut self, result: RoundResult) -> Option<usize> {
        if result.score == 0 {
            return None;
        }
        let key = result.rank_key();
        let slot = self.results.partition_point(|r| r.rank_key() <= key);
        if slot >= LEADERBOARD_SIZE {
            return None;
        }

        self.results.insert(slot, result);
        self.results.truncate(LEADERBOARD_SIZE);
        log::debug!(
            "Round {} placed #{} ({} pipes, {} ticks)",
            result.round,
            slot + 1,
            result.score,
            result.ticks
        );
        Some(slot + 1)
    }

    pub fn best(&self) -> Option<&RoundResult> {
        self.results.first()
    }

    pub fn results(&self) -> &[RoundResult] {
        &self.results
    }
}
