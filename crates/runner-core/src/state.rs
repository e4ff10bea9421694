//! Shared run state read and written by every subsystem.

use serde::{Deserialize, Serialize};

use crate::lane::Lane;

/// Distance, score, lane and currency for a single run.
///
/// Owned by [`RunnerGame`](crate::game::RunnerGame) and lent out by `&mut`,
/// so no locking is involved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    distance: f32,
    score: f32,
    lane: Lane,
    money: u32,
    running: bool,
    best_score: f32,
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}

impl RunState {
    pub fn new() -> Self {
        Self {
            distance: 0.0,
            score: 0.0,
            lane: Lane::Center,
            money: 0,
            running: true,
            best_score: 0.0,
        }
    }

    /// Fresh state for a new run that remembers the best score so far.
    pub fn next_run(&self) -> Self {
        Self {
            best_score: self.best_score.max(self.score),
            ..Self::new()
        }
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn score(&self) -> f32 {
        self.score
    }

    pub fn best_score(&self) -> f32 {
        self.best_score.max(self.score)
    }

    pub fn lane(&self) -> Lane {
        self.lane
    }

    pub fn money(&self) -> u32 {
        self.money
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advances the world distance. Negative or non-finite deltas are ignored.
    pub fn advance(&mut self, delta: f32) {
        if !delta.is_finite() || delta <= 0.0 {
            return;
        }
        self.distance += delta;
        self.score = self.score.max(self.distance);
    }

    /// Sets the lane from a raw index, clamped to `[0, 2]`.
    pub fn set_lane(&mut self, index: i32) {
        self.lane = Lane::from_index_clamped(index);
    }

    pub fn shift_lane(&mut self, delta: i32) -> Lane {
        self.lane = self.lane.shifted(delta);
        self.lane
    }

    pub fn add_money(&mut self, amount: u32) {
        self.money = self.money.saturating_add(amount);
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.best_score = self.best_score.max(self.score);
    }
}
