//! Game clock and per-decision deadlines.
//!
//! `TimeManager` holds the time left for the whole game and splits it into
//! per-move budgets. `Deadline` is checked at every search node and raises
//! `SearchError::Timeout` once the budget is spent.

use crate::config::SearchConfig;
use crate::error::{SearchError, SearchResult};
use std::time::{Duration, Instant};

#[derive(Clone, Debug)]
pub struct TimeManager {
    remaining: Duration,
    min_turns_remaining: usize,
    turn_horizon: usize,
    min_budget: Duration,
    max_budget: Duration,
    move_overhead: Duration,
}

impl TimeManager {
    pub fn new(config: &SearchConfig) -> Self {
        TimeManager {
            remaining: config.game_time,
            min_turns_remaining: config.min_turns_remaining.max(1),
            turn_horizon: config.turn_horizon,
            min_budget: config.min_budget,
            max_budget: config.max_budget.max(config.min_budget),
            move_overhead: config.move_overhead,
        }
    }

    /// Time left on the game clock
    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn set_remaining(&mut self, remaining: Duration) {
        self.remaining = remaining;
    }

    /// Estimated turns left for us, never fewer than the configured minimum.
    pub fn turns_remaining(&self, half_moves_played: usize) -> usize {
        self.turn_horizon
            .saturating_sub(half_moves_played / 2)
            .max(self.min_turns_remaining)
    }

    /// Budget for the next decision, clamped to [min_budget, max_budget].
    pub fn budget(&self, half_moves_played: usize) -> Duration {
        let turns = u32::try_from(self.turns_remaining(half_moves_played)).unwrap_or(u32::MAX);
        (self.remaining / turns).clamp(self.min_budget, self.max_budget)
    }

    /// Charge a finished decision to the clock, plus the fixed overhead.
    pub fn charge(&mut self, elapsed: Duration) {
        self.remaining = self
            .remaining
            .saturating_sub(elapsed)
            .saturating_sub(self.move_overhead);
    }
}

/// Wall-clock limit for one decision
#[derive(Clone, Copy, Debug)]
pub struct Deadline {
    start: Instant,
    budget: Duration,
}

impl Deadline {
    pub fn new(budget: Duration) -> Self {
        Deadline {
            start: Instant::now(),
            budget,
        }
    }

    /// A deadline that never fires in practice.
    pub fn unbounded() -> Self {
        Deadline::new(Duration::MAX)
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Fail with `Timeout` once the budget has been used up.
    #[inline]
    pub fn check(&self) -> SearchResult<()> {
        let elapsed = self.elapsed();
        if elapsed >= self.budget {
            return Err(SearchError::Timeout {
                elapsed,
                budget: self.budget,
            });
        }
        Ok(())
    }
}
