//! Search Engine Module
//!
//! Picks a move under a wall-clock budget using:
//! - Iterative deepening from the root, committing only completed depths
//! - Negamax with alpha-beta pruning
//! - Quiescence search over captures and checking moves
//!
//! Running out of time surfaces as `SearchError::Timeout`. Every frame
//! undoes its move before passing the error on, so the position is back
//! in its original state when the root driver catches it.

use crate::config::{EvalConfig, SearchConfig};
use crate::error::{SearchError, SearchResult};
use crate::evaluation::Evaluator;
use crate::ordering::{order_moves, order_root_moves};
use crate::position::{GameStatus, SearchMove, SearchPosition};
use crate::time_manager::{Deadline, TimeManager};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const INFINITY: i32 = 100_000;
/// Magnitude of a forced mate. Remaining depth at the mated node is added
/// on top, so mates closer to the root score further from zero.
pub const MATE_SCORE: i32 = 50_000;

/// Summary of the last decision
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchReport {
    /// Deepest fully completed iteration, 0 if none completed
    pub depth: u32,
    /// Root score of the committed move at that depth
    pub score: i32,
    pub nodes: u64,
    pub elapsed: Duration,
    pub budget: Duration,
    /// Whether the deadline cut an iteration short
    pub cancelled: bool,
}

pub struct SearchEngine {
    evaluator: Evaluator,
    config: SearchConfig,
    clock: TimeManager,
    rng: StdRng,
    deadline: Deadline,
    pub nodes_searched: u64,
    last_report: Option<SearchReport>,
}

impl SearchEngine {
    pub fn new() -> Self {
        SearchEngine::with_config(EvalConfig::default(), SearchConfig::default())
    }

    pub fn with_config(eval_config: EvalConfig, config: SearchConfig) -> Self {
        SearchEngine {
            evaluator: Evaluator::new(eval_config),
            clock: TimeManager::new(&config),
            config,
            rng: StdRng::from_entropy(),
            deadline: Deadline::unbounded(),
            nodes_searched: 0,
            last_report: None,
        }
    }

    /// Fix the root shuffle to a seed for reproducible play.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Reset the game clock for a new game.
    pub fn new_game(&mut self) {
        self.clock = TimeManager::new(&self.config);
        self.last_report = None;
    }

    pub fn clock(&self) -> &TimeManager {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut TimeManager {
        &mut self.clock
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn last_report(&self) -> Option<&SearchReport> {
        self.last_report.as_ref()
    }

    /// Static evaluation of the position for the side to move.
    pub fn evaluate_board<P: SearchPosition>(&self, position: &P) -> i32 {
        self.evaluator.evaluate(position)
    }

    /// Choose a move within the budget derived from the game clock, then
    /// charge the time spent. Returns `None` only when there is no legal move.
    pub fn decide_move<P: SearchPosition>(&mut self, position: &mut P) -> Option<P::Move> {
        let budget = self.clock.budget(position.half_moves_played());
        let deadline = Deadline::new(budget);
        let choice = self.search_until(position, deadline)?;
        self.clock.charge(deadline.elapsed());

        info!(
            budget = ?budget,
            depth = self.last_report.as_ref().map_or(0, |r| r.depth),
            remaining = ?self.clock.remaining(),
            "move decided"
        );
        Some(choice)
    }

    /// Iterative deepening against an explicit deadline. The game clock is
    /// left untouched.
    pub fn search_until<P: SearchPosition>(
        &mut self,
        position: &mut P,
        deadline: Deadline,
    ) -> Option<P::Move> {
        self.deadline = deadline;
        self.nodes_searched = 0;

        let mut moves = position.legal_moves();
        if moves.is_empty() {
            return None;
        }
        order_root_moves(
            &mut moves,
            self.evaluator.config(),
            self.config.root_shuffle_width,
            &mut self.rng,
        );

        let mut committed: Option<(P::Move, i32)> = None;
        let mut completed_depth = 0;
        let mut cancelled = false;

        for depth in 1..=self.config.max_depth {
            match self.search_root(position, &moves, depth) {
                Ok((mv, score)) => {
                    debug!(
                        depth,
                        score,
                        best = ?mv,
                        nodes = self.nodes_searched,
                        elapsed = ?deadline.elapsed(),
                        "depth completed"
                    );
                    committed = Some((mv, score));
                    completed_depth = depth;
                }
                Err(SearchError::Timeout { elapsed, budget }) => {
                    debug!(depth, ?elapsed, ?budget, "depth cancelled");
                    cancelled = true;
                    break;
                }
            }
        }

        let (choice, score) = match committed {
            Some(found) => found,
            None => {
                warn!("no depth completed, playing first ordered move");
                (moves[0], 0)
            }
        };

        self.last_report = Some(SearchReport {
            depth: completed_depth,
            score,
            nodes: self.nodes_searched,
            elapsed: deadline.elapsed(),
            budget: deadline.budget(),
            cancelled,
        });
        Some(choice)
    }

    /// One full-width pass over the root moves. Each root move is searched
    /// with an open window, so every root score is exact.
    fn search_root<P: SearchPosition>(
        &mut self,
        position: &mut P,
        moves: &[P::Move],
        depth: u32,
    ) -> SearchResult<(P::Move, i32)> {
        let mut best_move = moves[0];
        let mut best_score = -INFINITY;

        for &mv in moves {
            self.deadline.check()?;
            position.make_move(mv);
            let result = self.negamax(position, depth - 1, -INFINITY, INFINITY);
            position.undo_move();
            let score = -result?;

            if score > best_score {
                best_score = score;
                best_move = mv;
            }
        }

        Ok((best_move, best_score))
    }

    fn negamax<P: SearchPosition>(
        &mut self,
        position: &mut P,
        depth: u32,
        mut alpha: i32,
        beta: i32,
    ) -> SearchResult<i32> {
        self.deadline.check()?;
        self.nodes_searched += 1;

        match position.status() {
            GameStatus::Checkmate => return Ok(-(MATE_SCORE + depth as i32)),
            GameStatus::Stalemate => return Ok(self.stalemate_score(position)),
            GameStatus::Ongoing => {}
        }

        if depth == 0 {
            return self.quiescence(position, alpha, beta, 0);
        }

        let mut moves = position.legal_moves();
        if moves.is_empty() {
            return Ok(self.evaluator.evaluate(position));
        }
        order_moves(&mut moves, self.evaluator.config());

        let mut value = -INFINITY;
        for mv in moves {
            position.make_move(mv);
            let result = self.negamax(position, depth - 1, -beta, -alpha);
            position.undo_move();

            value = value.max(-result?);
            alpha = alpha.max(value);
            if alpha >= beta {
                break;
            }
        }

        Ok(value)
    }

    /// Fail-hard quiescence over captures and checking moves.
    fn quiescence<P: SearchPosition>(
        &mut self,
        position: &mut P,
        mut alpha: i32,
        beta: i32,
        ply: u32,
    ) -> SearchResult<i32> {
        self.deadline.check()?;
        self.nodes_searched += 1;

        let stand_pat = self.evaluator.evaluate(position);
        if stand_pat >= beta {
            return Ok(beta);
        }
        alpha = alpha.max(stand_pat);

        if ply >= self.config.quiescence_ply_limit {
            return Ok(alpha);
        }

        let mut noisy = noisy_moves(position);
        order_moves(&mut noisy, self.evaluator.config());

        for mv in noisy {
            position.make_move(mv);
            let result = self.quiescence(position, -beta, -alpha, ply + 1);
            position.undo_move();

            let score = -result?;
            if score >= beta {
                return Ok(beta);
            }
            alpha = alpha.max(score);
        }

        Ok(alpha)
    }

    /// Draw score: slightly negative when the side to move is ahead in material.
    fn stalemate_score<P: SearchPosition>(&self, position: &P) -> i32 {
        if self.evaluator.material(position) > 0 {
            -self.evaluator.config().stalemate_penalty
        } else {
            0
        }
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        SearchEngine::new()
    }
}

/// Captures, plus quiet moves that leave the opponent in check.
fn noisy_moves<P: SearchPosition>(position: &mut P) -> Vec<P::Move> {
    let mut noisy = position.legal_moves();
    noisy.retain(|&mv| mv.is_capture() || gives_check(position, mv));
    noisy
}

fn gives_check<P: SearchPosition>(position: &mut P, mv: P::Move) -> bool {
    position.make_move(mv);
    let check = position.is_in_check();
    position.undo_move();
    check
}
