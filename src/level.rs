//! Level rules: score, move/time budgets, win/lose and star rating.
//!
//! A `Level` never touches the board. It consumes the board's events and only
//! reads the grid to check for a finished cascade and remaining obstacles.

use crate::board::{BoardEvent, Grid, PieceType};
use std::time::Duration;

/// What the player has to achieve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Goal {
    /// Reach the target score within a number of moves.
    Moves { moves: u32 },
    /// Reach the target score before the clock runs out.
    Timer { limit: Duration },
    /// Clear every bubble within a number of moves.
    Obstacle { moves: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won { stars: u8 },
    Lost,
}

#[derive(Debug, Clone)]
pub struct Level {
    goal: Goal,
    target_score: u32,
    /// Score thresholds for one, two and three stars.
    star_scores: [u32; 3],
    score: u32,
    moves_used: u32,
    elapsed: Duration,
    outcome: Option<Outcome>,
}

impl Level {
    pub fn new(goal: Goal, target_score: u32, star_scores: [u32; 3]) -> Self {
        Self {
            goal,
            target_score,
            star_scores,
            score: 0,
            moves_used: 0,
            elapsed: Duration::ZERO,
            outcome: None,
        }
    }

    /// Fold one board event into the score and move count.
    pub fn apply(&mut self, event: &BoardEvent) {
        if self.outcome.is_some() {
            return;
        }
        match event {
            BoardEvent::Cleared { score, .. } => self.score += score,
            BoardEvent::MoveConsumed => self.moves_used += 1,
            BoardEvent::Spawned { .. } | BoardEvent::Moved { .. } => {}
        }
    }

    /// Advance the level clock. Only timer goals care.
    pub fn advance(&mut self, dt: Duration) {
        if self.outcome.is_none() {
            self.elapsed += dt;
        }
    }

    /// Decide the outcome once the board is quiet. The first decision sticks.
    pub fn evaluate(&mut self, grid: &Grid) -> Option<Outcome> {
        if self.outcome.is_some() || grid.is_filling() {
            return self.outcome;
        }
        let decided = match self.goal {
            Goal::Moves { moves } => (self.moves_used >= moves).then(|| self.by_score()),
            Goal::Timer { limit } => (self.elapsed >= limit).then(|| self.by_score()),
            Goal::Obstacle { moves } => {
                if grid.pieces_of_type(PieceType::Bubble).is_empty() {
                    Some(Outcome::Won {
                        stars: self.stars(),
                    })
                } else if self.moves_used >= moves {
                    Some(Outcome::Lost)
                } else {
                    None
                }
            }
        };
        self.outcome = decided;
        decided
    }

    fn by_score(&self) -> Outcome {
        if self.score >= self.target_score {
            Outcome::Won {
                stars: self.stars(),
            }
        } else {
            Outcome::Lost
        }
    }

    /// Number of star thresholds reached so far.
    pub fn stars(&self) -> u8 {
        self.star_scores
            .iter()
            .filter(|&&threshold| self.score >= threshold)
            .count() as u8
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn target_score(&self) -> u32 {
        self.target_score
    }

    pub fn goal(&self) -> Goal {
        self.goal
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn remaining_moves(&self) -> Option<u32> {
        match self.goal {
            Goal::Moves { moves } | Goal::Obstacle { moves } => {
                Some(moves.saturating_sub(self.moves_used))
            }
            Goal::Timer { .. } => None,
        }
    }

    pub fn remaining_time(&self) -> Option<Duration> {
        match self.goal {
            Goal::Timer { limit } => Some(limit.saturating_sub(self.elapsed)),
            _ => None,
        }
    }

    /// Sidebar text for what is left: moves, or the clock as `m:ss`.
    pub fn remaining_label(&self) -> String {
        match (self.remaining_moves(), self.remaining_time()) {
            (Some(moves), _) => format!("{moves} moves"),
            (None, Some(left)) => {
                let secs = left.as_secs();
                format!("{}:{:02}", secs / 60, secs % 60)
            }
            (None, None) => String::new(),
        }
    }
}
