//! The refill/clear loop run after every committed swap and on a fresh board.

use super::Grid;
use tracing::debug;

/// Whether the board is currently resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CascadePhase {
    #[default]
    Idle,
    Filling,
}

/// What a single `tick` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeStep {
    /// Pieces fell, slid or spawned.
    Moved,
    /// The board was full and a clear pass removed pieces; more filling follows.
    Cleared,
    /// The board is full with no matches left; the cascade just ended.
    Settled,
    /// Nothing to do.
    Idle,
}

impl Grid {
    /// Advance the cascade by one step. Callers pace animation by calling this
    /// on a timer; `settle` runs it to completion.
    pub fn tick(&mut self) -> CascadeStep {
        if self.phase != CascadePhase::Filling {
            return CascadeStep::Idle;
        }
        if self.fill_step() {
            return CascadeStep::Moved;
        }
        if self.clear_all_valid_matches() {
            return CascadeStep::Cleared;
        }
        self.phase = CascadePhase::Idle;
        debug!("cascade settled");
        CascadeStep::Settled
    }

    /// Run ticks until the cascade is idle. Returns the number of ticks taken.
    pub fn settle(&mut self) -> usize {
        let mut ticks = 0;
        while self.tick() != CascadeStep::Idle {
            ticks += 1;
        }
        ticks
    }

    pub fn is_filling(&self) -> bool {
        self.phase == CascadePhase::Filling
    }

    pub fn phase(&self) -> CascadePhase {
        self.phase
    }
}
