//! Single seedable random source for every draw the board makes.

use super::piece::TileColor;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Board RNG: refill colours, line-clear orientation, special-piece placement, obstacle scatter.
#[derive(Debug, Clone)]
pub struct BoardRng {
    inner: StdRng,
}

impl BoardRng {
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform playable colour (never `Any`).
    pub fn color(&mut self) -> TileColor {
        TileColor::PLAYABLE[self.inner.random_range(0..TileColor::PLAYABLE.len())]
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    pub fn index(&mut self, len: usize) -> usize {
        self.inner.random_range(0..len)
    }

    pub fn coin(&mut self) -> bool {
        self.inner.random_bool(0.5)
    }
}

impl Default for BoardRng {
    fn default() -> Self {
        Self::seeded(rand::random())
    }
}
