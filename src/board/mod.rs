//! Board core: grid of pieces, match detection, gravity refill, clears and swaps.
//!
//! The grid is the only owner of mutable board state. Every algorithm is an
//! `impl Grid` block in its own module and runs synchronously against it; the
//! cascade is advanced one step per `tick` so the caller decides the pacing.

mod cascade;
mod clear;
mod event;
mod fill;
mod matcher;
mod piece;
mod rng;
mod swap;

pub use cascade::{CascadePhase, CascadeStep};
pub use event::BoardEvent;
pub use matcher::{Match, find_match};
pub use piece::{Piece, PieceId, PieceKind, PieceType, TileColor};
pub use rng::BoardRng;
pub use swap::SwapAxis;

use swap::{Gesture, SwapContext};

/// One entry of the initial layout. Out-of-bounds entries are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seed {
    pub x: i32,
    pub y: i32,
    pub kind: PieceKind,
}

/// Rectangular board. y = 0 is the top row; gravity pulls towards larger y.
#[derive(Debug, Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    /// Row-major: `cells[y * width + x]`. Every slot always holds a piece.
    cells: Vec<Piece>,
    next_id: u64,
    rng: BoardRng,
    /// Sweep columns right-to-left on the next fill step.
    inverse: bool,
    phase: CascadePhase,
    gesture: Gesture,
    swap_context: Option<SwapContext>,
    game_over: bool,
    events: Vec<BoardEvent>,
}

impl Grid {
    /// Build a board from seed entries; remaining slots start Empty and the
    /// cascade starts in the filling phase so the first ticks fill the board.
    pub fn new(width: usize, height: usize, seeds: &[Seed], rng: BoardRng) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        let mut grid = Self {
            width,
            height,
            cells: Vec::with_capacity(width * height),
            next_id: 0,
            rng,
            inverse: false,
            phase: CascadePhase::Filling,
            gesture: Gesture::default(),
            swap_context: None,
            game_over: false,
            events: Vec::new(),
        };
        for y in 0..height {
            for x in 0..width {
                let empty = grid.fresh_piece(PieceKind::Empty, x as i32, y as i32);
                grid.cells.push(empty);
            }
        }
        for seed in seeds {
            if grid.in_bounds(seed.x, seed.y) {
                grid.place(seed.x as usize, seed.y as usize, seed.kind);
            }
        }
        // Seed placement is not reported.
        grid.events.clear();
        grid
    }

    /// Scatter `count` bubbles over the lower half of the board, skipping occupied slots.
    pub fn scatter_bubbles(&mut self, count: usize) {
        let top = self.height / 2;
        let mut free: Vec<(usize, usize)> = (top..self.height)
            .flat_map(|y| (0..self.width).map(move |x| (x, y)))
            .filter(|&(x, y)| self.piece(x, y).kind == PieceKind::Empty)
            .collect();
        for _ in 0..count {
            if free.is_empty() {
                break;
            }
            let i = self.rng.index(free.len());
            let (x, y) = free.swap_remove(i);
            self.place(x, y, PieceKind::Bubble);
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    #[inline]
    fn idx(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Piece at an in-bounds slot. Panics when out of bounds.
    #[inline]
    pub fn piece(&self, x: usize, y: usize) -> &Piece {
        assert!(
            x < self.width && y < self.height,
            "slot ({x}, {y}) outside {}x{} board",
            self.width,
            self.height
        );
        &self.cells[self.idx(x, y)]
    }

    /// Piece at signed coordinates, `None` outside the board.
    pub fn get(&self, x: i32, y: i32) -> Option<&Piece> {
        self.in_bounds(x, y)
            .then(|| self.piece(x as usize, y as usize))
    }

    /// All pieces in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.cells.iter()
    }

    pub fn pieces_of_type(&self, piece_type: PieceType) -> Vec<&Piece> {
        self.cells
            .iter()
            .filter(|p| p.piece_type() == piece_type)
            .collect()
    }

    /// Current slot of a live piece.
    pub fn locate(&self, id: PieceId) -> Option<(usize, usize)> {
        self.cells
            .iter()
            .position(|p| p.id == id)
            .map(|i| (i % self.width, i / self.width))
    }

    /// Replace whatever occupies the slot with a new piece of `kind`. No clear is reported
    /// for the replaced piece.
    pub fn place(&mut self, x: usize, y: usize, kind: PieceKind) -> PieceId {
        let piece = self.fresh_piece(kind, x as i32, y as i32);
        let id = piece.id;
        if kind != PieceKind::Empty {
            self.events.push(BoardEvent::Spawned {
                id,
                kind,
                x: x as i32,
                y: y as i32,
            });
        }
        let i = self.idx(x, y);
        self.cells[i] = piece;
        id
    }

    /// One-way latch: every later swap is rejected. A running cascade still completes.
    pub fn game_over(&mut self) {
        self.game_over = true;
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Take the events recorded since the last drain.
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, BoardEvent> {
        self.events.drain(..)
    }

    fn fresh_piece(&mut self, kind: PieceKind, x: i32, y: i32) -> Piece {
        let id = PieceId(self.next_id);
        self.next_id += 1;
        Piece::new(id, kind, x, y)
    }

    /// Move the piece at `from` into `to`. `from` becomes a fresh Empty and the
    /// previous occupant of `to` is dropped.
    fn move_piece(&mut self, from: (usize, usize), to: (usize, usize)) {
        let empty = self.fresh_piece(PieceKind::Empty, from.0 as i32, from.1 as i32);
        let i = self.idx(from.0, from.1);
        let mut piece = std::mem::replace(&mut self.cells[i], empty);
        let old = (piece.x, piece.y);
        piece.x = to.0 as i32;
        piece.y = to.1 as i32;
        self.events.push(BoardEvent::Moved {
            id: piece.id,
            from: old,
            to,
        });
        let j = self.idx(to.0, to.1);
        self.cells[j] = piece;
    }

    /// Empty the slot without reporting a clear.
    fn put_empty(&mut self, x: usize, y: usize) {
        let empty = self.fresh_piece(PieceKind::Empty, x as i32, y as i32);
        let i = self.idx(x, y);
        self.cells[i] = empty;
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::layout::Layout;

    /// Board from layout rows; the cascade is not run so the layout stays exact.
    pub fn grid(rows: &[&str]) -> Grid {
        let layout = Layout::parse(&rows.join("\n")).expect("test layout parses");
        Grid::new(layout.width, layout.height, &layout.seeds, BoardRng::seeded(42))
    }

    /// 6×6 board in four colours with no run of three in any direction.
    pub fn base_rows() -> Vec<String> {
        const C: [char; 4] = ['y', 'p', 'b', 'g'];
        (0..6)
            .map(|y| (0..6).map(|x| C[(x + 2 * y) % 4]).collect())
            .collect()
    }

    /// `base_rows` with single cells overridden.
    pub fn base_with(overrides: &[(usize, usize, char)]) -> Grid {
        let mut rows: Vec<Vec<char>> = base_rows().iter().map(|r| r.chars().collect()).collect();
        for &(x, y, c) in overrides {
            rows[y][x] = c;
        }
        let rows: Vec<String> = rows.into_iter().map(|r| r.into_iter().collect()).collect();
        let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
        grid(&refs)
    }

    pub fn kind(grid: &Grid, x: usize, y: usize) -> PieceKind {
        grid.piece(x, y).kind
    }

    pub fn cleared_count(grid: &mut Grid) -> usize {
        grid.drain_events()
            .filter(|e| matches!(e, BoardEvent::Cleared { .. }))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_every_slot_holds_a_piece() {
        let g = Grid::new(5, 4, &[], BoardRng::seeded(1));
        assert_eq!(g.pieces().count(), 20);
        for y in 0..4 {
            for x in 0..5 {
                let p = g.piece(x, y);
                assert_eq!((p.x, p.y), (x as i32, y as i32));
                assert_eq!(p.kind, PieceKind::Empty);
            }
        }
    }

    #[test]
    fn test_out_of_bounds_seeds_are_skipped() {
        let seeds = [
            Seed { x: -1, y: 0, kind: PieceKind::Bubble },
            Seed { x: 0, y: 3, kind: PieceKind::Bubble },
            Seed { x: 3, y: 0, kind: PieceKind::Bubble },
            Seed { x: 1, y: 1, kind: PieceKind::Bubble },
        ];
        let g = Grid::new(3, 3, &seeds, BoardRng::seeded(1));
        assert_eq!(g.pieces_of_type(PieceType::Bubble).len(), 1);
        assert_eq!(g.piece(1, 1).kind, PieceKind::Bubble);
    }

    #[test]
    fn test_get_outside_board_is_none() {
        let g = grid(&["yp", "bg"]);
        assert!(g.get(-1, 0).is_none());
        assert!(g.get(0, 2).is_none());
        assert_eq!(g.get(1, 1).map(|p| p.kind), Some(PieceKind::Normal(TileColor::Green)));
    }

    #[test]
    #[should_panic(expected = "outside 3x3 board")]
    fn test_piece_past_row_end_panics() {
        let g = grid(&["ypb", "bgy", "ypb"]);
        g.piece(3, 0);
    }

    #[test]
    fn test_locate_follows_identity() {
        let g = grid(&["yp", "bg"]);
        let id = g.piece(1, 0).id;
        assert_eq!(g.locate(id), Some((1, 0)));
        assert_eq!(g.locate(PieceId(u64::MAX)), None);
    }

    #[test]
    fn test_scatter_bubbles_stays_in_lower_half() {
        let mut g = Grid::new(6, 6, &[], BoardRng::seeded(9));
        g.scatter_bubbles(5);
        let bubbles = g.pieces_of_type(PieceType::Bubble);
        assert_eq!(bubbles.len(), 5);
        assert!(bubbles.iter().all(|p| p.y >= 3));
    }
}
