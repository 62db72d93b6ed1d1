//! Gravity refill: one step drops pieces, slides them diagonally around obstacles
//! and spawns new pieces along the top edge.

use super::event::BoardEvent;
use super::piece::PieceKind;
use super::Grid;
use tracing::trace;

impl Grid {
    /// Advance gravity by one step. Returns whether anything moved or spawned.
    ///
    /// Rows are swept from the second-to-last up to the top. Columns alternate
    /// left-to-right and right-to-left between moving steps so pieces do not
    /// drift one way over many ticks.
    pub fn fill_step(&mut self) -> bool {
        let mut moved = false;
        let (w, h) = (self.width, self.height);

        for y in (0..h.saturating_sub(1)).rev() {
            for loop_x in 0..w {
                let x = if self.inverse { w - 1 - loop_x } else { loop_x };
                if !self.piece(x, y).is_movable() {
                    continue;
                }

                if self.piece(x, y + 1).kind == PieceKind::Empty {
                    self.move_piece((x, y), (x, y + 1));
                    moved = true;
                    continue;
                }

                for diag in [-1i32, 1] {
                    let dx = if self.inverse { -diag } else { diag };
                    let diag_x = x as i32 + dx;
                    if !self.in_bounds(diag_x, y as i32 + 1) {
                        continue;
                    }
                    let diag_x = diag_x as usize;
                    if self.piece(diag_x, y + 1).kind != PieceKind::Empty {
                        continue;
                    }
                    if !self.fed_by_obstacle(diag_x, y) {
                        continue;
                    }
                    self.move_piece((x, y), (diag_x, y + 1));
                    moved = true;
                    break;
                }
            }
        }

        for x in 0..w {
            if self.piece(x, 0).kind != PieceKind::Empty {
                continue;
            }
            self.spawn_from_top(x);
            moved = true;
        }

        if moved {
            self.inverse = !self.inverse;
        }
        trace!(moved, inverse = self.inverse, "fill step");
        moved
    }

    /// True when the first non-Empty piece above `(column, y + 1)`, scanning up from
    /// row `y`, is an immovable obstacle. A movable piece (or open sky) means
    /// ordinary gravity will reach the slot, so a diagonal slide would steal it.
    fn fed_by_obstacle(&self, column: usize, y: usize) -> bool {
        for above in (0..=y).rev() {
            let p = self.piece(column, above);
            if p.is_movable() {
                return false;
            }
            if p.kind != PieceKind::Empty {
                return true;
            }
        }
        false
    }

    /// New random normal piece entering at (x, -1) and dropping into (x, 0).
    fn spawn_from_top(&mut self, x: usize) {
        let kind = PieceKind::Normal(self.rng.color());
        let mut piece = self.fresh_piece(kind, x as i32, -1);
        self.events.push(BoardEvent::Spawned {
            id: piece.id,
            kind,
            x: x as i32,
            y: -1,
        });
        piece.y = 0;
        self.events.push(BoardEvent::Moved {
            id: piece.id,
            from: (x as i32, -1),
            to: (x, 0),
        });
        let i = self.idx(x, 0);
        self.cells[i] = piece;
    }
}
