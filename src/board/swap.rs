//! Player swaps: the two-piece press/enter/release gesture and swap validation.

use super::event::BoardEvent;
use super::matcher::find_match;
use super::piece::{PieceId, PieceKind};
use super::{CascadePhase, Grid};
use tracing::debug;

/// Direction of a committed swap; picks the orientation of a line-clear reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapAxis {
    /// Both pieces in the same row.
    Horizontal,
    /// Both pieces in the same column.
    Vertical,
}

/// Pieces recorded by the press/enter gesture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Gesture {
    pressed: Option<PieceId>,
    entered: Option<PieceId>,
}

/// The swap whose clears are running right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SwapContext {
    pub a: PieceId,
    pub b: PieceId,
    pub axis: SwapAxis,
}

impl SwapContext {
    pub fn involves(&self, id: PieceId) -> bool {
        self.a == id || self.b == id
    }
}

fn adjacent(a: (usize, usize), b: (usize, usize)) -> bool {
    a.0.abs_diff(b.0) + a.1.abs_diff(b.1) == 1
}

impl Grid {
    /// Record the piece under the pointer when the press starts.
    pub fn press_piece(&mut self, x: usize, y: usize) {
        if self.in_bounds(x as i32, y as i32) {
            self.gesture.pressed = Some(self.piece(x, y).id);
        }
    }

    /// Record the piece the pointer is currently over.
    pub fn enter_piece(&mut self, x: usize, y: usize) {
        if self.in_bounds(x as i32, y as i32) {
            self.gesture.entered = Some(self.piece(x, y).id);
        }
    }

    /// End the gesture: swap the two recorded pieces if they are still on the
    /// board and adjacent. Returns whether a swap was committed.
    pub fn release(&mut self) -> bool {
        let gesture = std::mem::take(&mut self.gesture);
        let (Some(pressed), Some(entered)) = (gesture.pressed, gesture.entered) else {
            return false;
        };
        match (self.locate(pressed), self.locate(entered)) {
            (Some(a), Some(b)) if adjacent(a, b) => self.try_swap(a, b),
            _ => false,
        }
    }

    /// The piece currently held by the gesture, if it is still on the board.
    pub fn pressed_slot(&self) -> Option<(usize, usize)> {
        self.gesture.pressed.and_then(|id| self.locate(id))
    }

    /// Swap two orthogonally adjacent movable pieces. The swap stands only if it
    /// makes a match at either new slot or involves a rainbow; otherwise the
    /// board is left exactly as it was. A committed swap clears synchronously and
    /// (re)starts the cascade. Returns whether the swap was committed.
    pub fn try_swap(&mut self, a: (usize, usize), b: (usize, usize)) -> bool {
        if self.game_over {
            debug!(?a, ?b, "swap rejected: game over");
            return false;
        }
        if !self.in_bounds(a.0 as i32, a.1 as i32)
            || !self.in_bounds(b.0 as i32, b.1 as i32)
            || !adjacent(a, b)
        {
            debug!(?a, ?b, "swap rejected: not adjacent");
            return false;
        }
        if !self.piece(a.0, a.1).is_movable() || !self.piece(b.0, b.1).is_movable() {
            debug!(?a, ?b, "swap rejected: immovable piece");
            return false;
        }

        let (ia, ib) = (self.idx(a.0, a.1), self.idx(b.0, b.1));
        self.cells.swap(ia, ib);

        // Piece A now sits at b and piece B at a; their recorded positions are not updated yet.
        let piece_a = self.piece(b.0, b.1);
        let piece_b = self.piece(a.0, a.1);
        let (id_a, id_b) = (piece_a.id, piece_b.id);
        let valid = find_match(self, piece_a, b.0, b.1).is_some()
            || find_match(self, piece_b, a.0, a.1).is_some()
            || matches!(piece_a.kind, PieceKind::Rainbow(_))
            || matches!(piece_b.kind, PieceKind::Rainbow(_));

        if !valid {
            self.cells.swap(ia, ib);
            debug!(?a, ?b, "swap rejected: no match");
            return false;
        }

        self.commit_position(b, a);
        self.commit_position(a, b);
        let axis = if a.1 == b.1 {
            SwapAxis::Horizontal
        } else {
            SwapAxis::Vertical
        };
        self.swap_context = Some(SwapContext {
            a: id_a,
            b: id_b,
            axis,
        });
        debug!(?a, ?b, ?axis, "swap committed");

        self.detonate_rainbow(id_a, b, a);
        self.detonate_rainbow(id_b, a, b);

        self.clear_all_valid_matches();

        for (id, slot) in [(id_a, b), (id_b, a)] {
            let p = self.piece(slot.0, slot.1);
            if p.id == id && p.kind.is_line_clear() {
                self.clear_piece(slot.0, slot.1);
            }
        }

        self.swap_context = None;
        self.phase = CascadePhase::Filling;
        self.events.push(BoardEvent::MoveConsumed);
        true
    }

    /// Update the recorded position of the piece now in `slot`, which came from `from`.
    fn commit_position(&mut self, slot: (usize, usize), from: (usize, usize)) {
        let i = self.idx(slot.0, slot.1);
        let piece = &mut self.cells[i];
        piece.x = slot.0 as i32;
        piece.y = slot.1 as i32;
        let id = piece.id;
        self.events.push(BoardEvent::Moved {
            id,
            from: (from.0 as i32, from.1 as i32),
            to: slot,
        });
    }

    /// A swapped rainbow takes the other piece's colour and clears at once.
    /// Against an uncoloured piece it keeps its tag and stays.
    fn detonate_rainbow(&mut self, id: PieceId, slot: (usize, usize), other: (usize, usize)) {
        let i = self.idx(slot.0, slot.1);
        let piece = &self.cells[i];
        if piece.id != id || !matches!(piece.kind, PieceKind::Rainbow(_)) || !piece.is_clearable() {
            return;
        }
        let Some(color) = self.piece(other.0, other.1).color() else {
            return;
        };
        let kind = self.cells[i].kind.with_color(color);
        self.cells[i].kind = kind;
        self.clear_piece(slot.0, slot.1);
    }
}
